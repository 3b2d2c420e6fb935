//! Tier 3: shape-based deductions around a single partial ship. Reasons
//! about a ship cell's immediate neighbors or a line's single open segment,
//! never about the fleet as a whole (that's tier 4).

use super::common;
use crate::board::{Board, CellState, DIMENSION, ORTHOGONAL};
use crate::rules::{Proposal, RuleFn, Technique};

pub const RULES: &[RuleFn] = &[forced_extension, overlap, three_blocked_sides];

/// A ship cell with exactly one ship neighbor and exactly one empty
/// neighbor on the same axis, opposite the ship neighbor, must extend into
/// that empty cell — there's nowhere else for the run to continue.
fn forced_extension(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for row in 0..DIMENSION {
        for col in 0..DIMENSION {
            if board.cell(row, col).state != CellState::Ship {
                continue;
            }

            let neighbors: Vec<((i8, i8), CellState)> = ORTHOGONAL
                .iter()
                .map(|&(dr, dc)| {
                    let nr = row as isize + dr as isize;
                    let nc = col as isize + dc as isize;
                    ((dr, dc), board.state_at(nr, nc))
                })
                .collect();

            let ship_dirs: Vec<(i8, i8)> = neighbors
                .iter()
                .filter(|(_, s)| *s == CellState::Ship)
                .map(|(off, _)| *off)
                .collect();
            let empty_dirs: Vec<(i8, i8)> = neighbors
                .iter()
                .filter(|(_, s)| *s == CellState::Empty)
                .map(|(off, _)| *off)
                .collect();

            let target = if ship_dirs.len() == 1 && empty_dirs.len() == 1 {
                let opposite = (-ship_dirs[0].0, -ship_dirs[0].1);
                (empty_dirs[0] == opposite).then_some(empty_dirs[0])
            } else if ship_dirs.is_empty() && empty_dirs.len() == 1 {
                Some(empty_dirs[0])
            } else {
                None
            };

            if let Some((dr, dc)) = target {
                let nr = (row as isize + dr as isize) as usize;
                let nc = (col as isize + dc as isize) as usize;
                out.push(Proposal::new(
                    nr,
                    nc,
                    CellState::Ship,
                    Technique::ForcedExtension,
                ));
            }
        }
    }
    out
}

/// When a line has exactly one contiguous empty segment and that segment
/// is longer than the number of ship cells still needed in the line, the
/// cells where every valid placement of the remaining run would overlap
/// must be ship, regardless of where in the segment the run actually sits.
fn overlap(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for line in common::all_lines() {
        let states = line.states(board);
        let segments = common::empty_segments(&states);
        if segments.len() != 1 {
            continue;
        }

        let needed = line.clue(board) as i16 - line.ship_count(board) as i16;
        if needed <= 0 {
            continue;
        }
        let needed = needed as usize;

        let (start, end) = segments[0];
        let length = end - start + 1;
        if length <= needed {
            continue;
        }

        let lo = length - needed;
        let hi = needed - 1;
        for idx in lo..=hi {
            let pos = start + idx;
            if states[pos] == CellState::Empty {
                let (row, col) = line.coords_at(pos);
                out.push(Proposal::new(row, col, CellState::Ship, Technique::Overlap));
            }
        }
    }
    out
}

/// A ship cell with no ship neighbor, three of whose four orthogonal sides
/// are already blocked (sea or the edge), must extend into the one open side.
fn three_blocked_sides(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for row in 0..DIMENSION {
        for col in 0..DIMENSION {
            if board.cell(row, col).state != CellState::Ship {
                continue;
            }

            let neighbor_states: Vec<CellState> = ORTHOGONAL
                .iter()
                .map(|&(dr, dc)| {
                    board.state_at(row as isize + dr as isize, col as isize + dc as isize)
                })
                .collect();

            if neighbor_states.iter().any(|&s| s == CellState::Ship) {
                continue;
            }

            let blocked = neighbor_states
                .iter()
                .filter(|&&s| s == CellState::Sea)
                .count();
            let empty_positions: Vec<usize> = neighbor_states
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s == CellState::Empty)
                .map(|(i, _)| i)
                .collect();

            if blocked == 3 && empty_positions.len() == 1 {
                let (dr, dc) = ORTHOGONAL[empty_positions[0]];
                let nr = (row as isize + dr as isize) as usize;
                let nc = (col as isize + dc as isize) as usize;
                out.push(Proposal::new(
                    nr,
                    nc,
                    CellState::Ship,
                    Technique::ThreeBlockedSides,
                ));
            }
        }
    }
    out
}
