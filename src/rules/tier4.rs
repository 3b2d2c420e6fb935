//! Tier 4: fleet-aware rules. These look at which ship sizes are still
//! available to place and use that to prune gaps and runs that no
//! remaining ship could occupy.

use super::common;
use crate::board::{Board, CellState, DIMENSION};
use crate::rules::{Proposal, RuleFn, Technique};

pub const RULES: &[RuleFn] = &[
    gap_too_small,
    fleet_exhaustion,
    cap_at_max,
    prevent_long_join,
];

/// A gap of empty cells bounded by sea on both ends that's smaller than the
/// smallest remaining ship can never hold one: it's all sea.
fn gap_too_small(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    let remaining = board.remaining_fleet();
    let Some(&smallest) = remaining.iter().min() else {
        return out;
    };

    for line in common::all_lines() {
        let states = line.states(board);
        for (start, end) in common::sea_bounded_empty_segments(&states) {
            let length = (end - start + 1) as u8;
            if length < smallest {
                for pos in start..=end {
                    let (row, col) = line.coords_at(pos);
                    out.push(Proposal::new(row, col, CellState::Sea, Technique::GapTooSmall));
                }
            }
        }
    }
    out
}

/// Once every ship of a given size has been placed, a partial run one cell
/// short of that size can't grow into it: both open ends are sea.
fn fleet_exhaustion(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    let remaining = board.remaining_fleet();
    let fleet = board.fleet();

    let mut exhausted: Vec<u8> = Vec::new();
    for &size in fleet.iter() {
        if !exhausted.contains(&size) && !remaining.contains(&size) {
            exhausted.push(size);
        }
    }
    if exhausted.is_empty() {
        return out;
    }

    for line in common::all_lines() {
        let states = line.states(board);
        for (start, end) in common::ship_runs_in_line(&states) {
            let length = (end - start + 1) as u8;
            if !exhausted.contains(&(length + 1)) {
                continue;
            }
            if start > 0 && states[start - 1] == CellState::Empty {
                let (row, col) = line.coords_at(start - 1);
                out.push(Proposal::new(
                    row,
                    col,
                    CellState::Sea,
                    Technique::FleetExhaustion,
                ));
            }
            if end + 1 < DIMENSION && states[end + 1] == CellState::Empty {
                let (row, col) = line.coords_at(end + 1);
                out.push(Proposal::new(
                    row,
                    col,
                    CellState::Sea,
                    Technique::FleetExhaustion,
                ));
            }
        }
    }
    out
}

/// A partial run already as long as the largest remaining ship can't grow
/// any further: both open ends are sea.
fn cap_at_max(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    let remaining = board.remaining_fleet();
    let Some(&max_remaining) = remaining.iter().max() else {
        return out;
    };

    for line in common::all_lines() {
        let states = line.states(board);
        for (start, end) in common::ship_runs_in_line(&states) {
            let length = (end - start + 1) as u8;
            if length != max_remaining {
                continue;
            }
            if start > 0 && states[start - 1] == CellState::Empty {
                let (row, col) = line.coords_at(start - 1);
                out.push(Proposal::new(row, col, CellState::Sea, Technique::CapAtMax));
            }
            if end + 1 < DIMENSION && states[end + 1] == CellState::Empty {
                let (row, col) = line.coords_at(end + 1);
                out.push(Proposal::new(row, col, CellState::Sea, Technique::CapAtMax));
            }
        }
    }
    out
}

/// An empty cell that would, if it became a ship, join two runs into
/// something longer than the largest remaining ship must be sea.
fn prevent_long_join(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    let remaining = board.remaining_fleet();
    let Some(&max_remaining) = remaining.iter().max() else {
        return out;
    };

    for row in 0..DIMENSION {
        for col in 0..DIMENSION {
            if board.cell(row, col).state != CellState::Empty {
                continue;
            }
            let north = count_ship_run(board, row, col, -1, 0);
            let south = count_ship_run(board, row, col, 1, 0);
            let west = count_ship_run(board, row, col, 0, -1);
            let east = count_ship_run(board, row, col, 0, 1);

            let vertical = north + south + 1;
            let horizontal = west + east + 1;

            if vertical > max_remaining as usize || horizontal > max_remaining as usize {
                out.push(Proposal::new(
                    row,
                    col,
                    CellState::Sea,
                    Technique::PreventLongJoin,
                ));
            }
        }
    }
    out
}

fn count_ship_run(board: &Board, row: usize, col: usize, dr: i8, dc: i8) -> usize {
    let mut count = 0;
    let mut r = row as isize + dr as isize;
    let mut c = col as isize + dc as isize;
    while board.state_at(r, c) == CellState::Ship {
        count += 1;
        r += dr as isize;
        c += dc as isize;
    }
    count
}
