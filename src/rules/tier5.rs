//! Tier 5: speculative one-ply lookahead. Every empty cell is trial-placed
//! on a scratch copy of the board and propagated to a local fixed point;
//! if that trial provably contradicts an invariant, the opposite value is
//! the only one left standing.

use crate::board::{Board, CellState, DIMENSION};
use crate::propagator::Propagator;
use crate::rules::{Proposal, RuleFn, Technique};

pub const RULES: &[RuleFn] = &[naked_water, naked_ship];

/// If trial-placing a ship at an empty cell forces a contradiction, the
/// cell must be sea.
fn naked_water(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for row in 0..DIMENSION {
        for col in 0..DIMENSION {
            if board.cell(row, col).state != CellState::Empty {
                continue;
            }
            let mut trial = board.clone();
            let mut propagator = Propagator::new(&trial);
            if propagator.test_ship(&mut trial, row, col) {
                out.push(Proposal::new(row, col, CellState::Sea, Technique::NakedWater));
            }
        }
    }
    out
}

/// If trial-placing sea at an empty cell forces a contradiction, the cell
/// must be a ship.
fn naked_ship(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for row in 0..DIMENSION {
        for col in 0..DIMENSION {
            if board.cell(row, col).state != CellState::Empty {
                continue;
            }
            let mut trial = board.clone();
            let mut propagator = Propagator::new(&trial);
            if propagator.test_water(&mut trial, row, col) {
                out.push(Proposal::new(row, col, CellState::Ship, Technique::NakedShip));
            }
        }
    }
    out
}
