//! Tier 2: line-arithmetic rules. Still only one line's clue/count at a
//! time, but now comparing the *deficit* between clue and placed ships
//! against the line's remaining capacity.

use super::common;
use crate::board::{Board, CellState, DIMENSION};
use crate::rules::{Proposal, RuleFn, Technique};

pub const RULES: &[RuleFn] = &[exact_fit, overflow_prevention];

/// When a line's remaining ship count equals its remaining empty count,
/// every empty cell in that line must be a ship.
fn exact_fit(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for line in common::all_lines() {
        let clue = line.clue(board) as i16;
        let ships = line.ship_count(board) as i16;
        let empties = line.empty_count(board) as i16;
        let needed = clue - ships;
        if needed > 0 && needed == empties {
            for pos in 0..DIMENSION {
                if line.state_at(board, pos) == CellState::Empty {
                    let (row, col) = line.coords_at(pos);
                    out.push(Proposal::new(row, col, CellState::Ship, Technique::ExactFit));
                }
            }
        }
    }
    out
}

/// Once a line's clue is already met, any of its cells whose perpendicular
/// line is also already met must be sea — placing a ship there would
/// overflow whichever clue is tighter.
fn overflow_prevention(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for row in 0..DIMENSION {
        let row_full = board.row_ship_count(row) >= board.row_clue(row);
        for col in 0..DIMENSION {
            if board.cell(row, col).state != CellState::Empty {
                continue;
            }
            let col_full = board.col_ship_count(col) >= board.col_clue(col);
            if row_full || col_full {
                out.push(Proposal::new(
                    row,
                    col,
                    CellState::Sea,
                    Technique::OverflowPrevention,
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_exact_fit_fills_remaining_empties_with_ship() {
        let mut board = Board::new([3; DIMENSION], [1; DIMENSION]);
        for col in 0..7 {
            board.cell_mut(0, col).state = CellState::Sea;
        }
        let proposals = exact_fit(&board);
        assert_eq!(proposals.len(), 3);
        assert!(proposals
            .iter()
            .all(|p| p.row == 0 && p.value == CellState::Ship));
    }

    #[rstest]
    fn test_overflow_prevention_blocks_cell_when_row_already_full() {
        let mut board = Board::new([1; DIMENSION], [1; DIMENSION]);
        board.cell_mut(0, 0).state = CellState::Ship;
        let proposals = overflow_prevention(&board);
        assert!(proposals
            .iter()
            .any(|p| p.row == 0 && p.col == 1 && p.value == CellState::Sea));
    }
}
