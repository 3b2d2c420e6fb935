//! Tier 1: direct clue and adjacency readoffs. No lookahead, no fleet
//! bookkeeping — every rule here fires on a single line or a single
//! ship cell's immediate neighborhood.

use super::common;
use crate::board::{Board, CellState, ORTHOGONAL};
use crate::rules::{Proposal, RuleFn, Technique};

pub const RULES: &[RuleFn] = &[zero_clue, satisfied_clue, diagonal_water, hint_shape];

/// Every empty cell in a zero-clue line is sea.
fn zero_clue(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for line in common::all_lines() {
        if line.clue(board) != 0 {
            continue;
        }
        for pos in 0..crate::board::DIMENSION {
            if line.state_at(board, pos) == CellState::Empty {
                let (row, col) = line.coords_at(pos);
                out.push(Proposal::new(row, col, CellState::Sea, Technique::ZeroClue));
            }
        }
    }
    out
}

/// Once a line's ship count matches its clue, every remaining empty cell in
/// that line is sea.
fn satisfied_clue(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for line in common::all_lines() {
        if line.ship_count(board) != line.clue(board) {
            continue;
        }
        for pos in 0..crate::board::DIMENSION {
            if line.state_at(board, pos) == CellState::Empty {
                let (row, col) = line.coords_at(pos);
                out.push(Proposal::new(
                    row,
                    col,
                    CellState::Sea,
                    Technique::SatisfiedClue,
                ));
            }
        }
    }
    out
}

/// Ships never touch diagonally, so every empty cell diagonal to a ship is sea.
fn diagonal_water(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for row in 0..crate::board::DIMENSION {
        for col in 0..crate::board::DIMENSION {
            if board.cell(row, col).state != CellState::Ship {
                continue;
            }
            for &(dr, dc) in &crate::board::DIAGONAL {
                let nr = row as isize + dr as isize;
                let nc = col as isize + dc as isize;
                if board.within_bounds(nr, nc) && board.state_at(nr, nc) == CellState::Empty {
                    out.push(Proposal::new(
                        nr as usize,
                        nc as usize,
                        CellState::Sea,
                        Technique::DiagonalWater,
                    ));
                }
            }
        }
    }
    out
}

/// A hint cell's shape map pins the state of each orthogonal neighbor it names.
fn hint_shape(board: &Board) -> Vec<Proposal> {
    let mut out = Vec::new();
    for row in 0..crate::board::DIMENSION {
        for col in 0..crate::board::DIMENSION {
            let cell = board.cell(row, col);
            if !(cell.is_hint && cell.state == CellState::Ship) {
                continue;
            }
            let Some(shape) = cell.hint_shape else {
                continue;
            };
            for &(dr, dc) in &ORTHOGONAL {
                let Some(expected) = shape.expected((dr, dc)) else {
                    continue;
                };
                let nr = row as isize + dr as isize;
                let nc = col as isize + dc as isize;
                if board.within_bounds(nr, nc) && board.state_at(nr, nc) == CellState::Empty {
                    out.push(Proposal::new(
                        nr as usize,
                        nc as usize,
                        expected,
                        Technique::HintShape,
                    ));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DIMENSION;
    use rstest::rstest;

    #[rstest]
    fn test_zero_clue_marks_whole_row_sea() {
        let mut row_clues = [1; DIMENSION];
        row_clues[0] = 0;
        let board = Board::new(row_clues, [1; DIMENSION]);
        let proposals = zero_clue(&board);
        assert_eq!(proposals.len(), DIMENSION);
        assert!(proposals
            .iter()
            .all(|p| p.row == 0 && p.value == CellState::Sea));
    }

    #[rstest]
    fn test_satisfied_clue_covers_rest_of_line() {
        let mut board = Board::new([2; DIMENSION], [1; DIMENSION]);
        board.cell_mut(0, 0).state = CellState::Ship;
        board.cell_mut(0, 1).state = CellState::Ship;
        let proposals = satisfied_clue(&board);
        assert_eq!(proposals.len(), DIMENSION - 2);
        assert!(proposals
            .iter()
            .all(|p| p.row == 0 && p.value == CellState::Sea));
    }

    #[rstest]
    fn test_diagonal_water_marks_all_four_corners() {
        let mut board = Board::new([1; DIMENSION], [1; DIMENSION]);
        board.cell_mut(5, 5).state = CellState::Ship;
        let proposals = diagonal_water(&board);
        assert_eq!(proposals.len(), 4);
        assert!(proposals.iter().all(|p| p.value == CellState::Sea));
    }

    #[rstest]
    fn test_hint_shape_pins_neighbors_per_map() {
        let mut board = Board::new([1; DIMENSION], [1; DIMENSION]);
        board.set_hint(
            5,
            5,
            CellState::Ship,
            crate::board::HintShape::from_token("left"),
        );
        let proposals = hint_shape(&board);
        let ship_east = proposals
            .iter()
            .find(|p| p.row == 5 && p.col == 6)
            .unwrap();
        assert_eq!(ship_east.value, CellState::Ship);
        let sea_west = proposals
            .iter()
            .find(|p| p.row == 5 && p.col == 4)
            .unwrap();
        assert_eq!(sea_west.value, CellState::Sea);
    }
}
