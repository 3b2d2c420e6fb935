//! Incremental one-ply propagator used by tier 5's speculative lookahead.
//!
//! A [`Propagator`] is built fresh from a board's current counts and hint
//! constraints, then asked to trial-place a single value and chase the
//! consequences to a local fixed point: filling lines that become exactly
//! satisfied or exactly exhausted, sealing diagonal neighbors of any newly
//! placed ship, and finally checking the resulting board against the fleet
//! invariant. It never runs rules — it only tests one assignment at a time
//! and reports whether that assignment is provably impossible.
//!
//! A propagator instance is single-use: build one, call [`Propagator::test_ship`]
//! or [`Propagator::test_water`] exactly once against a scratch board, then
//! discard both. Rebuilding from scratch after every trial (rather than
//! patching counters across restores) keeps the bookkeeping trivial at the
//! cost of a full board scan per trial.

use crate::board::{Board, CellState, DIAGONAL, DIMENSION, ORTHOGONAL};
use std::collections::{HashMap, VecDeque};

const WORKLIST_CAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Row,
    Col,
}

/// Stateful one-ply constraint propagator over a scratch [`Board`].
pub struct Propagator {
    row_ships: [u8; DIMENSION],
    row_empties: [u8; DIMENSION],
    col_ships: [u8; DIMENSION],
    col_empties: [u8; DIMENSION],
    hint_constraints: HashMap<(usize, usize), CellState>,
}

impl Propagator {
    /// Builds a propagator from `board`'s current row/column counts and
    /// hint-shape constraints. Must be rebuilt, not reused, after the board
    /// it was built from changes.
    pub fn new(board: &Board) -> Self {
        let mut row_ships = [0u8; DIMENSION];
        let mut row_empties = [0u8; DIMENSION];
        let mut col_ships = [0u8; DIMENSION];
        let mut col_empties = [0u8; DIMENSION];

        for row in 0..DIMENSION {
            row_ships[row] = board.row_ship_count(row);
            row_empties[row] = board.row_empty_count(row);
        }
        for col in 0..DIMENSION {
            col_ships[col] = board.col_ship_count(col);
            col_empties[col] = board.col_empty_count(col);
        }

        let mut hint_constraints = HashMap::new();
        for row in 0..DIMENSION {
            for col in 0..DIMENSION {
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
                    if board.within_bounds(nr, nc) {
                        hint_constraints.insert((nr as usize, nc as usize), expected);
                    }
                }
            }
        }

        Self {
            row_ships,
            row_empties,
            col_ships,
            col_empties,
            hint_constraints,
        }
    }

    /// Trial-places a ship at `(row, col)` on `board` and propagates.
    /// Returns `true` if this forces a contradiction.
    pub fn test_ship(&mut self, board: &mut Board, row: usize, col: usize) -> bool {
        self.assign(board, row, col, CellState::Ship)
    }

    /// Trial-places sea at `(row, col)` on `board` and propagates. Returns
    /// `true` if this forces a contradiction.
    pub fn test_water(&mut self, board: &mut Board, row: usize, col: usize) -> bool {
        self.assign(board, row, col, CellState::Sea)
    }

    fn assign(&mut self, board: &mut Board, row: usize, col: usize, value: CellState) -> bool {
        if let Some(&pinned) = self.hint_constraints.get(&(row, col)) {
            if pinned != value {
                return true;
            }
        }

        let mut queue: VecDeque<(Axis, usize)> = VecDeque::new();
        if self.place(board, row, col, value, &mut queue) {
            return true;
        }

        let mut pops = 0usize;
        while let Some((axis, index)) = queue.pop_front() {
            pops += 1;
            if pops > WORKLIST_CAP {
                break;
            }
            if self.process_line(board, axis, index, &mut queue) {
                return true;
            }
        }

        !board.fleet_consistent()
    }

    /// Places `value` at `(row, col)`, updates counters, enqueues the
    /// cell's row and column, and — for ship placements — seals every
    /// in-bounds empty diagonal neighbor as sea. Returns `true` the moment
    /// any of that is already impossible.
    fn place(
        &mut self,
        board: &mut Board,
        row: usize,
        col: usize,
        value: CellState,
        queue: &mut VecDeque<(Axis, usize)>,
    ) -> bool {
        board.cell_mut(row, col).state = value;
        if value == CellState::Ship {
            self.row_ships[row] += 1;
            self.col_ships[col] += 1;
        }
        self.row_empties[row] -= 1;
        self.col_empties[col] -= 1;
        queue.push_back((Axis::Row, row));
        queue.push_back((Axis::Col, col));

        if value != CellState::Ship {
            return false;
        }

        for &(dr, dc) in &DIAGONAL {
            let nr = row as isize + dr as isize;
            let nc = col as isize + dc as isize;
            if !board.within_bounds(nr, nc) {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);
            let state = board.cell(nr, nc).state;
            if state == CellState::Ship {
                return true;
            }
            if state != CellState::Empty {
                continue;
            }
            if let Some(&pinned) = self.hint_constraints.get(&(nr, nc)) {
                if pinned == CellState::Ship {
                    return true;
                }
            }
            if self.place(board, nr, nc, CellState::Sea, queue) {
                return true;
            }
        }

        false
    }

    /// Re-checks one line after a placement: contradiction if it's already
    /// overfull or can no longer reach its clue; otherwise fills it
    /// (sea or ship) if it just became fully determined.
    fn process_line(
        &mut self,
        board: &mut Board,
        axis: Axis,
        index: usize,
        queue: &mut VecDeque<(Axis, usize)>,
    ) -> bool {
        let (clue, ships, empties) = match axis {
            Axis::Row => (
                board.row_clue(index),
                self.row_ships[index],
                self.row_empties[index],
            ),
            Axis::Col => (
                board.col_clue(index),
                self.col_ships[index],
                self.col_empties[index],
            ),
        };

        if ships > clue || ships + empties < clue {
            return true;
        }
        if ships == clue && empties > 0 {
            return self.fill_line(board, axis, index, CellState::Sea, queue);
        }
        if clue - ships == empties && empties > 0 {
            return self.fill_line(board, axis, index, CellState::Ship, queue);
        }
        false
    }

    fn fill_line(
        &mut self,
        board: &mut Board,
        axis: Axis,
        index: usize,
        value: CellState,
        queue: &mut VecDeque<(Axis, usize)>,
    ) -> bool {
        let positions: Vec<(usize, usize)> = (0..DIMENSION)
            .map(|pos| match axis {
                Axis::Row => (index, pos),
                Axis::Col => (pos, index),
            })
            .collect();

        for (row, col) in positions {
            if board.cell(row, col).state != CellState::Empty {
                continue;
            }
            if let Some(&pinned) = self.hint_constraints.get(&(row, col)) {
                if pinned != value {
                    return true;
                }
            }
            if self.place(board, row, col, value, queue) {
                return true;
            }
        }

        false
    }
}
