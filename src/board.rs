//! The puzzle board for the naval deduction solver.
//!
//! A board is a fixed 10x10 grid of cells, each tri-valued (empty, sea, or
//! ship), paired with per-row and per-column ship-count clues and a fixed
//! fleet multiset. The board only records state; it never decides what a
//! cell *should* be — that is the job of the rule library in
//! [`crate::rules`]. The one thing the board does compute for itself is
//! derived fleet inspection (run-finding, remaining-fleet accounting),
//! since those are pure functions of the grid and every tier of rule needs
//! them.

use std::fmt::{Display, Formatter};
use thiserror::Error;

/// The dimension of every board this solver handles.
///
/// The puzzle class this engine solves is fixed at 10x10; other grid
/// sizes are a different puzzle class entirely, not a parameter of this one.
pub const DIMENSION: usize = 10;

/// The fleet every board must place: one battleship, two cruisers, three
/// destroyers, four submarines.
pub const FLEET: [u8; 10] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];

/// The four orthogonal offsets, in the fixed order every hint-shape map
/// is keyed by: north, south, west, east.
pub const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// The four diagonal offsets.
pub const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Programming errors raised when a rule or caller violates a precondition
/// the core assumes always holds.
///
/// These never surface from [`crate::driver::TieredSolver::solve`] — puzzle
/// outcomes are always communicated through the result record. They exist
/// so a misbehaving rule fails fast instead of silently corrupting the
/// board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A rule proposed an assignment for a cell that was not [`CellState::Empty`].
    #[error("rule emitted an assignment for non-empty cell ({row}, {col})")]
    RuleEmittedNonEmptyCell { row: usize, col: usize },

    /// A coordinate fell outside the board.
    #[error("({row}, {col}) is not a valid coordinate on a {DIMENSION}x{DIMENSION} board")]
    CoordinatesOutOfBounds { row: usize, col: usize },
}

/// The tri-valued state of a single cell.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum CellState {
    /// Unknown; not yet deduced.
    #[default]
    Empty,
    /// Water.
    Sea,
    /// Part of a ship.
    Ship,
}

impl CellState {
    /// Parses the integer/string tokens an external parser's puzzle
    /// format uses for a cell value: integers `0`/`1`/`2` or the string
    /// tokens `empty`/`unknown`, `sea`/`water`, `ship`.
    ///
    /// Returns `None` for anything else; the parser, not the core, decides
    /// what to do with malformed input.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "0" | "empty" | "unknown" => Some(CellState::Empty),
            "1" | "sea" | "water" => Some(CellState::Sea),
            "2" | "ship" => Some(CellState::Ship),
            _ => None,
        }
    }

    fn snapshot_char(self, is_hint: bool) -> char {
        match (self, is_hint) {
            (CellState::Empty, _) => ' ',
            (CellState::Sea, false) => '~',
            (CellState::Sea, true) => 'h',
            (CellState::Ship, false) => 'S',
            (CellState::Ship, true) => 'H',
        }
    }

    fn from_snapshot_char(ch: char) -> (Self, bool) {
        match ch {
            'H' => (CellState::Ship, true),
            'h' => (CellState::Sea, true),
            'S' => (CellState::Ship, false),
            '~' => (CellState::Sea, false),
            _ => (CellState::Empty, false),
        }
    }
}

/// A partial mapping from the four orthogonal offsets to an expected
/// neighbor state, attached to a hint cell that is known to be a ship.
///
/// Represented as four fixed optional slots instead of a `HashMap`, since
/// the key space is exactly the four orthogonal directions and is always
/// known at construction time.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct HintShape {
    north: Option<CellState>,
    south: Option<CellState>,
    west: Option<CellState>,
    east: Option<CellState>,
}

impl HintShape {
    /// Builds a shape from the four slots, in the order used throughout
    /// this crate: north, south, west, east.
    pub fn new(
        north: Option<CellState>,
        south: Option<CellState>,
        west: Option<CellState>,
        east: Option<CellState>,
    ) -> Self {
        Self {
            north,
            south,
            west,
            east,
        }
    }

    /// Looks up the expected state for a given orthogonal offset, if this
    /// shape constrains that direction.
    pub fn expected(&self, offset: (i8, i8)) -> Option<CellState> {
        match offset {
            (-1, 0) => self.north,
            (1, 0) => self.south,
            (0, -1) => self.west,
            (0, 1) => self.east,
            _ => None,
        }
    }

    /// Parses one of the shape tokens an external parser's hint metadata
    /// uses: `sub`/`single`, `top`/`bow`/`up`, `bot`/`bottom`/`down`,
    /// `left`, `right`, `mid_h`/`middle_h`/`horizontal_mid`,
    /// `mid_v`/`middle_v`/`vertical_mid`.
    ///
    /// Ambiguous middle hints (orientation unknown from the token alone)
    /// are intentionally not representable by a *single* token here;
    /// callers that can't disambiguate should pass `None` upstream and
    /// never call this with an ambiguous token.
    pub fn from_token(token: &str) -> Option<Self> {
        use CellState::{Sea, Ship};
        let token = token.trim().to_ascii_lowercase();
        match token.as_str() {
            "sub" | "single" => Some(Self::new(Some(Sea), Some(Sea), Some(Sea), Some(Sea))),
            "top" | "bow" | "up" => Some(Self::new(Some(Sea), Some(Ship), Some(Sea), Some(Sea))),
            "bot" | "bottom" | "down" => {
                Some(Self::new(Some(Ship), Some(Sea), Some(Sea), Some(Sea)))
            }
            "left" => Some(Self::new(Some(Sea), Some(Sea), Some(Sea), Some(Ship))),
            "right" => Some(Self::new(Some(Sea), Some(Sea), Some(Ship), Some(Sea))),
            "mid_h" | "middle_h" | "horizontal_mid" => {
                Some(Self::new(Some(Sea), Some(Sea), Some(Ship), Some(Ship)))
            }
            "mid_v" | "middle_v" | "vertical_mid" => {
                Some(Self::new(Some(Ship), Some(Ship), Some(Sea), Some(Sea)))
            }
            _ => None,
        }
    }
}

/// A single cell on the board.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub state: CellState,
    /// The reference-solution state, used only for post-hoc validation
    /// (`matches_reference`); never consulted by any deduction rule.
    pub reference: Option<CellState>,
    pub is_hint: bool,
    pub hint_shape: Option<HintShape>,
}

impl Cell {
    fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            state: CellState::Empty,
            reference: None,
            is_hint: false,
            hint_shape: None,
        }
    }
}

/// The 10x10 puzzle board: cells, clues, and the fixed fleet.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Vec<Cell>>,
    row_clues: [u8; DIMENSION],
    col_clues: [u8; DIMENSION],
    fleet: [u8; 10],
}

impl Board {
    /// Builds an empty board from row/column clues.
    ///
    /// The caller (an external parser) is expected to populate hints and
    /// reference-solution states afterward via [`Board::set_hint`] and
    /// direct field access on [`Board::cell_mut`]. The core never
    /// validates clue values beyond this constructor's shape checks —
    /// a puzzle with an impossible clue is a valid input that the driver
    /// will simply fail to solve.
    pub fn new(row_clues: [u8; DIMENSION], col_clues: [u8; DIMENSION]) -> Self {
        let cells = (0..DIMENSION)
            .map(|r| (0..DIMENSION).map(|c| Cell::new(r, c)).collect())
            .collect();

        Self {
            cells,
            row_clues,
            col_clues,
            fleet: FLEET,
        }
    }

    pub fn row_clue(&self, row: usize) -> u8 {
        self.row_clues[row]
    }

    pub fn col_clue(&self, col: usize) -> u8 {
        self.col_clues[col]
    }

    pub fn fleet(&self) -> &[u8; 10] {
        &self.fleet
    }

    /// Marks `(row, col)` as a hint with the given state and optional
    /// shape map. Panics if the coordinate is out of bounds: hints are
    /// supplied by the parser at board-construction time, never derived
    /// from solver state, so an out-of-range hint is a parser bug.
    pub fn set_hint(&mut self, row: usize, col: usize, state: CellState, shape: Option<HintShape>) {
        if row >= DIMENSION || col >= DIMENSION {
            panic!("{}", Error::CoordinatesOutOfBounds { row, col });
        }
        let cell = &mut self.cells[row][col];
        cell.is_hint = true;
        cell.state = state;
        cell.hint_shape = shape;
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row][col]
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        &mut self.cells[row][col]
    }

    /// True if `(row, col)` names a cell on the board.
    pub fn within_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < DIMENSION && (col as usize) < DIMENSION
    }

    /// The state at `(row, col)`, or [`CellState::Sea`] if off-board.
    ///
    /// Treating off-board as sea lets every rule and the propagator treat
    /// the edge of the board exactly like a wall of water, with no special
    /// casing.
    pub fn state_at(&self, row: isize, col: isize) -> CellState {
        if self.within_bounds(row, col) {
            self.cells[row as usize][col as usize].state
        } else {
            CellState::Sea
        }
    }

    /// True if `(row, col)` is on-board and a hint cell.
    pub fn is_hint_at(&self, row: isize, col: isize) -> bool {
        self.within_bounds(row, col) && self.cells[row as usize][col as usize].is_hint
    }

    pub fn hint_shape_at(&self, row: isize, col: isize) -> Option<HintShape> {
        if self.within_bounds(row, col) {
            self.cells[row as usize][col as usize].hint_shape
        } else {
            None
        }
    }

    /// Number of ship cells in the given row.
    pub fn row_ship_count(&self, row: usize) -> u8 {
        self.cells[row]
            .iter()
            .filter(|c| c.state == CellState::Ship)
            .count() as u8
    }

    /// Number of ship cells in the given column.
    pub fn col_ship_count(&self, col: usize) -> u8 {
        self.cells
            .iter()
            .filter(|row| row[col].state == CellState::Ship)
            .count() as u8
    }

    /// Number of empty cells in the given row.
    pub fn row_empty_count(&self, row: usize) -> u8 {
        self.cells[row]
            .iter()
            .filter(|c| c.state == CellState::Empty)
            .count() as u8
    }

    /// Number of empty cells in the given column.
    pub fn col_empty_count(&self, col: usize) -> u8 {
        self.cells
            .iter()
            .filter(|row| row[col].state == CellState::Empty)
            .count() as u8
    }

    /// Total number of empty cells remaining on the board.
    pub fn count_empty(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.state == CellState::Empty)
            .count()
    }

    /// True once no cell is empty.
    pub fn is_solved(&self) -> bool {
        self.count_empty() == 0
    }

    /// True if every cell's current state equals its reference-solution
    /// state. Only meaningful when a reference solution was supplied;
    /// cells without one compare `None == Some(_)` and always fail, so
    /// callers should only rely on this when they know a reference was
    /// attached to every cell.
    pub fn matches_reference(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|c| c.reference == Some(c.state))
    }

    /// True if any cell carries a reference-solution state. Callers use
    /// this to decide whether [`Board::matches_reference`] is meaningful
    /// for this board at all.
    pub fn has_reference(&self) -> bool {
        self.cells.iter().flatten().any(|c| c.reference.is_some())
    }

    /// Opaque snapshot of the whole grid: one character per cell, in
    /// row-major order.
    pub fn snapshot(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(|c| c.state.snapshot_char(c.is_hint))
            .collect()
    }

    /// Restores a previously captured [`Board::snapshot`]. Hint-shape maps
    /// are immutable board attributes and are untouched by restore.
    pub fn restore(&mut self, snapshot: &str) {
        for (idx, ch) in snapshot.chars().enumerate() {
            let (row, col) = (idx / DIMENSION, idx % DIMENSION);
            let (state, is_hint) = CellState::from_snapshot_char(ch);
            let cell = &mut self.cells[row][col];
            cell.state = state;
            cell.is_hint = is_hint;
        }
    }

    /// Finds every *complete* ship run: a maximal run of [`CellState::Ship`]
    /// cells bounded on both ends by sea or the edge (and, for length-1
    /// runs, also bounded by sea on the perpendicular axis).
    ///
    /// Horizontal runs are swept first; cells already recorded are marked
    /// so the vertical sweep does not double-count submarines found
    /// horizontally.
    pub fn find_ship_runs(&self) -> Vec<(u8, Vec<(usize, usize)>)> {
        let mut runs = Vec::new();
        let mut claimed = vec![vec![false; DIMENSION]; DIMENSION];

        for row in 0..DIMENSION {
            let mut col = 0;
            while col < DIMENSION {
                if self.cells[row][col].state != CellState::Ship {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < DIMENSION && self.cells[row][col].state == CellState::Ship {
                    col += 1;
                }
                let end = col - 1;
                let length = (end - start + 1) as u8;
                let begins_clean = start == 0 || self.cells[row][start - 1].state == CellState::Sea;
                let ends_clean =
                    end == DIMENSION - 1 || self.cells[row][end + 1].state == CellState::Sea;

                if begins_clean && ends_clean {
                    if length == 1 {
                        let above = self.state_at(row as isize - 1, start as isize);
                        let below = self.state_at(row as isize + 1, start as isize);
                        if above == CellState::Sea && below == CellState::Sea {
                            runs.push((1, vec![(row, start)]));
                            claimed[row][start] = true;
                        }
                    } else {
                        let coords: Vec<_> = (start..=end).map(|c| (row, c)).collect();
                        for &(r, c) in &coords {
                            claimed[r][c] = true;
                        }
                        runs.push((length, coords));
                    }
                }
            }
        }

        for col in 0..DIMENSION {
            let mut row = 0;
            while row < DIMENSION {
                if self.cells[row][col].state != CellState::Ship || claimed[row][col] {
                    row += 1;
                    continue;
                }
                let start = row;
                while row < DIMENSION
                    && self.cells[row][col].state == CellState::Ship
                    && !claimed[row][col]
                {
                    row += 1;
                }
                let end = row - 1;
                let length = (end - start + 1) as u8;
                if length < 2 {
                    continue;
                }
                let begins_clean = start == 0 || self.cells[start - 1][col].state == CellState::Sea;
                let ends_clean =
                    end == DIMENSION - 1 || self.cells[end + 1][col].state == CellState::Sea;

                if begins_clean && ends_clean {
                    let coords: Vec<_> = (start..=end).map(|r| (r, col)).collect();
                    runs.push((length, coords));
                }
            }
        }

        runs
    }

    /// The fleet multiset minus the lengths of every complete run found on
    /// the board, one-for-one. A placed run whose size isn't in the fleet
    /// at all is left for [`Board::fleet_consistent`] to reject; this
    /// method only removes sizes that are actually present.
    pub fn remaining_fleet(&self) -> Vec<u8> {
        let mut remaining: Vec<u8> = self.fleet.to_vec();
        for (length, _) in self.find_ship_runs() {
            if let Some(pos) = remaining.iter().position(|&size| size == length) {
                remaining.remove(pos);
            }
        }
        remaining
    }

    /// True iff no complete run exceeds the fleet's longest ship, and for
    /// every length the count of placed runs of that length does not
    /// exceed the fleet's count of that length.
    pub fn fleet_consistent(&self) -> bool {
        let max_len = self.fleet.iter().copied().max().unwrap_or(0);
        let runs = self.find_ship_runs();

        if runs.iter().any(|(len, _)| *len > max_len) {
            return false;
        }

        for &size in &self.fleet {
            let placed = runs.iter().filter(|(len, _)| *len == size).count();
            let available = self.fleet.iter().filter(|&&f| f == size).count();
            if placed > available {
                return false;
            }
        }

        true
    }
}

impl Display for Board {
    /// Renders the board as a 10x10 ASCII grid: one line of column
    /// headers, then one row per line.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "   A B C D E F G H I J")?;
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{:02} ", row + 1)?;
            for cell in cells {
                let ch = match cell.state {
                    CellState::Empty => '.',
                    CellState::Sea => '~',
                    CellState::Ship => '#',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn empty_board() -> Board {
        Board::new([0; DIMENSION], [0; DIMENSION])
    }

    #[rstest]
    fn test_new_board_is_all_empty(empty_board: Board) {
        assert_eq!(empty_board.count_empty(), DIMENSION * DIMENSION);
        assert!(!empty_board.is_solved());
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(9, 9, true)]
    #[case(-1, 0, false)]
    #[case(0, -1, false)]
    #[case(10, 0, false)]
    #[case(0, 10, false)]
    fn test_within_bounds(#[case] row: isize, #[case] col: isize, #[case] expected: bool) {
        let board = Board::new([0; DIMENSION], [0; DIMENSION]);
        assert_eq!(board.within_bounds(row, col), expected);
    }

    #[rstest]
    fn test_state_at_off_board_is_sea(empty_board: Board) {
        assert_eq!(empty_board.state_at(-1, 0), CellState::Sea);
        assert_eq!(empty_board.state_at(0, -1), CellState::Sea);
        assert_eq!(empty_board.state_at(10, 0), CellState::Sea);
        assert_eq!(empty_board.state_at(0, 10), CellState::Sea);
    }

    #[rstest]
    fn test_snapshot_round_trip() {
        let mut board = Board::new([3, 0, 0, 0, 0, 0, 0, 0, 0, 0], [1, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
        board.cell_mut(0, 0).state = CellState::Ship;
        board.cell_mut(0, 1).state = CellState::Ship;
        board.cell_mut(0, 2).state = CellState::Ship;
        board.cell_mut(1, 0).state = CellState::Sea;
        board.set_hint(5, 5, CellState::Ship, HintShape::from_token("sub"));

        let snapshot = board.snapshot();
        assert_eq!(snapshot.len(), DIMENSION * DIMENSION);

        let mut restored = Board::new([0; DIMENSION], [0; DIMENSION]);
        restored.restore(&snapshot);

        for row in 0..DIMENSION {
            for col in 0..DIMENSION {
                assert_eq!(restored.cell(row, col).state, board.cell(row, col).state);
                assert_eq!(restored.cell(row, col).is_hint, board.cell(row, col).is_hint);
            }
        }
    }

    #[rstest]
    fn test_find_ship_runs_counts_complete_ships() {
        let mut board = Board::new([0; DIMENSION], [0; DIMENSION]);
        for c in 0..3 {
            board.cell_mut(0, c).state = CellState::Ship;
        }
        board.cell_mut(0, 3).state = CellState::Sea;

        for r in 0..2 {
            board.cell_mut(r, 5).state = CellState::Ship;
        }
        board.cell_mut(2, 5).state = CellState::Sea;

        let mut sizes: Vec<u8> = board.find_ship_runs().iter().map(|(len, _)| *len).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(sizes, vec![3, 2]);
    }

    #[rstest]
    fn test_find_ship_runs_submarine_needs_clean_perpendicular() {
        let mut board = Board::new([0; DIMENSION], [0; DIMENSION]);
        board.cell_mut(5, 5).state = CellState::Ship;
        // Touching diagonally doesn't block, but a ship directly above does.
        board.cell_mut(4, 5).state = CellState::Ship;
        board.cell_mut(3, 5).state = CellState::Sea;

        let runs = board.find_ship_runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].0, 2);
    }

    #[rstest]
    fn test_fleet_consistent_rejects_oversized_ship() {
        let mut board = Board::new([0; DIMENSION], [0; DIMENSION]);
        for c in 0..5 {
            board.cell_mut(0, c).state = CellState::Ship;
        }
        board.cell_mut(0, 5).state = CellState::Sea;
        assert!(!board.fleet_consistent());
    }

    #[rstest]
    fn test_fleet_consistent_rejects_too_many_of_a_size() {
        let mut board = Board::new([0; DIMENSION], [0; DIMENSION]);
        for row in [0usize, 2, 4] {
            for c in 0..3 {
                board.cell_mut(row, c).state = CellState::Ship;
            }
            if row + 1 < DIMENSION {
                board.cell_mut(row + 1, 0).state = CellState::Sea;
            }
        }
        // Three length-3 runs placed; fleet only has two cruisers/one submarine slot each size 3.
        assert!(!board.fleet_consistent());
    }

    #[rstest]
    fn test_remaining_fleet_removes_placed_sizes() {
        let mut board = Board::new([0; DIMENSION], [0; DIMENSION]);
        for c in 0..4 {
            board.cell_mut(0, c).state = CellState::Ship;
        }
        board.cell_mut(0, 4).state = CellState::Sea;

        let remaining = board.remaining_fleet();
        assert_eq!(remaining.len(), FLEET.len() - 1);
        assert!(!remaining.contains(&4));
    }

    #[rstest]
    #[case("0", Some(CellState::Empty))]
    #[case("empty", Some(CellState::Empty))]
    #[case("unknown", Some(CellState::Empty))]
    #[case("1", Some(CellState::Sea))]
    #[case("water", Some(CellState::Sea))]
    #[case("2", Some(CellState::Ship))]
    #[case("SHIP", Some(CellState::Ship))]
    #[case("bogus", None)]
    fn test_cell_state_from_token(#[case] token: &str, #[case] expected: Option<CellState>) {
        assert_eq!(CellState::from_token(token), expected);
    }

    #[rstest]
    fn test_hint_shape_from_token_left() {
        let shape = HintShape::from_token("left").unwrap();
        assert_eq!(shape.expected((0, 1)), Some(CellState::Ship));
        assert_eq!(shape.expected((0, -1)), Some(CellState::Sea));
        assert_eq!(shape.expected((-1, 0)), Some(CellState::Sea));
        assert_eq!(shape.expected((1, 0)), Some(CellState::Sea));
    }

    #[rstest]
    fn test_hint_shape_ambiguous_middle_has_no_single_token() {
        assert!(HintShape::from_token("mid").is_none());
    }

    #[rstest]
    #[should_panic(expected = "is not a valid coordinate")]
    fn test_set_hint_out_of_bounds_panics() {
        let mut board = Board::new([0; DIMENSION], [0; DIMENSION]);
        board.set_hint(DIMENSION, 0, CellState::Ship, None);
    }
}
