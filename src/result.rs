//! The output record a solve run produces: whether the puzzle was fully
//! solved, whether it got stuck, whether the outcome matches a supplied
//! reference solution, and the full trail of deductions that got there.

use crate::board::CellState;
use crate::rules::{Proposal, Technique};

/// One cell assignment the driver actually applied, with the technique
/// that justified it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Deduction {
    pub row: usize,
    pub col: usize,
    pub value: CellState,
    pub technique: Technique,
}

impl Deduction {
    pub fn tier(&self) -> u8 {
        self.technique.tier()
    }

    pub fn difficulty(&self) -> u8 {
        self.technique.difficulty()
    }
}

impl From<Proposal> for Deduction {
    fn from(proposal: Proposal) -> Self {
        Self {
            row: proposal.row,
            col: proposal.col,
            value: proposal.value,
            technique: proposal.technique,
        }
    }
}

/// The outcome of a [`crate::driver::TieredSolver::solve`] run.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// True once every cell is determined and every invariant holds.
    pub solved: bool,
    /// True if the driver ran out of applicable rules before solving.
    pub stuck: bool,
    /// True if the board was fully solved and, when a reference solution
    /// was supplied, matches it exactly. Without a reference, this is the
    /// same as `solved`.
    pub valid: bool,
    /// Every deduction the driver applied, in application order.
    pub techniques_used: Vec<Deduction>,
}
