//! A deterministic logical solver for the 10x10 Bimaru (Battleship)
//! puzzle: a board model, a tiered library of pure deduction rules, an
//! incremental one-ply propagator, and a driver that applies them to a
//! fixed point.
//!
//! This crate is a library only — reading puzzle files, running a CLI, and
//! printing reports are all the job of whatever consumes it. Every
//! assignment this crate's driver makes is justified by a named
//! [`Technique`]; it never guesses.

pub mod board;
pub mod driver;
pub mod propagator;
pub mod result;
pub mod rules;

pub use board::{Board, Cell, CellState, HintShape};
pub use driver::TieredSolver;
pub use result::{Deduction, SolveResult};
pub use rules::Technique;
