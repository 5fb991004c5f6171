//! Heuristics module for the TSP.
//!
//! The simulated annealing search and the pieces it is built from, plus a
//! nearest neighbor construction used as a baseline.

pub mod annealing;
pub mod construction;
pub mod cooling;
pub mod neighborhood;
pub mod random;

pub use annealing::*;
pub use construction::*;
pub use cooling::*;
pub use neighborhood::*;
pub use random::*;
