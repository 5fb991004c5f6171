//! Solution representation for the TSP.
//!
//! A solution is a closed tour over every point of an instance together
//! with its length and some bookkeeping about the run that produced it.

use crate::error::Result;
use crate::instance::TspInstance;
use serde::{Deserialize, Serialize};

/// Represents a solution to the TSP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Visiting order, implicitly returning to `tour[0]`
    pub tour: Vec<usize>,
    /// Total closed-tour length
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
    /// Seed used by a stochastic algorithm (if applicable)
    pub seed: Option<u64>,
}

impl Solution {
    /// Create a new empty solution
    pub fn new() -> Self {
        Solution {
            tour: Vec::new(),
            cost: f64::INFINITY,
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: None,
            seed: None,
        }
    }

    /// Create a solution from a tour, checking that it is a permutation
    pub fn from_tour(instance: &TspInstance, tour: Vec<usize>, algorithm: &str) -> Result<Self> {
        let cost = instance.checked_tour_length(&tour)?;

        Ok(Solution {
            tour,
            cost,
            algorithm: algorithm.to_string(),
            ..Self::new()
        })
    }

    /// Check if all points are visited exactly once
    pub fn is_complete(&self, instance: &TspInstance) -> bool {
        instance.validate_tour(&self.tour).is_ok()
    }

    /// Get the position of a point in the tour
    pub fn position(&self, node: usize) -> Option<usize> {
        self.tour.iter().position(|&n| n == node)
    }

    /// Get the point at a given position (circular), `None` for an empty tour
    pub fn node_at(&self, pos: usize) -> Option<usize> {
        if self.tour.is_empty() {
            return None;
        }
        Some(self.tour[pos % self.tour.len()])
    }

    /// Get the successor of a point in the tour
    pub fn successor(&self, node: usize) -> Option<usize> {
        self.position(node).and_then(|pos| self.node_at(pos + 1))
    }

    /// Same tour rotated so that it starts at `node`; the length is unchanged
    pub fn rotated_to(&self, node: usize) -> Option<Vec<usize>> {
        self.position(node).map(|pos| {
            let mut tour = self.tour.clone();
            tour.rotate_left(pos);
            tour
        })
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Length: {:.4}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        if let Some(seed) = self.seed {
            writeln!(f, "  Seed: {}", seed)?;
        }
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}
