//! TSP Annealer Library
//!
//! Approximates the Traveling Salesman Problem with simulated annealing over
//! a distance matrix.
//!
//! # Features
//!
//! - Closed-tour length evaluation with input validation
//! - Segment reversal (2-opt style) neighborhood with an optional O(1) delta
//! - Geometric cooling schedule and Metropolis acceptance
//! - Pluggable random source for reproducible runs
//! - Nearest neighbor baseline, seeded benchmarking and SVG output
//!
//! # Example
//!
//! ```no_run
//! use tsp_anneal::instance::TspInstance;
//! use tsp_anneal::heuristics::annealing::{AnnealingConfig, SimulatedAnnealing};
//! use std::path::Path;
//!
//! // Load instance
//! let instance = TspInstance::from_files(Some(Path::new("Dist1.txt")), None).unwrap();
//!
//! // Anneal with a fixed seed
//! let sa = SimulatedAnnealing::with_config(AnnealingConfig::default().with_seed(42));
//! let solution = sa.solve(&instance).unwrap();
//!
//! println!("Tour length: {:.2}", solution.cost);
//! ```

pub mod error;
pub mod instance;
pub mod solution;
pub mod heuristics;
pub mod benchmark;
pub mod visualization;

pub use error::{Result, TspError};
pub use instance::TspInstance;
pub use solution::Solution;
