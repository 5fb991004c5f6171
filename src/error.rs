//! Error types for the TSP annealer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for instance loading, tour evaluation and solver setup
#[derive(Debug, Error)]
pub enum TspError {
    /// A file could not be opened or read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token in an input file is not a number
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The distance matrix has no rows
    #[error("Distance matrix is empty")]
    EmptyMatrix,

    /// A row of the distance matrix does not have N entries
    #[error("Distance matrix row {row} has {found} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// A matrix entry is negative, NaN or infinite
    #[error("Invalid distance {value} at ({row}, {col})")]
    InvalidDistance { row: usize, col: usize, value: f64 },

    /// Coordinates and matrix disagree on the number of points
    #[error("{coords} coordinates given for a {dimension}x{dimension} distance matrix")]
    DimensionMismatch { coords: usize, dimension: usize },

    /// A tour does not visit as many positions as the matrix has points
    #[error("Tour has {found} positions, expected {expected}")]
    TourLengthMismatch { found: usize, expected: usize },

    /// A tour references a point outside 0..N
    #[error("Tour index {index} is out of range for {dimension} points")]
    IndexOutOfRange { index: usize, dimension: usize },

    /// A tour visits the same point twice
    #[error("Tour visits point {index} more than once")]
    DuplicateIndex { index: usize },

    /// Invalid solver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation needs coordinates but the instance was loaded without them
    #[error("Instance has no coordinates")]
    MissingCoordinates,
}

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, TspError>;
