//! Module for parsing and representing TSP instances.
//!
//! An instance is a square distance matrix, optionally paired with the 2-D
//! coordinates of its points. Both come from flat whitespace-separated files:
//! one `x y` pair per line for coordinates, one matrix row per line for
//! distances.

use crate::error::{Result, TspError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Represents a complete TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TspInstance {
    /// Name of the instance (file stem when loaded from disk)
    pub name: String,
    /// Number of points
    pub dimension: usize,
    /// Point coordinates; empty when only a distance matrix was loaded
    pub points: Vec<Point>,
    /// Distance matrix, `distance_matrix[i][j]` is the cost of going from i to j
    #[serde(skip)]
    pub distance_matrix: Vec<Vec<f64>>,
}

impl TspInstance {
    /// Build an instance from a distance matrix.
    ///
    /// Fails if the matrix is empty, not square, or holds a negative or
    /// non-finite entry.
    pub fn from_matrix(distance_matrix: Vec<Vec<f64>>) -> Result<Self> {
        let dimension = validate_matrix(&distance_matrix)?;
        Ok(TspInstance {
            name: String::from("unnamed"),
            dimension,
            points: Vec::new(),
            distance_matrix,
        })
    }

    /// Build an instance from coordinates, deriving a Euclidean distance matrix
    pub fn from_points(points: Vec<Point>) -> Result<Self> {
        let distance_matrix = Self::compute_distance_matrix(&points);
        let dimension = validate_matrix(&distance_matrix)?;
        Ok(TspInstance {
            name: String::from("unnamed"),
            dimension,
            points,
            distance_matrix,
        })
    }

    /// Attach coordinates to a matrix-only instance
    pub fn with_points(mut self, points: Vec<Point>) -> Result<Self> {
        if points.len() != self.dimension {
            return Err(TspError::DimensionMismatch {
                coords: points.len(),
                dimension: self.dimension,
            });
        }
        self.points = points;
        Ok(self)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Load an instance from a distance file and, optionally, a coordinate file.
    ///
    /// With no distance file the matrix is derived from the coordinates.
    pub fn from_files(distances: Option<&Path>, coords: Option<&Path>) -> Result<Self> {
        let name = distances
            .or(coords)
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("unnamed"));

        let instance = match (distances, coords) {
            (Some(dist_path), Some(coord_path)) => {
                let matrix = read_distance_matrix(dist_path)?;
                let points = read_coordinates(coord_path)?;
                Self::from_matrix(matrix)?.with_points(points)?
            }
            (Some(dist_path), None) => Self::from_matrix(read_distance_matrix(dist_path)?)?,
            (None, Some(coord_path)) => Self::from_points(read_coordinates(coord_path)?)?,
            (None, None) => {
                return Err(TspError::Config(
                    "a distance file or a coordinate file is required".to_string(),
                ))
            }
        };

        Ok(instance.with_name(&name))
    }

    /// Compute Euclidean distance matrix
    fn compute_distance_matrix(points: &[Point]) -> Vec<Vec<f64>> {
        let n = points.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = points[i].distance_to(&points[j]);
                }
            }
        }

        matrix
    }

    /// Get the distance between two points
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    pub fn has_points(&self) -> bool {
        !self.points.is_empty()
    }

    /// Whether `distance[i][j] == distance[j][i]` exactly for every pair
    pub fn is_symmetric(&self) -> bool {
        (0..self.dimension).all(|i| (i + 1..self.dimension).all(|j| self.distance(i, j) == self.distance(j, i)))
    }

    /// Closed-tour length without bounds checks beyond slice indexing.
    /// The tour must already be a permutation of `0..dimension`.
    #[inline]
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        tour_length(tour, &self.distance_matrix)
    }

    /// Closed-tour length of a tour that is first checked to be a permutation
    /// of `0..dimension`
    pub fn checked_tour_length(&self, tour: &[usize]) -> Result<f64> {
        self.validate_tour(tour)?;
        Ok(self.tour_length(tour))
    }

    /// Verify that a tour visits every point exactly once
    pub fn validate_tour(&self, tour: &[usize]) -> Result<()> {
        if tour.len() != self.dimension {
            return Err(TspError::TourLengthMismatch {
                found: tour.len(),
                expected: self.dimension,
            });
        }

        let mut seen = vec![false; self.dimension];
        for &index in tour {
            if index >= self.dimension {
                return Err(TspError::IndexOutOfRange {
                    index,
                    dimension: self.dimension,
                });
            }
            if seen[index] {
                return Err(TspError::DuplicateIndex { index });
            }
            seen[index] = true;
        }

        Ok(())
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut distances: Vec<f64> = Vec::new();
        for i in 0..self.dimension {
            for j in 0..self.dimension {
                if i != j {
                    distances.push(self.distance(i, j));
                }
            }
        }

        let (avg_distance, min_distance, max_distance) = if distances.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                distances.iter().sum::<f64>() / distances.len() as f64,
                distances.iter().cloned().fold(f64::INFINITY, f64::min),
                distances.iter().cloned().fold(0.0, f64::max),
            )
        };

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            has_coordinates: self.has_points(),
            symmetric: self.is_symmetric(),
            avg_distance,
            min_distance,
            max_distance,
        }
    }
}

/// Sum of `matrix[tour[k]][tour[k + 1]]` plus the closing edge back to
/// `tour[0]`. Tours with fewer than two positions have length 0.
pub fn tour_length(tour: &[usize], matrix: &[Vec<f64>]) -> f64 {
    if tour.len() < 2 {
        return 0.0;
    }

    let mut length = 0.0;
    for i in 0..tour.len() - 1 {
        length += matrix[tour[i]][tour[i + 1]];
    }

    length += matrix[tour[tour.len() - 1]][tour[0]];

    length
}

/// Check that a matrix is non-empty, square, and holds finite non-negative
/// values. Returns its dimension.
pub fn validate_matrix(matrix: &[Vec<f64>]) -> Result<usize> {
    let n = matrix.len();
    if n == 0 {
        return Err(TspError::EmptyMatrix);
    }

    for (row, values) in matrix.iter().enumerate() {
        if values.len() != n {
            return Err(TspError::RaggedRow {
                row,
                found: values.len(),
                expected: n,
            });
        }
        for (col, &value) in values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(TspError::InvalidDistance { row, col, value });
            }
        }
    }

    Ok(n)
}

/// Parse `x y` pairs, one per line. Blank lines are skipped.
pub fn parse_coordinates<R: BufRead>(reader: R) -> Result<Vec<Point>> {
    let mut points = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| TspError::Parse {
            line: line_no,
            message: format!("Read error: {}", e),
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(TspError::Parse {
                line: line_no,
                message: format!("expected `x y`, found {:?}", line),
            });
        }
        let x = parse_number(parts[0], line_no)?;
        let y = parse_number(parts[1], line_no)?;
        points.push(Point::new(x, y));
    }

    Ok(points)
}

/// Parse a distance matrix, one row per line. Blank lines are skipped.
/// Shape is not checked here; see [`validate_matrix`].
pub fn parse_distance_matrix<R: BufRead>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut matrix = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| TspError::Parse {
            line: line_no,
            message: format!("Read error: {}", e),
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|token| parse_number(token, line_no))
            .collect::<Result<Vec<f64>>>()?;
        matrix.push(row);
    }

    Ok(matrix)
}

pub fn read_coordinates<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    parse_coordinates(open(path.as_ref())?)
}

pub fn read_distance_matrix<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    parse_distance_matrix(open(path.as_ref())?)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| TspError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn parse_number(token: &str, line: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| TspError::Parse {
        line,
        message: format!("invalid number {:?}", token),
    })
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub has_coordinates: bool,
    pub symmetric: bool,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Points: {}", self.dimension)?;
        writeln!(f, "  Coordinates: {}", if self.has_coordinates { "yes" } else { "no" })?;
        writeln!(f, "  Symmetric: {}", self.symmetric)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn unit_square() -> TspInstance {
        TspInstance::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_distance_calculation() {
        let points = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let matrix = TspInstance::compute_distance_matrix(&points);

        assert!((matrix[0][1] - 5.0).abs() < 1e-10);
        assert!((matrix[1][0] - 5.0).abs() < 1e-10);
        assert_eq!(matrix[0][0], 0.0);
    }

    #[test]
    fn test_tour_length_closes_the_loop() {
        let instance = unit_square();
        assert!((instance.tour_length(&[0, 1, 2, 3]) - 4.0).abs() < 1e-12);
        let diagonal = 2.0 + 2.0 * 2f64.sqrt();
        assert!((instance.tour_length(&[0, 2, 1, 3]) - diagonal).abs() < 1e-12);
    }

    #[test]
    fn test_tour_length_asymmetric() {
        let matrix = vec![
            vec![0.0, 1.0, 10.0],
            vec![10.0, 0.0, 1.0],
            vec![1.0, 10.0, 0.0],
        ];
        let instance = TspInstance::from_matrix(matrix).unwrap();
        assert_eq!(instance.tour_length(&[0, 1, 2]), 3.0);
        assert_eq!(instance.tour_length(&[0, 2, 1]), 30.0);
        assert!(!instance.is_symmetric());
    }

    #[test]
    fn test_tiny_asymmetry_is_not_symmetric() {
        let matrix = vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0 + 1e-12, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ];
        let instance = TspInstance::from_matrix(matrix).unwrap();
        assert!(!instance.is_symmetric());

        let mut fixed = instance.clone();
        fixed.distance_matrix[1][0] = 1.0;
        assert!(fixed.is_symmetric());
    }

    #[test]
    fn test_short_tours_have_zero_length() {
        let instance = TspInstance::from_matrix(vec![vec![0.0]]).unwrap();
        assert_eq!(instance.tour_length(&[0]), 0.0);
        assert_eq!(tour_length(&[], &[]), 0.0);
    }

    #[test]
    fn test_checked_tour_length_rejects_bad_tours() {
        let instance = unit_square();

        assert!(matches!(
            instance.checked_tour_length(&[0, 1, 2]),
            Err(TspError::TourLengthMismatch { found: 3, expected: 4 })
        ));
        assert!(matches!(
            instance.checked_tour_length(&[0, 1, 2, 7]),
            Err(TspError::IndexOutOfRange { index: 7, dimension: 4 })
        ));
        assert!(matches!(
            instance.checked_tour_length(&[0, 1, 1, 3]),
            Err(TspError::DuplicateIndex { index: 1 })
        ));
        assert!(instance.checked_tour_length(&[3, 2, 1, 0]).is_ok());
    }

    #[test]
    fn test_validate_matrix() {
        assert!(matches!(validate_matrix(&[]), Err(TspError::EmptyMatrix)));
        assert!(matches!(
            validate_matrix(&[vec![0.0, 1.0], vec![1.0]]),
            Err(TspError::RaggedRow { row: 1, found: 1, expected: 2 })
        ));
        assert!(matches!(
            validate_matrix(&[vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 3.0]]),
            Err(TspError::RaggedRow { row: 0, .. })
        ));
        assert!(matches!(
            validate_matrix(&[vec![0.0, -1.0], vec![1.0, 0.0]]),
            Err(TspError::InvalidDistance { row: 0, col: 1, .. })
        ));
        assert!(matches!(
            validate_matrix(&[vec![0.0, f64::NAN], vec![1.0, 0.0]]),
            Err(TspError::InvalidDistance { .. })
        ));
        assert_eq!(validate_matrix(&[vec![0.0, 2.0], vec![3.0, 0.0]]).unwrap(), 2);
    }

    #[test]
    fn test_parse_files() {
        let coords = "0 0\n0 1\n\n  1 1\n1 0\n";
        let points = parse_coordinates(Cursor::new(coords)).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[2], Point::new(1.0, 1.0));

        let dist = "0 1 2\n1 0 3\n2   3 0\n";
        let matrix = parse_distance_matrix(Cursor::new(dist)).unwrap();
        assert_eq!(matrix, vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ]);

        let err = parse_distance_matrix(Cursor::new("0 1\n1 x\n")).unwrap_err();
        assert!(matches!(err, TspError::Parse { line: 2, .. }));
        let err = parse_coordinates(Cursor::new("1.5\n")).unwrap_err();
        assert!(matches!(err, TspError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_from_files() {
        let dir = std::env::temp_dir().join(format!("tsp-anneal-instance-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let coord_path = dir.join("square_coords.txt");
        let dist_path = dir.join("square.txt");
        std::fs::write(&coord_path, "0 0\n0 1\n1 1\n1 0\n").unwrap();
        std::fs::write(&dist_path, "0 1 2\n1 0 1\n2 1 0\n").unwrap();

        let from_coords = TspInstance::from_files(None, Some(&coord_path)).unwrap();
        assert_eq!(from_coords.dimension, 4);
        assert_eq!(from_coords.name, "square_coords");
        assert!(from_coords.has_points());

        let mismatch = TspInstance::from_files(Some(&dist_path), Some(&coord_path));
        assert!(matches!(mismatch, Err(TspError::DimensionMismatch { coords: 4, dimension: 3 })));

        let missing = TspInstance::from_files(Some(&dir.join("missing.txt")), None);
        assert!(matches!(missing, Err(TspError::Io { .. })));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_statistics() {
        let stats = unit_square().statistics();
        assert_eq!(stats.dimension, 4);
        assert!(stats.symmetric);
        assert!((stats.min_distance - 1.0).abs() < 1e-12);
        assert!((stats.max_distance - 2f64.sqrt()).abs() < 1e-12);
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        fn matrix_and_tour(symmetric: bool) -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<usize>)> {
            (2usize..25).prop_flat_map(move |n| {
                (
                    proptest::collection::vec(proptest::collection::vec(0.0f64..1000.0, n), n),
                    Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                )
                    .prop_map(move |(mut matrix, tour)| {
                        if symmetric {
                            for i in 0..n {
                                for j in 0..i {
                                    matrix[i][j] = matrix[j][i];
                                }
                            }
                        }
                        (matrix, tour)
                    })
            })
        }

        proptest! {
            #[test]
            fn length_is_rotation_invariant((matrix, tour) in matrix_and_tour(false), k in 0usize..25) {
                let mut rotated = tour.clone();
                let shift = k % tour.len();
                rotated.rotate_left(shift);
                let a = tour_length(&tour, &matrix);
                let b = tour_length(&rotated, &matrix);
                prop_assert!((a - b).abs() <= 1e-9 * a.max(1.0));
            }

            #[test]
            fn length_is_direction_invariant_when_symmetric((matrix, tour) in matrix_and_tour(true)) {
                let reversed: Vec<usize> = tour.iter().rev().cloned().collect();
                let a = tour_length(&tour, &matrix);
                let b = tour_length(&reversed, &matrix);
                prop_assert!((a - b).abs() <= 1e-9 * a.max(1.0));
            }

            #[test]
            fn length_is_non_negative((matrix, tour) in matrix_and_tour(false)) {
                let instance = TspInstance::from_matrix(matrix).unwrap();
                let length = instance.checked_tour_length(&tour).unwrap();
                prop_assert!(length >= 0.0 && length.is_finite());
            }
        }
    }
}
