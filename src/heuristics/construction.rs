//! Construction heuristics for the TSP.

use crate::error::Result;
use crate::instance::TspInstance;
use crate::solution::Solution;
use ordered_float::OrderedFloat;

pub trait ConstructionHeuristic {
    fn construct(&self, instance: &TspInstance) -> Result<Solution>;
    fn name(&self) -> &str;
}

/// Nearest Neighbor Heuristic
///
/// Builds a tour by repeatedly moving to the closest unvisited point.
/// Ties go to the lowest index.
pub struct NearestNeighborHeuristic {
    /// Point the tour starts from
    pub start: usize,
}

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        NearestNeighborHeuristic { start: 0 }
    }

    pub fn from_start(start: usize) -> Self {
        NearestNeighborHeuristic { start }
    }

    fn find_nearest(&self, instance: &TspInstance, current: usize, visited: &[bool]) -> Option<usize> {
        (0..instance.dimension)
            .filter(|&n| !visited[n])
            .min_by_key(|&n| OrderedFloat(instance.distance(current, n)))
    }
}

impl Default for NearestNeighborHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, instance: &TspInstance) -> Result<Solution> {
        let start = std::time::Instant::now();
        let n = instance.dimension;

        let mut tour = Vec::with_capacity(n);
        let mut visited = vec![false; n];

        if self.start < n {
            let mut current = self.start;
            tour.push(current);
            visited[current] = true;

            while let Some(next) = self.find_nearest(instance, current, &visited) {
                tour.push(next);
                visited[next] = true;
                current = next;
            }
        }

        // An out-of-range start leaves the tour empty, which from_tour rejects.
        let mut solution = Solution::from_tour(instance, tour, self.name())?;
        solution.computation_time = start.elapsed().as_secs_f64();
        Ok(solution)
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Point;

    #[test]
    fn test_nearest_neighbor_on_line() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(3.0, 0.0),
        ];
        let instance = TspInstance::from_points(points).unwrap();
        let sol = NearestNeighborHeuristic::new().construct(&instance).unwrap();
        assert_eq!(sol.tour, vec![0, 2, 3, 1]);
        assert!((sol.cost - 10.0).abs() < 1e-12);
        assert_eq!(sol.algorithm, "NearestNeighbor");
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let matrix = vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ];
        let instance = TspInstance::from_matrix(matrix).unwrap();
        let sol = NearestNeighborHeuristic::from_start(2).construct(&instance).unwrap();
        assert_eq!(sol.tour, vec![2, 0, 1]);
    }

    #[test]
    fn test_bad_start_is_an_error() {
        let instance = TspInstance::from_matrix(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert!(NearestNeighborHeuristic::from_start(5).construct(&instance).is_err());
    }
}
