//! Distance and heuristic matrices.
//!
//! Both are computed once per run from the city coordinates and are
//! read-only afterwards. Matrices are stored row-major in flat vectors.

use crate::error::{AcoError, Result};
use crate::types::{City, Tour};

/// Heuristic value η used for two distinct cities at the same location.
///
/// Large enough to dominate any real `1/d`, small enough that `η^β` stays
/// finite for the usual exponents.
pub const COINCIDENT_HEURISTIC: f64 = 1e9;

/// Minimum number of cities for a run.
pub const MIN_CITIES: usize = 3;

/// Pairwise Euclidean distances and heuristic desirability `η = 1/d`.
#[derive(Debug, Clone)]
pub struct DistanceModel {
    n: usize,
    distances: Vec<f64>,
    heuristic: Vec<f64>,
}

impl DistanceModel {
    /// Builds the model.
    ///
    /// # Errors
    ///
    /// [`AcoError::Config`] if there are fewer than [`MIN_CITIES`] cities,
    /// a coordinate is not finite, or a city's index differs from its
    /// position.
    pub fn new(cities: &[City]) -> Result<Self> {
        let n = cities.len();
        if n < MIN_CITIES {
            return Err(AcoError::Config(format!(
                "at least {MIN_CITIES} cities are required, got {n}"
            )));
        }
        for (position, city) in cities.iter().enumerate() {
            if city.index != position {
                return Err(AcoError::Config(format!(
                    "city at position {position} has index {}",
                    city.index
                )));
            }
            if !(city.x.is_finite() && city.y.is_finite()) {
                return Err(AcoError::Config(format!(
                    "city {position} has a non-finite coordinate"
                )));
            }
        }

        let mut distances = vec![0.0; n * n];
        let mut heuristic = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cities[i].distance_to(&cities[j]);
                let eta = if d > 0.0 { 1.0 / d } else { COINCIDENT_HEURISTIC };
                distances[i * n + j] = d;
                distances[j * n + i] = d;
                heuristic[i * n + j] = eta;
                heuristic[j * n + i] = eta;
            }
        }

        Ok(Self {
            n,
            distances,
            heuristic,
        })
    }

    /// Builds the model from raw coordinates.
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self> {
        Self::new(&City::from_coords(coords))
    }

    /// Number of cities.
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[i * self.n + j]
    }

    /// η between two distinct cities. Zero on the diagonal.
    #[inline]
    pub fn heuristic(&self, i: usize, j: usize) -> f64 {
        self.heuristic[i * self.n + j]
    }

    /// Cyclic length of a tour, including the closing edge.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        match (tour.first(), tour.last()) {
            (Some(&first), Some(&last)) => {
                let open: f64 = tour.windows(2).map(|w| self.distance(w[0], w[1])).sum();
                open + self.distance(last, first)
            }
            _ => 0.0,
        }
    }

    /// Closest unvisited city to `from`, lowest index on ties.
    pub fn nearest_unvisited(&self, from: usize, visited: &[bool]) -> Option<usize> {
        let mut nearest = None;
        let mut nearest_distance = f64::INFINITY;
        for (city, &seen) in visited.iter().enumerate() {
            if seen {
                continue;
            }
            let d = self.distance(from, city);
            if nearest.is_none() || d < nearest_distance {
                nearest = Some(city);
                nearest_distance = d;
            }
        }
        nearest
    }

    /// Greedy nearest-neighbour tour starting at city 0.
    pub fn nearest_neighbor_tour(&self) -> Tour {
        let mut visited = vec![false; self.n];
        let mut tour = Vec::with_capacity(self.n);
        let mut current = 0;
        visited[current] = true;
        tour.push(current);
        while let Some(next) = self.nearest_unvisited(current, &visited) {
            visited[next] = true;
            tour.push(next);
            current = next;
        }
        tour
    }

    /// Length of [`nearest_neighbor_tour`](Self::nearest_neighbor_tour).
    pub fn nearest_neighbor_length(&self) -> f64 {
        self.tour_length(&self.nearest_neighbor_tour())
    }
}
