//! 2-opt local search.
//!
//! A 2-opt move removes edges `(a, b)` and `(c, d)` and reconnects the tour
//! as `(a, c)` and `(b, d)` by reversing the segment from `b` to `c`. The
//! search applies every strictly improving move it finds and repeats full
//! passes until one pass makes no change.
//!
//! # Reference
//!
//! Croes, G. A. (1958). "A Method for Solving Traveling-Salesman Problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceModel;
use crate::types::AntTour;

/// Minimum gain for a move to count as an improvement, relative to the
/// length of the two removed edges.
const IMPROVEMENT_EPSILON: f64 = 1e-10;

/// Improves `tour` in place and returns the number of moves applied.
///
/// Deterministic. The result is still a permutation and its cyclic length
/// never exceeds the input's. Tours of fewer than four cities have no
/// non-adjacent edge pairs and are left untouched.
pub fn two_opt(tour: &mut [usize], model: &DistanceModel) -> usize {
    let n = tour.len();
    if n < 4 {
        return 0;
    }

    let mut moves = 0;
    loop {
        let mut improved = false;
        for i in 0..n - 2 {
            for j in (i + 2)..n {
                // Edges (i, i+1) and (n-1, 0) share city tour[0].
                if i == 0 && j == n - 1 {
                    continue;
                }
                let a = tour[i];
                let b = tour[i + 1];
                let c = tour[j];
                let d = tour[(j + 1) % n];
                let removed = model.distance(a, b) + model.distance(c, d);
                let delta = model.distance(a, c) + model.distance(b, d) - removed;
                // Scaled so rounding noise at large coordinates never reads
                // as a gain; otherwise a zero-gain move and its inverse can
                // alternate forever.
                if delta < -IMPROVEMENT_EPSILON * removed.max(1.0) {
                    tour[i + 1..=j].reverse();
                    moves += 1;
                    improved = true;
                }
            }
        }
        if !improved {
            return moves;
        }
    }
}

/// Applies [`two_opt`] to an ant's tour and refreshes its distance.
pub fn improve(ant: &mut AntTour, model: &DistanceModel) {
    if two_opt(&mut ant.tour, model) > 0 {
        ant.distance = model.tour_length(&ant.tour);
    }
}
