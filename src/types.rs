//! Core value types shared by the engine components.

use std::sync::mpsc::Sender;

/// A city: its index and planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(index: usize, x: f64, y: f64) -> Self {
        Self { index, x, y }
    }

    /// Builds cities from coordinates, indexed by position.
    pub fn from_coords(coords: &[(f64, f64)]) -> Vec<City> {
        coords
            .iter()
            .enumerate()
            .map(|(index, &(x, y))| City::new(index, x, y))
            .collect()
    }

    /// Euclidean distance to another city.
    pub fn distance_to(&self, other: &City) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A closed tour: a permutation of city indices. The last city connects
/// back to the first.
pub type Tour = Vec<usize>;

/// Returns `true` if `tour` visits every index in `0..n` exactly once.
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}

/// One ant's constructed tour and its cyclic length.
#[derive(Debug, Clone, PartialEq)]
pub struct AntTour {
    pub tour: Tour,
    pub distance: f64,
}

/// The best tour known for a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestSolution {
    pub tour: Tour,
    pub distance: f64,
}

impl BestSolution {
    /// Replaces the held tour if `candidate` is strictly shorter.
    ///
    /// Returns `true` when the solution changed.
    pub fn offer(&mut self, candidate: &AntTour) -> bool {
        if candidate.distance < self.distance {
            self.tour.clone_from(&candidate.tour);
            self.distance = candidate.distance;
            true
        } else {
            false
        }
    }
}

impl From<&AntTour> for BestSolution {
    fn from(ant: &AntTour) -> Self {
        Self {
            tour: ant.tour.clone(),
            distance: ant.distance,
        }
    }
}

/// Minimum positive and maximum trail values of a pheromone matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PheromoneStats {
    pub min: f64,
    pub max: f64,
}

/// Progress of one completed iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    /// Zero-based iteration index.
    pub iteration: usize,

    /// Best-so-far tour length.
    pub best_distance: f64,

    /// Shortest tour constructed during this iteration.
    pub iteration_best_distance: f64,

    /// Mean tour length over this iteration's ants.
    pub avg_distance: f64,

    /// Best-so-far tour.
    pub best_path: Tour,

    /// Trail statistics after this iteration's update.
    pub pheromone_stats: PheromoneStats,

    /// Full trail matrix, when [`record_pheromones`](crate::AcoConfig::record_pheromones) is set.
    pub pheromones: Option<Vec<Vec<f64>>>,
}

/// Receives one [`IterationRecord`] per completed iteration.
///
/// Implementations must not block the colony: the runner starts the next
/// iteration as soon as `on_iteration` returns.
///
/// Closures taking an `IterationRecord` implement this trait, as does
/// [`ChannelSink`] for handing records to another thread.
pub trait IterationSink {
    fn on_iteration(&mut self, record: IterationRecord);
}

impl<F> IterationSink for F
where
    F: FnMut(IterationRecord),
{
    fn on_iteration(&mut self, record: IterationRecord) {
        self(record)
    }
}

/// Forwards records over an unbounded channel.
///
/// A disconnected receiver is logged once and later records are dropped.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<IterationRecord>,
    disconnected: bool,
}

impl ChannelSink {
    pub fn new(sender: Sender<IterationRecord>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }
}

impl IterationSink for ChannelSink {
    fn on_iteration(&mut self, record: IterationRecord) {
        if self.disconnected {
            return;
        }
        let iteration = record.iteration;
        if self.sender.send(record).is_err() {
            self.disconnected = true;
            tracing::warn!(
                event = "sink_disconnected",
                iteration = iteration,
                "iteration receiver dropped; discarding further records"
            );
        }
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl IterationSink for NullSink {
    fn on_iteration(&mut self, _record: IterationRecord) {}
}
