//! Ant Colony Optimization for the symmetric Euclidean Traveling Salesman
//! Problem.
//!
//! Provides four pheromone update variants over a shared construction and
//! local-search core:
//!
//! - **Ant System (AS)**: every ant deposits in proportion to its tour quality.
//! - **Ant Colony System (ACS)**: pseudo-random proportional choice, a local
//!   update during construction and a global-best-only deposit.
//! - **MAX-MIN Ant System (MMAS)**: a single depositing ant (iteration-best,
//!   then global-best) with trails clamped into `[τ_min, τ_max]`.
//! - **Rank-Based Ant System (AS-rank)**: the shortest ants deposit with
//!   rank-decreasing weights plus an elitist global-best deposit.
//!
//! Every constructed tour can be improved with 2-opt before the update.
//!
//! # Architecture
//!
//! - [`distance`]: immutable distance and heuristic matrices.
//! - [`pheromone`]: the trail matrix τ and its mutations.
//! - [`construction`]: probabilistic tour building.
//! - [`local_search`]: 2-opt improvement.
//! - [`update`]: per-variant end-of-iteration update.
//! - [`runner`]: the iteration loop, cancellation and progress reporting.
//!
//! # Quick start
//!
//! ```
//! use u_aco::{AcoConfig, AcoVariant, ColonyRunner};
//! use u_aco::instance::random_cities;
//!
//! let cities = random_cities(20, 100.0, 100.0, Some(7)).unwrap();
//! let config = AcoConfig::fast()
//!     .with_variant(AcoVariant::AntColonySystem)
//!     .with_seed(42);
//!
//! let mut runner = ColonyRunner::new(&cities, config).unwrap();
//! let result = runner.run_with_sink(&mut |record: u_aco::IterationRecord| {
//!     assert!(record.best_distance <= record.iteration_best_distance);
//! });
//! assert_eq!(result.best_path.len(), 20);
//! ```
//!
//! # References
//!
//! - Dorigo, M., Maniezzo, V. & Colorni, A. (1996). "Ant System:
//!   Optimization by a Colony of Cooperating Agents", *IEEE Trans. SMC-B* 26(1).
//! - Dorigo, M. & Gambardella, L. M. (1997). "Ant Colony System: A
//!   Cooperative Learning Approach to the TSP", *IEEE Trans. Evol. Comp.* 1(1).
//! - Stützle, T. & Hoos, H. H. (2000). "MAX-MIN Ant System",
//!   *Future Generation Computer Systems* 16(8).
//! - Bullnheimer, B., Hartl, R. F. & Strauss, C. (1999). "A New Rank Based
//!   Version of the Ant System", *Central European J. Oper. Res.* 7(1).

pub mod config;
pub mod construction;
pub mod distance;
pub mod error;
pub mod instance;
pub mod local_search;
pub mod pheromone;
mod random;
pub mod runner;
pub mod types;
pub mod update;

pub use config::{AcoConfig, AcoVariant};
pub use distance::DistanceModel;
pub use error::{AcoError, Result};
pub use pheromone::PheromoneField;
pub use runner::{AcoResult, CancelHandle, ColonyRunner, RunState};
pub use types::{
    AntTour, BestSolution, ChannelSink, City, IterationRecord, IterationSink, NullSink,
    PheromoneStats, Tour,
};
