//! Colony execution loop.
//!
//! [`ColonyRunner`] orchestrates a run: every iteration constructs one tour
//! per ant (optionally improved by 2-opt), tracks the iteration-best and
//! best-so-far tours, applies the variant's pheromone update and hands an
//! [`IterationRecord`] to the caller's sink.

use crate::config::AcoConfig;
use crate::construction::TourConstructor;
use crate::distance::DistanceModel;
use crate::error::Result;
use crate::local_search;
use crate::pheromone::PheromoneField;
use crate::random::{create_rng, resolve_seed};
use crate::types::{AntTour, BestSolution, City, IterationRecord, IterationSink, NullSink, Tour};
use crate::update::{PheromoneUpdater, UpdateContext};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Lifecycle of a runner: `Idle → Running → {Completed | Cancelled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Final output of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// The best tour found.
    pub best_path: Tour,

    /// Cyclic length of `best_path`.
    pub best_distance: f64,

    /// Number of fully completed iterations.
    pub iterations_run: usize,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,

    /// [`RunState::Completed`] or [`RunState::Cancelled`].
    pub status: RunState,

    /// Best-so-far distance after each completed iteration.
    pub distance_history: Vec<f64>,
}

impl AcoResult {
    pub fn cancelled(&self) -> bool {
        self.status == RunState::Cancelled
    }
}

/// Cooperative cancellation flag shared with a running colony.
///
/// The flag is checked once at the top of every iteration; an iteration in
/// progress always completes. Once raised it stays raised.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing flag.
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Executes Ant Colony Optimization on one set of cities.
///
/// # Usage
///
/// ```
/// use u_aco::{AcoConfig, AcoVariant, City, ColonyRunner, RunState};
///
/// let cities = City::from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
/// let config = AcoConfig::default()
///     .with_variant(AcoVariant::MaxMin)
///     .with_ants(5)
///     .with_iterations(20)
///     .with_seed(42);
///
/// let mut runner = ColonyRunner::new(&cities, config).unwrap();
/// let result = runner.run();
/// assert_eq!(result.status, RunState::Completed);
/// assert!((result.best_distance - 40.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct ColonyRunner {
    config: AcoConfig,
    model: DistanceModel,
    state: RunState,
    cancel: CancelHandle,
}

impl ColonyRunner {
    /// Validates `config`, builds the distance model and returns an idle
    /// runner.
    ///
    /// # Errors
    ///
    /// [`AcoError::Config`](crate::AcoError::Config) for an invalid
    /// parameter or fewer than three cities. Nothing is allocated for the
    /// run in that case.
    pub fn new(cities: &[City], config: AcoConfig) -> Result<Self> {
        config.validate()?;
        let model = DistanceModel::new(cities)?;
        Ok(Self {
            config,
            model,
            state: RunState::Idle,
            cancel: CancelHandle::new(),
        })
    }

    /// Like [`new`](Self::new), from raw coordinates.
    pub fn from_coords(coords: &[(f64, f64)], config: AcoConfig) -> Result<Self> {
        Self::new(&City::from_coords(coords), config)
    }

    /// Validates, runs to completion and returns the result.
    pub fn solve(cities: &[City], config: AcoConfig) -> Result<AcoResult> {
        Ok(Self::new(cities, config)?.run())
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn model(&self) -> &DistanceModel {
        &self.model
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// A handle that cancels this runner from another thread or a sink.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Runs without observing per-iteration progress.
    pub fn run(&mut self) -> AcoResult {
        self.run_with_sink(&mut NullSink)
    }

    /// Runs with an optional external cancellation token.
    ///
    /// A supplied flag replaces the runner's own, so handles obtained
    /// earlier from [`cancel_handle`](Self::cancel_handle) no longer reach
    /// this run.
    pub fn run_with_cancel<S: IterationSink + ?Sized>(
        &mut self,
        sink: &mut S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AcoResult {
        if let Some(flag) = cancel {
            self.cancel = CancelHandle::from_flag(flag);
        }
        self.run_with_sink(sink)
    }

    /// Runs, handing one [`IterationRecord`] per iteration to `sink`.
    ///
    /// Each call starts from a freshly initialized pheromone field.
    pub fn run_with_sink<S: IterationSink + ?Sized>(&mut self, sink: &mut S) -> AcoResult {
        let started = Instant::now();
        self.state = RunState::Running;

        let config = &self.config;
        let model = &self.model;
        let seed = resolve_seed(config.seed);
        let mut rng = create_rng(seed);
        let mut field = PheromoneField::initialize(
            config.variant,
            model,
            config.evaporation_rate,
            config.tau_min,
            config.tau_max,
        );
        let constructor = TourConstructor::from_config(model, config);
        let updater = PheromoneUpdater::from_config(config);

        info!(
            event = "solve_start",
            variant = %config.variant,
            cities = model.n(),
            ants = config.n_ants,
            iterations = config.n_iterations,
            local_search = config.local_search,
            seed = seed,
        );

        let mut best: Option<BestSolution> = None;
        let mut distance_history = Vec::with_capacity(config.n_iterations);
        let mut cancelled = false;

        for iteration in 0..config.n_iterations {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let ants = construct_colony(config, &constructor, model, &mut field, &mut rng);
            let Some(iteration_best) = ants
                .iter()
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
            else {
                break;
            };
            let avg_distance =
                ants.iter().map(|a| a.distance).sum::<f64>() / ants.len() as f64;

            let global_best = best.get_or_insert_with(|| BestSolution::from(iteration_best));
            global_best.offer(iteration_best);

            updater.apply(
                &mut field,
                &UpdateContext {
                    ants: &ants,
                    iteration_best,
                    global_best,
                    iteration,
                },
            );
            distance_history.push(global_best.distance);

            let pheromone_stats = field.stats();
            debug!(
                event = "iteration",
                iteration = iteration,
                best_distance = global_best.distance,
                iteration_best = iteration_best.distance,
                avg_distance = avg_distance,
                tau_min = pheromone_stats.min,
                tau_max = pheromone_stats.max,
            );

            sink.on_iteration(IterationRecord {
                iteration,
                best_distance: global_best.distance,
                iteration_best_distance: iteration_best.distance,
                avg_distance,
                best_path: global_best.tour.clone(),
                pheromone_stats,
                pheromones: config.record_pheromones.then(|| field.snapshot()),
            });
        }

        let iterations_run = distance_history.len();
        let (best_path, best_distance) = match best {
            Some(b) => (b.tour, b.distance),
            // Cancelled before the first iteration: fall back to the greedy tour.
            None => {
                let tour = model.nearest_neighbor_tour();
                let distance = model.tour_length(&tour);
                (tour, distance)
            }
        };
        let status = if cancelled {
            RunState::Cancelled
        } else {
            RunState::Completed
        };
        let elapsed = started.elapsed();

        info!(
            event = "solve_end",
            status = ?status,
            best_distance = best_distance,
            iterations = iterations_run,
            duration_ms = elapsed.as_millis() as u64,
        );

        self.state = status;
        AcoResult {
            best_path,
            best_distance,
            iterations_run,
            elapsed,
            status,
            distance_history,
        }
    }
}

/// Constructs one iteration's tours, always at least one.
///
/// ACS ants run sequentially on the shared field because each one applies
/// the local update inline. Other variants read a stable field, so every
/// ant gets its own generator seeded from `rng` in ant order; the
/// `parallel` feature then builds them with rayon without changing the
/// outcome.
fn construct_colony<R: Rng>(
    config: &AcoConfig,
    constructor: &TourConstructor<'_>,
    model: &DistanceModel,
    field: &mut PheromoneField,
    rng: &mut R,
) -> Vec<AntTour> {
    let n = model.n();
    let starts: Vec<usize> = (0..config.n_ants.max(1))
        .map(|ant| {
            if constructor.is_deterministic() {
                ant % n
            } else {
                rng.random_range(0..n)
            }
        })
        .collect();

    if constructor.updates_locally() {
        return starts
            .into_iter()
            .map(|start| {
                let mut ant = constructor.construct_with_local_update(field, start, rng);
                if config.local_search {
                    local_search::improve(&mut ant, model);
                }
                ant
            })
            .collect();
    }

    let seeds: Vec<u64> = starts.iter().map(|_| rng.random()).collect();
    let field: &PheromoneField = field;
    let build = |(start, seed): (usize, u64)| {
        let mut ant_rng = create_rng(seed);
        let mut ant = constructor.construct(field, start, &mut ant_rng);
        if config.local_search {
            local_search::improve(&mut ant, model);
        }
        ant
    };

    #[cfg(feature = "parallel")]
    {
        if config.parallel {
            use rayon::prelude::*;
            return starts.into_par_iter().zip(seeds).map(build).collect();
        }
    }

    starts.into_iter().zip(seeds).map(build).collect()
}
