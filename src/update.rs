//! End-of-iteration pheromone update, one strategy per variant.
//!
//! Every strategy evaporates first and then deposits; MMAS finally clamps
//! the field into its bounds. An ant with tour length `L` deposits
//! `weight · Q / L` on each edge of its tour.

use crate::config::{AcoConfig, AcoVariant};
use crate::pheromone::{PheromoneField, MIN_TOUR_LENGTH};
use crate::types::{AntTour, BestSolution};

/// What an update may draw on after an iteration's construction phase.
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    /// All ants of the iteration, in construction order.
    pub ants: &'a [AntTour],

    /// The shortest tour of this iteration.
    pub iteration_best: &'a AntTour,

    /// The best tour of the run so far, already including this iteration.
    pub global_best: &'a BestSolution,

    /// Zero-based index of the iteration just constructed.
    pub iteration: usize,
}

/// Which ants deposit, and how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateStrategy {
    /// Every ant deposits `Q / L_k`.
    AntSystem,

    /// Only the global-best tour deposits `Q / L_best`.
    AntColonySystem,

    /// A single ant deposits `Q / L`: the iteration-best before
    /// `switch_iteration`, the global-best from then on. The field is then
    /// clamped.
    MaxMin { switch_iteration: usize },

    /// The `elite_count` shortest ants deposit `(w - rank) · Q / L_rank`
    /// (rank from 0, `w = min(elite_count, ants)`), and the global-best tour
    /// adds `elite_weight · Q / L_best`.
    RankBased {
        elite_count: usize,
        elite_weight: f64,
    },
}

/// Applies an [`UpdateStrategy`] with the run's evaporation rate and
/// deposit constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PheromoneUpdater {
    pub strategy: UpdateStrategy,
    pub evaporation_rate: f64,
    pub deposit: f64,
}

impl PheromoneUpdater {
    pub fn new(strategy: UpdateStrategy, evaporation_rate: f64, deposit: f64) -> Self {
        Self {
            strategy,
            evaporation_rate,
            deposit,
        }
    }

    /// The updater selected by `config.variant`.
    pub fn from_config(config: &AcoConfig) -> Self {
        let strategy = match config.variant {
            AcoVariant::AntSystem => UpdateStrategy::AntSystem,
            AcoVariant::AntColonySystem => UpdateStrategy::AntColonySystem,
            AcoVariant::MaxMin => UpdateStrategy::MaxMin {
                switch_iteration: config.mmas_switch_iteration(),
            },
            AcoVariant::RankBased => UpdateStrategy::RankBased {
                elite_count: config.elite_count,
                elite_weight: config.elite_weight,
            },
        };
        Self::new(strategy, config.evaporation_rate, config.pheromone_deposit)
    }

    /// Evaporates, deposits and (MMAS) clamps.
    pub fn apply(&self, field: &mut PheromoneField, ctx: &UpdateContext<'_>) {
        field.evaporate(self.evaporation_rate);

        match self.strategy {
            UpdateStrategy::AntSystem => {
                for ant in ctx.ants {
                    field.deposit_tour(&ant.tour, self.amount(1.0, ant.distance));
                }
            }

            UpdateStrategy::AntColonySystem => {
                let best = ctx.global_best;
                field.deposit_tour(&best.tour, self.amount(1.0, best.distance));
            }

            UpdateStrategy::MaxMin { switch_iteration } => {
                let (tour, distance) = if ctx.iteration < switch_iteration {
                    (&ctx.iteration_best.tour, ctx.iteration_best.distance)
                } else {
                    (&ctx.global_best.tour, ctx.global_best.distance)
                };
                field.deposit_tour(tour, self.amount(1.0, distance));
                field.clamp();
            }

            UpdateStrategy::RankBased {
                elite_count,
                elite_weight,
            } => {
                let ranked = rank_ants(ctx.ants);
                let w = elite_count.min(ranked.len());
                for (rank, &idx) in ranked.iter().take(w).enumerate() {
                    let ant = &ctx.ants[idx];
                    let weight = (w - rank) as f64;
                    field.deposit_tour(&ant.tour, self.amount(weight, ant.distance));
                }

                if elite_weight > 0.0 {
                    let best = ctx.global_best;
                    field.deposit_tour(&best.tour, self.amount(elite_weight, best.distance));
                }
            }
        }
    }

    fn amount(&self, weight: f64, distance: f64) -> f64 {
        weight * self.deposit / distance.max(MIN_TOUR_LENGTH)
    }
}

/// Ant indices sorted by ascending tour length, stable on ties.
fn rank_ants(ants: &[AntTour]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ants.len()).collect();
    order.sort_by(|&a, &b| ants[a].distance.total_cmp(&ants[b].distance));
    order
}
