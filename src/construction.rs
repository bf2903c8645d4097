//! Tour construction.
//!
//! An ant starts from a city and repeatedly moves to an unvisited city
//! chosen by a [`SelectionRule`] until every city is visited. The weight of
//! a candidate edge `(i, j)` is `τ[i][j]^α · η[i][j]^β`.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), random proportional rule
//! - Dorigo & Gambardella (1997), pseudo-random proportional rule and local
//!   pheromone update

use crate::config::{AcoConfig, AcoVariant};
use crate::distance::DistanceModel;
use crate::pheromone::PheromoneField;
use crate::types::AntTour;
use rand::Rng;

/// How the next city is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionRule {
    /// Sample proportionally to edge weight (roulette wheel).
    Proportional,

    /// ACS rule: with probability `q0` take the heaviest edge, otherwise
    /// sample proportionally.
    PseudoRandom { q0: f64 },
}

/// Builds tours for one run.
#[derive(Debug, Clone)]
pub struct TourConstructor<'a> {
    model: &'a DistanceModel,
    alpha: f64,
    beta: f64,
    rule: SelectionRule,
    local_decay: Option<f64>,
}

impl<'a> TourConstructor<'a> {
    /// A constructor using the proportional rule and no local update.
    pub fn new(model: &'a DistanceModel, alpha: f64, beta: f64) -> Self {
        Self {
            model,
            alpha,
            beta,
            rule: SelectionRule::Proportional,
            local_decay: None,
        }
    }

    /// The constructor a run of `config` uses: ACS gets the pseudo-random
    /// rule and a local decay of `ξ = ρ`.
    pub fn from_config(model: &'a DistanceModel, config: &AcoConfig) -> Self {
        let constructor = Self::new(model, config.alpha, config.beta);
        match config.variant {
            AcoVariant::AntColonySystem => constructor
                .with_rule(SelectionRule::PseudoRandom { q0: config.q0 })
                .with_local_update(config.evaporation_rate),
            _ => constructor,
        }
    }

    pub fn with_rule(mut self, rule: SelectionRule) -> Self {
        self.rule = rule;
        self
    }

    /// Enables the inline local update with decay `xi`.
    pub fn with_local_update(mut self, xi: f64) -> Self {
        self.local_decay = Some(xi);
        self
    }

    pub fn rule(&self) -> SelectionRule {
        self.rule
    }

    /// Whether construction writes to the pheromone field.
    pub fn updates_locally(&self) -> bool {
        self.local_decay.is_some()
    }

    /// Whether every choice is an exploitation (`q0 ≥ 1`), making
    /// construction independent of the random stream.
    pub fn is_deterministic(&self) -> bool {
        matches!(self.rule, SelectionRule::PseudoRandom { q0 } if q0 >= 1.0)
    }

    /// Builds a tour from `start` reading a stable trail snapshot.
    ///
    /// The local update is not applied here; see
    /// [`construct_with_local_update`](Self::construct_with_local_update).
    pub fn construct<R: Rng>(
        &self,
        pheromones: &PheromoneField,
        start: usize,
        rng: &mut R,
    ) -> AntTour {
        let n = self.model.n();
        let mut visited = vec![false; n];
        let mut weights = Vec::with_capacity(n);
        let mut tour = Vec::with_capacity(n);
        visited[start] = true;
        tour.push(start);

        let mut current = start;
        for _ in 1..n {
            let next = self.select_next(pheromones, current, &visited, &mut weights, rng);
            visited[next] = true;
            tour.push(next);
            current = next;
        }
        self.finish(tour)
    }

    /// Builds a tour from `start`, applying the ACS local update to each
    /// edge right after it is traversed.
    pub fn construct_with_local_update<R: Rng>(
        &self,
        pheromones: &mut PheromoneField,
        start: usize,
        rng: &mut R,
    ) -> AntTour {
        let n = self.model.n();
        let mut visited = vec![false; n];
        let mut weights = Vec::with_capacity(n);
        let mut tour = Vec::with_capacity(n);
        visited[start] = true;
        tour.push(start);

        let mut current = start;
        for _ in 1..n {
            let next = self.select_next(pheromones, current, &visited, &mut weights, rng);
            if let Some(xi) = self.local_decay {
                pheromones.local_update(current, next, xi);
            }
            visited[next] = true;
            tour.push(next);
            current = next;
        }
        self.finish(tour)
    }

    fn finish(&self, tour: Vec<usize>) -> AntTour {
        let distance = self.model.tour_length(&tour);
        AntTour { tour, distance }
    }

    /// Chooses the next city among the unvisited ones.
    fn select_next<R: Rng>(
        &self,
        pheromones: &PheromoneField,
        current: usize,
        visited: &[bool],
        weights: &mut Vec<(usize, f64)>,
        rng: &mut R,
    ) -> usize {
        weights.clear();
        weights.extend(
            visited
                .iter()
                .enumerate()
                .filter(|&(_, &seen)| !seen)
                .map(|(city, _)| {
                    let w = pheromones.get(current, city).powf(self.alpha)
                        * self.model.heuristic(current, city).powf(self.beta);
                    (city, w)
                }),
        );

        let exploit = match self.rule {
            SelectionRule::Proportional => false,
            SelectionRule::PseudoRandom { q0 } => rng.random::<f64>() < q0,
        };

        let chosen = if exploit {
            heaviest(weights)
        } else {
            roulette(weights, rng)
        };

        chosen.unwrap_or_else(|| {
            tracing::trace!(
                event = "degenerate_weights",
                from = current,
                "edge weights vanished; taking nearest unvisited city"
            );
            // At least one city is unvisited while construction runs.
            self.model.nearest_unvisited(current, visited).unwrap_or(current)
        })
    }
}

/// Candidate with the largest positive weight, lowest index on ties.
fn heaviest(weights: &[(usize, f64)]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &(city, w) in weights {
        if w > 0.0 && best.is_none_or(|(_, bw)| w > bw) {
            best = Some((city, w));
        }
    }
    best.map(|(city, _)| city)
}

/// Roulette-wheel draw. `None` if the weights sum to zero or overflow.
fn roulette<R: Rng>(weights: &[(usize, f64)], rng: &mut R) -> Option<usize> {
    let total: f64 = weights.iter().map(|&(_, w)| w).sum();
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    let target = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for &(city, w) in weights {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = Some(city);
        if target < cumulative {
            return Some(city);
        }
    }
    // Rounding can leave `target` just above the final cumulative sum.
    last_positive
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::types::is_permutation;

    fn square() -> DistanceModel {
        DistanceModel::from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
            .unwrap()
    }

    fn ring(n: usize) -> DistanceModel {
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|k| {
                let a = k as f64 / n as f64 * std::f64::consts::TAU;
                (50.0 * a.cos(), 50.0 * a.sin())
            })
            .collect();
        DistanceModel::from_coords(&coords).unwrap()
    }

    #[test]
    fn test_construct_produces_permutation() {
        let model = ring(12);
        let field = PheromoneField::uniform(12, 1.0);
        let constructor = TourConstructor::new(&model, 1.0, 3.0);
        let mut rng = create_rng(42);
        for start in 0..12 {
            let ant = constructor.construct(&field, start, &mut rng);
            assert!(is_permutation(&ant.tour, 12));
            assert_eq!(ant.tour[0], start);
            assert!((ant.distance - model.tour_length(&ant.tour)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_same_seed_same_tour() {
        let model = ring(10);
        let field = PheromoneField::uniform(10, 1.0);
        let constructor = TourConstructor::new(&model, 1.0, 2.0);
        let a = constructor.construct(&field, 3, &mut create_rng(5));
        let b = constructor.construct(&field, 3, &mut create_rng(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_underflow_falls_back_to_nearest() {
        let model = square();
        // Zero trails with alpha > 0 make every weight zero.
        let field = PheromoneField::uniform(4, 0.0);
        let constructor = TourConstructor::new(&model, 1.0, 1.0);
        let ant = constructor.construct(&field, 0, &mut create_rng(1));
        assert_eq!(ant.tour, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_exploitation_picks_heaviest_lowest_index() {
        let model = square();
        let field = PheromoneField::uniform(4, 1.0);
        let constructor = TourConstructor::new(&model, 1.0, 1.0)
            .with_rule(SelectionRule::PseudoRandom { q0: 1.0 });
        assert!(constructor.is_deterministic());
        // From 0, cities 1 and 3 tie; 1 wins. Then 2, then 3.
        let ant = constructor.construct(&field, 0, &mut create_rng(99));
        assert_eq!(ant.tour, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_full_exploitation_ignores_seed() {
        let model = ring(15);
        let field = PheromoneField::uniform(15, 1.0);
        let constructor = TourConstructor::new(&model, 1.0, 2.0)
            .with_rule(SelectionRule::PseudoRandom { q0: 1.0 });
        let a = constructor.construct(&field, 4, &mut create_rng(1));
        let b = constructor.construct(&field, 4, &mut create_rng(2));
        assert_eq!(a.tour, b.tour);
    }

    #[test]
    fn test_local_update_touches_traversed_edges() {
        let model = square();
        let mut field = PheromoneField::initialize(AcoVariant::AntColonySystem, &model, 0.5, None, None);
        field.deposit_tour(&[0, 1, 2, 3], 1.0);
        let before = field.get(0, 1);

        let constructor = TourConstructor::new(&model, 1.0, 1.0)
            .with_rule(SelectionRule::PseudoRandom { q0: 1.0 })
            .with_local_update(0.5);
        assert!(constructor.updates_locally());
        let ant = constructor.construct_with_local_update(&mut field, 0, &mut create_rng(3));
        assert_eq!(ant.tour, vec![0, 1, 2, 3]);

        let expected = 0.5 * before + 0.5 * field.tau0();
        assert!((field.get(0, 1) - expected).abs() < 1e-12);
        assert!((field.get(1, 0) - expected).abs() < 1e-12);
        // The closing edge is not traversed during construction.
        assert!((field.get(3, 0) - before).abs() < 1e-12);
    }

    #[test]
    fn test_from_config_selects_rule() {
        let model = square();
        let acs = AcoConfig::default()
            .with_variant(AcoVariant::AntColonySystem)
            .with_q0(0.7);
        let constructor = TourConstructor::from_config(&model, &acs);
        assert_eq!(constructor.rule(), SelectionRule::PseudoRandom { q0: 0.7 });
        assert!(constructor.updates_locally());

        let mmas = AcoConfig::default().with_variant(AcoVariant::MaxMin);
        let constructor = TourConstructor::from_config(&model, &mmas);
        assert_eq!(constructor.rule(), SelectionRule::Proportional);
        assert!(!constructor.updates_locally());
    }

    #[test]
    fn test_roulette_skips_zero_weights() {
        let weights = [(0, 0.0), (1, 0.0), (2, 3.0)];
        let mut rng = create_rng(11);
        for _ in 0..50 {
            assert_eq!(roulette(&weights, &mut rng), Some(2));
        }
        assert_eq!(roulette(&[(0, 0.0)], &mut rng), None);
        assert_eq!(roulette(&[(0, f64::INFINITY)], &mut rng), None);
    }

    #[test]
    fn test_heaviest() {
        assert_eq!(heaviest(&[(4, 1.0), (2, 3.0), (7, 3.0)]), Some(2));
        assert_eq!(heaviest(&[(4, 0.0)]), None);
    }
}
