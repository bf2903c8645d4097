//! The pheromone matrix τ and its mutations.

use crate::config::AcoVariant;
use crate::distance::DistanceModel;
use crate::types::PheromoneStats;

/// Floor applied to any tour length used as a denominator, so fully
/// coincident inputs never produce infinite trails.
pub const MIN_TOUR_LENGTH: f64 = 1e-10;

/// Trail bounds enforced by MMAS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PheromoneBounds {
    pub min: f64,
    pub max: f64,
}

/// Symmetric, nonnegative trail matrix owned by a single run.
#[derive(Debug, Clone)]
pub struct PheromoneField {
    n: usize,
    tau: Vec<f64>,
    tau0: f64,
    bounds: Option<PheromoneBounds>,
}

impl PheromoneField {
    /// Initializes the field for `variant`.
    ///
    /// The base level is `τ0 = 1/(n·L_nn)` with `L_nn` the greedy
    /// nearest-neighbour tour length. MMAS additionally sets
    /// `τ_max = 1/(ρ·L_nn)` and `τ_min = τ_max/(2n)` (either may be
    /// overridden) and seeds every trail at `τ_max`; the other variants seed
    /// at `τ0`.
    pub fn initialize(
        variant: AcoVariant,
        model: &DistanceModel,
        evaporation_rate: f64,
        tau_min: Option<f64>,
        tau_max: Option<f64>,
    ) -> Self {
        let n = model.n();
        let l_nn = model.nearest_neighbor_length().max(MIN_TOUR_LENGTH);
        let tau0 = 1.0 / (n as f64 * l_nn);

        let bounds = match variant {
            AcoVariant::MaxMin => {
                let max = tau_max.unwrap_or(1.0 / (evaporation_rate * l_nn));
                let min = tau_min.unwrap_or(max / (2.0 * n as f64)).min(max);
                Some(PheromoneBounds { min, max })
            }
            _ => None,
        };
        let seed = bounds.map_or(tau0, |b| b.max);

        Self {
            n,
            tau: vec![seed; n * n],
            tau0,
            bounds,
        }
    }

    /// A field with every trail at `value` and no bounds.
    pub fn uniform(n: usize, value: f64) -> Self {
        Self {
            n,
            tau: vec![value; n * n],
            tau0: value,
            bounds: None,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Base trail level τ0, also the target of the ACS local update.
    pub fn tau0(&self) -> f64 {
        self.tau0
    }

    /// MMAS bounds, if this field enforces any.
    pub fn bounds(&self) -> Option<PheromoneBounds> {
        self.bounds
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.tau[i * self.n + j]
    }

    /// `τ ← (1-ρ)·τ` over the whole matrix.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        for t in &mut self.tau {
            *t *= keep;
        }
    }

    /// Adds `amount` to edge `(i, j)` in both directions.
    pub fn deposit(&mut self, i: usize, j: usize, amount: f64) {
        self.tau[i * self.n + j] += amount;
        if i != j {
            self.tau[j * self.n + i] += amount;
        }
    }

    /// Deposits `amount` on every edge of a closed tour.
    pub fn deposit_tour(&mut self, tour: &[usize], amount: f64) {
        for w in tour.windows(2) {
            self.deposit(w[0], w[1], amount);
        }
        if let (Some(&first), Some(&last)) = (tour.first(), tour.last()) {
            if tour.len() > 1 {
                self.deposit(last, first, amount);
            }
        }
    }

    /// ACS local update: `τ[i][j] ← (1-ξ)·τ[i][j] + ξ·τ0`, symmetric.
    pub fn local_update(&mut self, i: usize, j: usize, xi: f64) {
        let value = (1.0 - xi) * self.get(i, j) + xi * self.tau0;
        self.tau[i * self.n + j] = value;
        self.tau[j * self.n + i] = value;
    }

    /// Clips every trail into the MMAS bounds. No-op for unbounded fields.
    pub fn clamp(&mut self) {
        if let Some(PheromoneBounds { min, max }) = self.bounds {
            for t in &mut self.tau {
                *t = t.clamp(min, max);
            }
        }
    }

    /// Smallest positive and largest trail value.
    pub fn stats(&self) -> PheromoneStats {
        let mut min = f64::INFINITY;
        let mut max = 0.0f64;
        for &t in &self.tau {
            if t > 0.0 && t < min {
                min = t;
            }
            max = max.max(t);
        }
        PheromoneStats {
            min: if min.is_finite() { min } else { 0.0 },
            max,
        }
    }

    /// Copy of the matrix as rows.
    pub fn snapshot(&self) -> Vec<Vec<f64>> {
        self.tau.chunks(self.n).map(<[f64]>::to_vec).collect()
    }
}
