//! Colony configuration and algorithm variants.
//!
//! [`AcoConfig`] holds every parameter that shapes a run; the cities
//! themselves are passed separately to [`ColonyRunner::new`](crate::ColonyRunner::new).

use crate::error::{AcoError, Result};
use std::fmt;
use std::str::FromStr;

/// The pheromone update policy used for a whole run.
///
/// # References
///
/// - AS: Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
///   Colony of Cooperating Agents"
/// - ACS: Dorigo & Gambardella (1997), "Ant Colony System: A Cooperative
///   Learning Approach to the Traveling Salesman Problem"
/// - MMAS: Stützle & Hoos (2000), "MAX–MIN Ant System"
/// - Rank: Bullnheimer, Hartl & Strauss (1999), "A New Rank Based Version
///   of the Ant System"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcoVariant {
    /// Ant System: every ant deposits.
    #[cfg_attr(feature = "serde", serde(rename = "AS"))]
    AntSystem,

    /// Ant Colony System: pseudo-random proportional rule, inline local
    /// update, global-best deposit.
    #[cfg_attr(feature = "serde", serde(rename = "ACS"))]
    AntColonySystem,

    /// MAX–MIN Ant System: single depositing ant, bounded trails.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "MMAS"))]
    MaxMin,

    /// Rank-based Ant System: weighted elite deposits plus a global-best bonus.
    #[cfg_attr(feature = "serde", serde(rename = "RANK"))]
    RankBased,
}

impl AcoVariant {
    /// All variants, in canonical order.
    pub const ALL: [AcoVariant; 4] = [
        AcoVariant::AntSystem,
        AcoVariant::AntColonySystem,
        AcoVariant::MaxMin,
        AcoVariant::RankBased,
    ];

    /// Short code: `AS`, `ACS`, `MMAS` or `RANK`.
    pub fn code(self) -> &'static str {
        match self {
            AcoVariant::AntSystem => "AS",
            AcoVariant::AntColonySystem => "ACS",
            AcoVariant::MaxMin => "MMAS",
            AcoVariant::RankBased => "RANK",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            AcoVariant::AntSystem => "Ant System",
            AcoVariant::AntColonySystem => "Ant Colony System",
            AcoVariant::MaxMin => "Max-Min Ant System",
            AcoVariant::RankBased => "Rank-based Ant System",
        }
    }
}

impl fmt::Display for AcoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AcoVariant {
    type Err = AcoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AS" => Ok(AcoVariant::AntSystem),
            "ACS" => Ok(AcoVariant::AntColonySystem),
            "MMAS" => Ok(AcoVariant::MaxMin),
            "RANK" => Ok(AcoVariant::RankBased),
            _ => Err(AcoError::UnknownVariant(s.to_string())),
        }
    }
}

/// Configuration for an Ant Colony Optimization run.
///
/// # Defaults
///
/// ```
/// use u_aco::{AcoConfig, AcoVariant};
///
/// let config = AcoConfig::default();
/// assert_eq!(config.variant, AcoVariant::MaxMin);
/// assert_eq!(config.n_ants, 20);
/// assert_eq!(config.n_iterations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_aco::{AcoConfig, AcoVariant};
///
/// let config = AcoConfig::default()
///     .with_variant(AcoVariant::AntColonySystem)
///     .with_ants(30)
///     .with_q0(0.9)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcoConfig {
    /// Update policy, fixed for the run.
    pub variant: AcoVariant,

    /// Ants per iteration. Rule of thumb: close to the number of cities.
    pub n_ants: usize,

    /// Number of iterations.
    pub n_iterations: usize,

    /// Pheromone exponent α (≥ 0).
    pub alpha: f64,

    /// Heuristic exponent β (≥ 0). Typical range: 2–5.
    pub beta: f64,

    /// Evaporation rate ρ in (0, 1]. Also used as the ACS local decay ξ.
    pub evaporation_rate: f64,

    /// ACS exploitation probability q0 in [0, 1].
    pub q0: f64,

    /// Number of ranked ants allowed to deposit (Rank only).
    pub elite_count: usize,

    /// Weight of the global-best bonus deposit (Rank only).
    pub elite_weight: f64,

    /// Deposit constant Q: an ant with tour length `L` lays `Q / L`.
    pub pheromone_deposit: f64,

    /// Lower MMAS bound. `None` derives it from `tau_max`.
    pub tau_min: Option<f64>,

    /// Upper MMAS bound. `None` derives it from the nearest-neighbour tour.
    pub tau_max: Option<f64>,

    /// Fraction of the run during which the MMAS iteration-best ant
    /// deposits; the global-best ant deposits afterwards.
    pub mmas_global_best_fraction: f64,

    /// Improve every constructed tour with 2-opt.
    pub local_search: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Attach a full pheromone matrix snapshot to every iteration record.
    pub record_pheromones: bool,

    /// Construct ants in parallel with rayon (requires the `parallel`
    /// feature; ignored for ACS).
    pub parallel: bool,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            variant: AcoVariant::default(),
            n_ants: 20,
            n_iterations: 100,
            alpha: 1.0,
            beta: 3.0,
            evaporation_rate: 0.1,
            q0: 0.9,
            elite_count: 5,
            elite_weight: 6.0,
            pheromone_deposit: 1.0,
            tau_min: None,
            tau_max: None,
            mmas_global_best_fraction: 0.5,
            local_search: true,
            seed: None,
            record_pheromones: false,
            parallel: false,
        }
    }
}

impl AcoConfig {
    pub fn with_variant(mut self, variant: AcoVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_ants(mut self, n: usize) -> Self {
        self.n_ants = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rho: f64) -> Self {
        self.evaporation_rate = rho;
        self
    }

    pub fn with_q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_elite_weight(mut self, weight: f64) -> Self {
        self.elite_weight = weight;
        self
    }

    pub fn with_pheromone_deposit(mut self, q: f64) -> Self {
        self.pheromone_deposit = q;
        self
    }

    /// Overrides the MMAS trail bounds.
    pub fn with_tau_bounds(mut self, tau_min: f64, tau_max: f64) -> Self {
        self.tau_min = Some(tau_min);
        self.tau_max = Some(tau_max);
        self
    }

    pub fn with_mmas_global_best_fraction(mut self, fraction: f64) -> Self {
        self.mmas_global_best_fraction = fraction;
        self
    }

    pub fn with_local_search(mut self, enabled: bool) -> Self {
        self.local_search = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_record_pheromones(mut self, enabled: bool) -> Self {
        self.record_pheromones = enabled;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Small colony, short run. Suitable for interactive previews.
    ///
    /// - Ants: 10, Iterations: 50
    pub fn fast() -> Self {
        Self {
            n_ants: 10,
            n_iterations: 50,
            ..Self::default()
        }
    }

    /// The default colony size and run length.
    ///
    /// - Ants: 20, Iterations: 100
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Larger colony and longer run for better tours.
    ///
    /// - Ants: 40, Iterations: 300
    pub fn quality() -> Self {
        Self {
            n_ants: 40,
            n_iterations: 300,
            ..Self::default()
        }
    }

    /// Selects a preset from the number of cities.
    ///
    /// - `n_cities < 30` → [`fast()`](Self::fast)
    /// - `30 ≤ n_cities < 100` → [`balanced()`](Self::balanced)
    /// - `n_cities ≥ 100` → [`quality()`](Self::quality)
    pub fn auto_select(n_cities: usize) -> Self {
        if n_cities < 30 {
            Self::fast()
        } else if n_cities < 100 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Iteration index from which MMAS deposits with the global-best ant.
    pub fn mmas_switch_iteration(&self) -> usize {
        (self.n_iterations as f64 * self.mmas_global_best_fraction).floor() as usize
    }

    /// Validates the configuration.
    ///
    /// Returns [`AcoError::Config`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.n_ants == 0 {
            return Err(invalid("n_ants must be at least 1"));
        }
        if self.n_iterations == 0 {
            return Err(invalid("n_iterations must be at least 1"));
        }
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(invalid(format!("alpha must be >= 0, got {}", self.alpha)));
        }
        if !(self.beta >= 0.0 && self.beta.is_finite()) {
            return Err(invalid(format!("beta must be >= 0, got {}", self.beta)));
        }
        if !(self.evaporation_rate > 0.0 && self.evaporation_rate <= 1.0) {
            return Err(invalid(format!(
                "evaporation_rate must be in (0, 1], got {}",
                self.evaporation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.q0) {
            return Err(invalid(format!("q0 must be in [0, 1], got {}", self.q0)));
        }
        if self.elite_count == 0 {
            return Err(invalid("elite_count must be at least 1"));
        }
        if !(self.elite_weight >= 0.0 && self.elite_weight.is_finite()) {
            return Err(invalid(format!(
                "elite_weight must be >= 0, got {}",
                self.elite_weight
            )));
        }
        if !(self.pheromone_deposit > 0.0 && self.pheromone_deposit.is_finite()) {
            return Err(invalid(format!(
                "pheromone_deposit must be positive, got {}",
                self.pheromone_deposit
            )));
        }
        for (name, bound) in [("tau_min", self.tau_min), ("tau_max", self.tau_max)] {
            if let Some(value) = bound {
                if !(value > 0.0 && value.is_finite()) {
                    return Err(invalid(format!("{name} must be positive, got {value}")));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.tau_min, self.tau_max) {
            if min > max {
                return Err(invalid(format!(
                    "tau_min ({min}) must not exceed tau_max ({max})"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.mmas_global_best_fraction) {
            return Err(invalid(format!(
                "mmas_global_best_fraction must be in [0, 1], got {}",
                self.mmas_global_best_fraction
            )));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AcoError {
    AcoError::Config(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AcoConfig::default();
        assert_eq!(config.variant, AcoVariant::MaxMin);
        assert_eq!(config.n_ants, 20);
        assert_eq!(config.n_iterations, 100);
        assert!((config.alpha - 1.0).abs() < 1e-10);
        assert!((config.beta - 3.0).abs() < 1e-10);
        assert!((config.evaporation_rate - 0.1).abs() < 1e-10);
        assert!((config.q0 - 0.9).abs() < 1e-10);
        assert_eq!(config.elite_count, 5);
        assert!((config.elite_weight - 6.0).abs() < 1e-10);
        assert!(config.local_search);
        assert!(config.seed.is_none());
        assert!(!config.parallel);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AcoConfig::default()
            .with_variant(AcoVariant::RankBased)
            .with_ants(7)
            .with_iterations(12)
            .with_alpha(2.0)
            .with_beta(4.0)
            .with_evaporation_rate(0.3)
            .with_elite_count(3)
            .with_local_search(false)
            .with_seed(9);

        assert_eq!(config.variant, AcoVariant::RankBased);
        assert_eq!(config.n_ants, 7);
        assert_eq!(config.n_iterations, 12);
        assert!((config.alpha - 2.0).abs() < 1e-10);
        assert!((config.beta - 4.0).abs() < 1e-10);
        assert!((config.evaporation_rate - 0.3).abs() < 1e-10);
        assert_eq!(config.elite_count, 3);
        assert!(!config.local_search);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_validate_ok() {
        assert!(AcoConfig::default().validate().is_ok());
        for preset in [AcoConfig::fast(), AcoConfig::balanced(), AcoConfig::quality()] {
            assert!(preset.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_zero_ants() {
        assert!(AcoConfig::default().with_ants(0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(AcoConfig::default().with_iterations(0).validate().is_err());
    }

    #[test]
    fn test_validate_negative_exponents() {
        assert!(AcoConfig::default().with_alpha(-0.1).validate().is_err());
        assert!(AcoConfig::default().with_beta(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_evaporation_range() {
        assert!(AcoConfig::default().with_evaporation_rate(0.0).validate().is_err());
        assert!(AcoConfig::default().with_evaporation_rate(1.0).validate().is_ok());
        assert!(AcoConfig::default().with_evaporation_rate(1.5).validate().is_err());
    }

    #[test]
    fn test_validate_q0_range() {
        assert!(AcoConfig::default().with_q0(1.0).validate().is_ok());
        assert!(AcoConfig::default().with_q0(0.0).validate().is_ok());
        assert!(AcoConfig::default().with_q0(1.01).validate().is_err());
    }

    #[test]
    fn test_validate_elite_count() {
        assert!(AcoConfig::default().with_elite_count(0).validate().is_err());
    }

    #[test]
    fn test_validate_tau_bounds() {
        assert!(AcoConfig::default().with_tau_bounds(0.1, 1.0).validate().is_ok());
        assert!(AcoConfig::default().with_tau_bounds(2.0, 1.0).validate().is_err());
        assert!(AcoConfig::default().with_tau_bounds(0.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_validate_errors_are_config() {
        let err = AcoConfig::default().with_ants(0).validate().unwrap_err();
        assert!(matches!(err, AcoError::Config(_)));
        assert!(err.to_string().contains("n_ants"));
    }

    #[test]
    fn test_mmas_switch_iteration() {
        let config = AcoConfig::default().with_iterations(101);
        assert_eq!(config.mmas_switch_iteration(), 50);

        let config = AcoConfig::default()
            .with_iterations(10)
            .with_mmas_global_best_fraction(0.0);
        assert_eq!(config.mmas_switch_iteration(), 0);
    }

    #[test]
    fn test_auto_select_boundaries() {
        assert_eq!(AcoConfig::auto_select(29).n_ants, 10);
        assert_eq!(AcoConfig::auto_select(30).n_ants, 20);
        assert_eq!(AcoConfig::auto_select(100).n_ants, 40);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("as".parse::<AcoVariant>().unwrap(), AcoVariant::AntSystem);
        assert_eq!("ACS".parse::<AcoVariant>().unwrap(), AcoVariant::AntColonySystem);
        assert_eq!(" mmas ".parse::<AcoVariant>().unwrap(), AcoVariant::MaxMin);
        assert_eq!("Rank".parse::<AcoVariant>().unwrap(), AcoVariant::RankBased);
        assert!(matches!(
            "EAS".parse::<AcoVariant>(),
            Err(AcoError::UnknownVariant(_))
        ));
    }

    #[test]
    fn test_variant_display_roundtrips() {
        for variant in AcoVariant::ALL {
            assert_eq!(variant.to_string().parse::<AcoVariant>().unwrap(), variant);
        }
    }
}
