//! Instance generation and variant comparison.

use crate::config::{AcoConfig, AcoVariant};
use crate::error::{AcoError, Result};
use crate::random::{create_rng, resolve_seed};
use crate::runner::{AcoResult, ColonyRunner};
use crate::types::City;
use rand::Rng;
use tracing::info;

/// `n` cities placed uniformly at random in `[0, width) × [0, height)`.
///
/// # Errors
///
/// [`AcoError::Config`] if either side is not positive and finite.
pub fn random_cities(n: usize, width: f64, height: f64, seed: Option<u64>) -> Result<Vec<City>> {
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(AcoError::Config(format!(
            "area must be positive and finite, got {width} x {height}"
        )));
    }
    let mut rng = create_rng(resolve_seed(seed));
    Ok((0..n)
        .map(|index| {
            City::new(
                index,
                rng.random_range(0.0..width),
                rng.random_range(0.0..height),
            )
        })
        .collect())
}

/// One variant's outcome in a [`compare_variants`] run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantComparison {
    pub variant: AcoVariant,
    pub result: AcoResult,
}

/// Runs every variant on the same cities with `base` (only the variant
/// changes) and returns the outcomes sorted by ascending best distance.
///
/// Ties keep [`AcoVariant::ALL`] order.
pub fn compare_variants(cities: &[City], base: &AcoConfig) -> Result<Vec<VariantComparison>> {
    let mut comparisons = Vec::with_capacity(AcoVariant::ALL.len());
    for variant in AcoVariant::ALL {
        let config = base.clone().with_variant(variant);
        let result = ColonyRunner::solve(cities, config)?;
        info!(
            event = "variant_done",
            variant = %variant,
            best_distance = result.best_distance,
            duration_ms = result.elapsed.as_millis() as u64,
        );
        comparisons.push(VariantComparison { variant, result });
    }
    comparisons.sort_by(|a, b| a.result.best_distance.total_cmp(&b.result.best_distance));
    Ok(comparisons)
}
