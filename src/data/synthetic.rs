//! Synthetic demo cycles generated from the reference Fisher coefficients.
//!
//! Used when no cycle table is configured so that every command (and the TUI)
//! has something realistic to show. Generation is deterministic per seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::reference::CoefficientTable;
use crate::domain::{CycleSeries, CycleTable};
use crate::error::AppError;
use crate::math::linspace;
use crate::models::fisher;

/// Demo tau axis: `DEMO_TAU_STEPS` evenly spaced points on `[0, DEMO_TAU_MAX]`.
pub const DEMO_TAU_MAX: f64 = 1.2;
pub const DEMO_TAU_STEPS: usize = 13;

/// Generate one noisy series per cycle in `coefficients.cycles`.
///
/// Each value is the cycle's Fisher curve plus `N(0, noise²)` noise, clamped to
/// `[0, 1]`. The mean column is the row mean of the generated cycles.
pub fn generate_demo_table(
    coefficients: &CoefficientTable,
    seed: u64,
    noise: f64,
) -> Result<CycleTable, AppError> {
    if !noise.is_finite() || noise < 0.0 {
        return Err(AppError::usage(format!(
            "Invalid demo noise {noise} (must be finite and >= 0)."
        )));
    }
    if coefficients.cycles.is_empty() {
        return Err(AppError::no_data("No cycle coefficients to generate demo data from."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;

    let tau = linspace(0.0, DEMO_TAU_MAX, DEMO_TAU_STEPS);
    let cycles = coefficients
        .cycles
        .iter()
        .map(|(name, c)| {
            let values = fisher(tau.as_slice(), c.c1, c.c2)
                .into_iter()
                .map(|y| (y + normal.sample(&mut rng)).clamp(0.0, 1.0))
                .collect();
            CycleSeries {
                name: name.clone(),
                values,
            }
        })
        .collect();

    CycleTable::new(tau, cycles, None)
}
