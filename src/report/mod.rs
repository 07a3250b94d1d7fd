//! Reporting utilities: model series, residual diagnostics and formatted output.
//!
//! Nothing here fits anything. The coefficients come from the coefficient
//! table; this module evaluates them over the observed `tau` axis and measures
//! how far the observations sit from each curve.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::data::reference::CoefficientTable;
use crate::domain::{Coefficients, CycleTable, ModelKind, ModelSpec, ResidualStats};
use crate::models::{evaluate_many, half_growth_tau};

pub mod format;

pub use format::*;

/// One model evaluated over the mean cycle.
#[derive(Debug, Clone)]
pub struct ModelSeries {
    pub kind: ModelKind,
    pub coefficients: Coefficients,
    /// Authoring-time RMSE from the coefficient table.
    pub reference_rmse: Option<f64>,
    pub half_growth_tau: Option<f64>,
    pub predicted: Vec<f64>,
    /// Residuals of the mean cycle against `predicted`.
    pub stats: ResidualStats,
}

/// One cycle evaluated with its own Fisher coefficients.
#[derive(Debug, Clone)]
pub struct CycleFit {
    pub cycle: String,
    pub coefficients: Coefficients,
    pub half_growth_tau: Option<f64>,
    pub predicted: Vec<f64>,
    pub stats: ResidualStats,
}

/// Per-cycle fits plus the cycles without coefficients.
#[derive(Debug, Clone, Default)]
pub struct CycleFits {
    pub fits: Vec<CycleFit>,
    pub skipped: Vec<String>,
}

impl CycleFits {
    pub fn get(&self, cycle: &str) -> Option<&CycleFit> {
        self.fits.iter().find(|f| f.cycle.eq_ignore_ascii_case(cycle))
    }
}

/// Residual diagnostics over rows where both series are finite.
pub fn residual_stats(observed: &[f64], predicted: &[f64]) -> ResidualStats {
    let mut n = 0usize;
    let mut sse = 0.0;
    let mut max_abs: f64 = 0.0;
    for (&y, &f) in observed.iter().zip(predicted) {
        if !(y.is_finite() && f.is_finite()) {
            continue;
        }
        let r = y - f;
        n += 1;
        sse += r * r;
        max_abs = max_abs.max(r.abs());
    }
    let rmse = if n == 0 { f64::NAN } else { (sse / n as f64).sqrt() };
    ResidualStats { n, sse, rmse, max_abs }
}

/// Evaluate the selected mean-cycle models against the table's mean column.
pub fn evaluate_mean_fits(
    table: &CycleTable,
    coefficients: &CoefficientTable,
    spec: ModelSpec,
) -> Vec<ModelSeries> {
    spec.kinds()
        .into_iter()
        .filter_map(|kind| {
            let Some(fit) = coefficients.mean_fit(kind) else {
                warn!(model = kind.display_name(), "no mean-cycle coefficients");
                return None;
            };
            let predicted = evaluate_many(kind, &table.tau, fit.coefficients);
            let stats = residual_stats(&table.mean, &predicted);
            debug!(
                model = kind.display_name(),
                rmse = stats.rmse,
                reference_rmse = ?fit.rmse,
                "evaluated mean-cycle model"
            );
            Some(ModelSeries {
                kind,
                coefficients: fit.coefficients,
                reference_rmse: fit.rmse,
                half_growth_tau: half_growth_tau(kind, fit.coefficients),
                predicted,
                stats,
            })
        })
        .collect()
}

/// Evaluate every cycle with its own Fisher coefficients.
///
/// Cycles are independent, so they are evaluated in parallel; output order
/// follows the table.
pub fn evaluate_cycle_fits(table: &CycleTable, coefficients: &CoefficientTable) -> CycleFits {
    let results: Vec<Result<CycleFit, String>> = table
        .cycles
        .par_iter()
        .map(|cycle| {
            let Some(c) = coefficients.cycle(&cycle.name) else {
                return Err(cycle.name.clone());
            };
            let predicted = evaluate_many(ModelKind::Fisher, &table.tau, c);
            let stats = residual_stats(&cycle.values, &predicted);
            Ok(CycleFit {
                cycle: cycle.name.clone(),
                coefficients: c,
                half_growth_tau: half_growth_tau(ModelKind::Fisher, c),
                predicted,
                stats,
            })
        })
        .collect();

    let mut out = CycleFits::default();
    for r in results {
        match r {
            Ok(fit) => out.fits.push(fit),
            Err(name) => {
                warn!(cycle = %name, "no Fisher coefficients for cycle");
                out.skipped.push(name);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CycleSeries;
    use crate::models::fisher;

    fn table_from_fisher(name: &str, c: Coefficients) -> CycleTable {
        let tau = vec![0.0, 0.25, 0.5, 0.75, 1.0];
        let values = fisher(tau.as_slice(), c.c1, c.c2);
        CycleTable::new(
            tau,
            vec![CycleSeries {
                name: name.to_string(),
                values,
            }],
            None,
        )
        .unwrap()
    }

    #[test]
    fn residual_stats_skips_missing_rows() {
        let stats = residual_stats(&[1.0, f64::NAN, 0.0, 2.0], &[0.0, 5.0, 0.0, 2.0]);
        assert_eq!(stats.n, 3);
        assert!((stats.sse - 1.0).abs() < 1e-12);
        assert!((stats.rmse - (1.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.max_abs, 1.0);

        assert!(residual_stats(&[], &[]).rmse.is_nan());
    }

    #[test]
    fn exact_cycle_has_zero_residual() {
        let coeffs = CoefficientTable::reference();
        let c = coeffs.cycle("ciclo_b5").unwrap();
        let table = table_from_fisher("ciclo_b5", c);

        let fits = evaluate_cycle_fits(&table, &coeffs);
        assert!(fits.skipped.is_empty());
        let fit = fits.get("ciclo_b5").unwrap();
        assert_eq!(fit.stats.n, 5);
        assert!(fit.stats.rmse < 1e-12);
        assert_eq!(fit.coefficients, c);
    }

    #[test]
    fn unknown_cycles_are_skipped() {
        let table = table_from_fisher("ciclo_x1", Coefficients::new(2.0, 1.0));
        let fits = evaluate_cycle_fits(&table, &CoefficientTable::reference());
        assert!(fits.fits.is_empty());
        assert_eq!(fits.skipped, vec!["ciclo_x1".to_string()]);
    }

    #[test]
    fn mean_fits_follow_model_spec() {
        let coeffs = CoefficientTable::reference();
        let table = table_from_fisher("ciclo_a2", coeffs.cycle("ciclo_a2").unwrap());

        let all = evaluate_mean_fits(&table, &coeffs, ModelSpec::All);
        assert_eq!(all.iter().map(|s| s.kind).collect::<Vec<_>>(), ModelKind::ALL.to_vec());
        for s in &all {
            assert_eq!(s.predicted.len(), table.len());
            assert!(s.reference_rmse.is_some());
            assert!(s.stats.rmse.is_finite());
        }

        let only = evaluate_mean_fits(&table, &coeffs, ModelSpec::Gompertz);
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].kind, ModelKind::Gompertz);
    }
}
