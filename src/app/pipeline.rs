//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! coefficients -> cycle table (file or synthetic) -> mean-cycle models -> per-cycle fits
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::info;

use crate::data::reference::CoefficientTable;
use crate::data::synthetic::generate_demo_table;
use crate::domain::{DashboardConfig, DataSource};
use crate::error::AppError;
use crate::io::coefficients::load_coefficient_table;
use crate::io::ingest::{IngestedTable, load_cycle_table};
use crate::report::{CycleFits, ModelSeries, evaluate_cycle_fits, evaluate_mean_fits};

/// Loaded inputs, reusable across re-evaluations (e.g. when the TUI switches models).
#[derive(Debug, Clone)]
pub struct DashboardInputs {
    pub source: DataSource,
    pub ingest: IngestedTable,
    pub coefficients: CoefficientTable,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub inputs: DashboardInputs,
    pub mean_fits: Vec<ModelSeries>,
    pub cycle_fits: CycleFits,
}

/// Load inputs and evaluate everything.
pub fn run_dashboard(config: &DashboardConfig) -> Result<DashboardRun, AppError> {
    let inputs = load_inputs(config)?;
    Ok(evaluate_inputs(config, inputs))
}

/// Resolve the coefficient table and the cycle table for this config.
pub fn load_inputs(config: &DashboardConfig) -> Result<DashboardInputs, AppError> {
    // 1) Coefficients: reference table, optionally overridden.
    let coefficients = match &config.coefficients_path {
        Some(path) => load_coefficient_table(path)?,
        None => CoefficientTable::reference(),
    };

    // 2) Cycle table: file, or synthetic cycles from the coefficients.
    let source = config.data_source();
    let ingest = match &source {
        DataSource::File(path) => load_cycle_table(path, config.delimiter)?,
        DataSource::Synthetic { seed, noise } => {
            let table = generate_demo_table(&coefficients, *seed, *noise)?;
            IngestedTable::from_table(table)?
        }
    };
    info!(source = %source.describe(), rows = ingest.rows_used, "dashboard inputs ready");

    Ok(DashboardInputs {
        source,
        ingest,
        coefficients,
    })
}

/// Evaluate the models over already-loaded inputs.
pub fn evaluate_inputs(config: &DashboardConfig, inputs: DashboardInputs) -> DashboardRun {
    let table = &inputs.ingest.table;
    let mean_fits = evaluate_mean_fits(table, &inputs.coefficients, config.model_spec);
    let cycle_fits = evaluate_cycle_fits(table, &inputs.coefficients);

    DashboardRun {
        inputs,
        mean_fits,
        cycle_fits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelSpec;

    #[test]
    fn synthetic_run_covers_every_cycle() {
        let config = DashboardConfig::default();
        let run = run_dashboard(&config).unwrap();

        assert!(run.inputs.source.is_synthetic());
        assert_eq!(run.mean_fits.len(), 3);
        assert_eq!(run.cycle_fits.fits.len(), 12);
        assert!(run.cycle_fits.skipped.is_empty());
        // Noise is small relative to the curves.
        for fit in &run.cycle_fits.fits {
            assert!(fit.stats.rmse < 0.1, "{}: {}", fit.cycle, fit.stats.rmse);
        }
    }

    #[test]
    fn re_evaluation_respects_model_spec() {
        let config = DashboardConfig {
            model_spec: ModelSpec::Landau,
            ..DashboardConfig::default()
        };
        let inputs = load_inputs(&config).unwrap();
        let run = evaluate_inputs(&config, inputs);
        assert_eq!(run.mean_fits.len(), 1);
    }

    #[test]
    fn missing_data_file_is_usage_error() {
        let config = DashboardConfig {
            data_path: Some("/definitely/not/here.dat".into()),
            ..DashboardConfig::default()
        };
        let err = run_dashboard(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
