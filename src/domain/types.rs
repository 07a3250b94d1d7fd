//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built by ingest or the synthetic generator
//! - evaluated by the model layer
//! - rendered by the text report, the ASCII plot and the TUI

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Concrete growth model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Fisher,
    Landau,
    Gompertz,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Fisher, ModelKind::Landau, ModelKind::Gompertz];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Fisher => "Fisher",
            ModelKind::Landau => "Landau",
            ModelKind::Gompertz => "Gompertz",
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            ModelKind::Fisher => "f(τ) = 0.5 + 0.5·tanh(c1·τ − c2)",
            ModelKind::Landau => "f(τ) = [0.5 + 0.5·tanh(c1·τ − c2)]^(1/2)",
            ModelKind::Gompertz => "f(τ) = exp(−c1·exp(−c2·τ))",
        }
    }

    /// Glyph used by the ASCII plot.
    pub fn glyph(self) -> char {
        match self {
            ModelKind::Fisher => '*',
            ModelKind::Landau => '+',
            ModelKind::Gompertz => '.',
        }
    }
}

/// Which model(s) to overlay on the mean cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    All,
    Fisher,
    Landau,
    Gompertz,
}

impl ModelSpec {
    pub fn kinds(self) -> Vec<ModelKind> {
        match self {
            ModelSpec::All => ModelKind::ALL.to_vec(),
            ModelSpec::Fisher => vec![ModelKind::Fisher],
            ModelSpec::Landau => vec![ModelKind::Landau],
            ModelSpec::Gompertz => vec![ModelKind::Gompertz],
        }
    }

    pub fn next(self) -> Self {
        match self {
            ModelSpec::All => ModelSpec::Fisher,
            ModelSpec::Fisher => ModelSpec::Landau,
            ModelSpec::Landau => ModelSpec::Gompertz,
            ModelSpec::Gompertz => ModelSpec::All,
        }
    }
}

/// A calibration coefficient pair `(c1, c2)` for one model and one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub c1: f64,
    pub c2: f64,
}

impl Coefficients {
    pub const fn new(c1: f64, c2: f64) -> Self {
        Self { c1, c2 }
    }
}

/// A pre-fitted mean-cycle model with its authoring-time RMSE.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFit {
    pub kind: ModelKind,
    pub coefficients: Coefficients,
    pub rmse: Option<f64>,
}

/// One measured growth cycle, aligned to the table's `tau` column.
///
/// Missing observations are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// The normalized cycle table: a shared `tau` axis, the individual cycles and
/// their mean.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleTable {
    pub tau: Vec<f64>,
    pub cycles: Vec<CycleSeries>,
    pub mean: Vec<f64>,
}

impl CycleTable {
    /// Build a table, deriving the mean from the cycles when not supplied.
    ///
    /// Every series (and a supplied mean) must have one value per `tau` row;
    /// a misaligned column is a usage error.
    pub fn new(tau: Vec<f64>, cycles: Vec<CycleSeries>, mean: Option<Vec<f64>>) -> Result<Self, AppError> {
        if let Some(c) = cycles.iter().find(|c| c.values.len() != tau.len()) {
            return Err(AppError::usage(format!(
                "Cycle `{}` has {} values for {} tau rows.",
                c.name,
                c.values.len(),
                tau.len()
            )));
        }
        let mean = match mean {
            Some(m) if m.len() != tau.len() => {
                return Err(AppError::usage(format!(
                    "Mean column has {} values for {} tau rows.",
                    m.len(),
                    tau.len()
                )));
            }
            Some(m) => m,
            None => row_means(tau.len(), &cycles),
        };
        Ok(Self { tau, cycles, mean })
    }

    pub fn len(&self) -> usize {
        self.tau.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tau.is_empty()
    }

    pub fn cycle(&self, name: &str) -> Option<&CycleSeries> {
        self.cycles.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn cycle_names(&self) -> Vec<&str> {
        self.cycles.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Row-wise mean of the finite cycle values (`NaN` for rows with none).
pub fn row_means(rows: usize, cycles: &[CycleSeries]) -> Vec<f64> {
    (0..rows)
        .map(|i| {
            let (sum, n) = cycles
                .iter()
                .map(|c| c.values[i])
                .filter(|v| v.is_finite())
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if n == 0 { f64::NAN } else { sum / n as f64 }
        })
        .collect()
}

/// Residual diagnostics of a predicted series against observations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResidualStats {
    /// Rows where both observed and predicted values were finite.
    pub n: usize,
    pub sse: f64,
    pub rmse: f64,
    pub max_abs: f64,
}

/// Where the cycle table came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Synthetic { seed: u64, noise: f64 },
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::File(path) => format!("file {}", path.display()),
            DataSource::Synthetic { seed, noise } => {
                format!("synthetic demo cycles (seed={seed}, noise={noise})")
            }
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataSource::Synthetic { .. })
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment variables and defaults.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Cycle table path; `None` selects synthetic demo data.
    pub data_path: Option<PathBuf>,
    /// Coefficient table override (JSON).
    pub coefficients_path: Option<PathBuf>,
    pub delimiter: u8,
    pub model_spec: ModelSpec,

    pub demo_seed: u64,
    pub demo_noise: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            coefficients_path: None,
            delimiter: b';',
            model_spec: ModelSpec::All,
            demo_seed: 42,
            demo_noise: 0.02,
            plot: true,
            plot_width: 100,
            plot_height: 25,
        }
    }
}

impl DashboardConfig {
    pub fn data_source(&self) -> DataSource {
        match &self.data_path {
            Some(path) => DataSource::File(path.clone()),
            None => DataSource::Synthetic {
                seed: self.demo_seed,
                noise: self.demo_noise,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, values: &[f64]) -> CycleSeries {
        CycleSeries {
            name: name.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn table_derives_mean_ignoring_missing() {
        let table = CycleTable::new(
            vec![0.0, 0.5, 1.0],
            vec![series("a", &[0.1, 0.4, f64::NAN]), series("b", &[0.3, 0.6, 0.9])],
            None,
        )
        .unwrap();
        assert!((table.mean[0] - 0.2).abs() < 1e-12);
        assert!((table.mean[1] - 0.5).abs() < 1e-12);
        assert!((table.mean[2] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn table_lookup_is_case_insensitive() {
        let table = CycleTable::new(vec![0.0], vec![series("ciclo_a6", &[0.2])], None).unwrap();
        assert!(table.cycle("CICLO_A6").is_some());
        assert!(table.cycle("ciclo_b1").is_none());
        assert_eq!(table.cycle_names(), vec!["ciclo_a6"]);
    }

    #[test]
    fn misaligned_columns_are_rejected() {
        let err = CycleTable::new(vec![0.0, 1.0], vec![series("a", &[0.1])], None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`a`"));

        let err = CycleTable::new(vec![0.0], vec![series("a", &[0.1])], Some(vec![0.1, 0.2])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn model_spec_cycles_through_all_variants() {
        let mut spec = ModelSpec::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(spec);
            spec = spec.next();
        }
        assert_eq!(spec, ModelSpec::All);
        assert_eq!(seen.len(), 4);
        assert_eq!(ModelSpec::All.kinds(), ModelKind::ALL.to_vec());
        assert_eq!(ModelSpec::Landau.kinds(), vec![ModelKind::Landau]);
    }

    #[test]
    fn config_without_path_uses_synthetic_source() {
        let config = DashboardConfig::default();
        assert!(config.data_source().is_synthetic());

        let config = DashboardConfig {
            data_path: Some(PathBuf::from("cycles.dat")),
            ..DashboardConfig::default()
        };
        assert_eq!(config.data_source(), DataSource::File(PathBuf::from("cycles.dat")));
    }
}
