//! Coefficient table overrides (JSON).
//!
//! Schema (both keys optional; anything not listed keeps its reference value):
//!
//! ```json
//! {
//!   "mean":   [{ "model": "fisher", "c1": 2.356, "c2": 0.867, "rmse": 0.018 }],
//!   "cycles": { "ciclo_a6": { "c1": 1.575, "c2": 0.626 } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::data::reference::CoefficientTable;
use crate::domain::{Coefficients, ModelKind, ReferenceFit};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CoefficientFile {
    #[serde(default)]
    mean: Vec<MeanEntry>,
    #[serde(default)]
    cycles: BTreeMap<String, Coefficients>,
}

#[derive(Debug, Deserialize)]
struct MeanEntry {
    model: ModelKind,
    c1: f64,
    c2: f64,
    #[serde(default)]
    rmse: Option<f64>,
}

/// Load an override file and merge it over the reference table.
pub fn load_coefficient_table(path: &Path) -> Result<CoefficientTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open coefficients JSON '{}': {e}", path.display()))
    })?;
    let table = read_coefficient_table(file)?;
    info!(path = %path.display(), cycles = table.cycles.len(), "loaded coefficient overrides");
    Ok(table)
}

/// Parse an override document from any reader and merge it over the reference table.
///
/// JSON has no NaN or infinity literals and serde_json rejects numbers that
/// overflow `f64`, so every parsed coefficient is finite.
pub fn read_coefficient_table<R: Read>(reader: R) -> Result<CoefficientTable, AppError> {
    let parsed: CoefficientFile = serde_json::from_reader(reader)
        .map_err(|e| AppError::usage(format!("Invalid coefficients JSON: {e}")))?;

    let mut table = CoefficientTable::reference();

    for entry in parsed.mean {
        table.set_mean_fit(ReferenceFit {
            kind: entry.model,
            coefficients: Coefficients::new(entry.c1, entry.c2),
            rmse: entry.rmse,
        });
    }

    for (name, coefficients) in parsed.cycles {
        table.set_cycle(&name, coefficients);
    }

    Ok(table)
}
