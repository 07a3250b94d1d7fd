//! Cycle table ingest.
//!
//! Turns a delimited text table (`;` by default) of normalized growth cycles
//! into a [`CycleTable`]:
//!
//! ```text
//! tau;ciclo_a6;ciclo_a7;...;mean_val;std_val
//! 0.0;0.12;0.18;...;0.15;0.03
//! ```
//!
//! - `tau` is required; rows without a finite `tau` are skipped and reported
//! - every other column is a cycle, except summary columns (`mean*`, `std*`, `sd`)
//! - unparsable cycle cells become `NaN` (missing observation)
//! - `mean_val` is used as the mean when present, otherwise the row mean of
//!   the cycles is derived

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{CycleSeries, CycleTable};
use crate::error::AppError;

const TAU_COLUMN: &str = "tau";
const MEAN_COLUMN: &str = "mean_val";

/// Summary stats about the rows actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    pub n_rows: usize,
    pub n_cycles: usize,
    pub tau_min: f64,
    pub tau_max: f64,
    /// Non-missing cycle observations.
    pub n_observations: usize,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the table + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: CycleTable,
    pub stats: TableStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedTable {
    /// Wrap an in-memory table (e.g. synthetic demo data).
    pub fn from_table(table: CycleTable) -> Result<Self, AppError> {
        let stats = compute_stats(&table)
            .ok_or_else(|| AppError::no_data("Cycle table has no rows with a finite tau."))?;
        let rows = table.len();
        Ok(Self {
            table,
            stats,
            row_errors: Vec::new(),
            rows_read: rows,
            rows_used: rows,
        })
    }
}

/// Load a cycle table from disk.
pub fn load_cycle_table(path: &Path, delimiter: u8) -> Result<IngestedTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open cycle table '{}': {e}", path.display()))
    })?;
    let ingested = read_cycle_table(file, delimiter)?;
    info!(
        path = %path.display(),
        rows = ingested.rows_used,
        cycles = ingested.stats.n_cycles,
        "loaded cycle table"
    );
    Ok(ingested)
}

/// Parse a cycle table from any reader.
pub fn read_cycle_table<R: Read>(reader: R, delimiter: u8) -> Result<IngestedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read cycle table headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let tau_idx = *header_map
        .get(TAU_COLUMN)
        .ok_or_else(|| AppError::usage("Missing required column: `tau`"))?;
    let mean_idx = header_map.get(MEAN_COLUMN).copied();

    let cycle_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (idx, normalize_header_name(name)))
        .filter(|(idx, name)| *idx != tau_idx && !name.is_empty() && !is_summary_column(name))
        .collect();

    if cycle_columns.is_empty() {
        return Err(AppError::no_data("Cycle table has no cycle columns."));
    }

    let mut tau = Vec::new();
    let mut mean = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); cycle_columns.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header line.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("parse error: {e}"),
                });
                continue;
            }
        };

        let Some(t) = parse_cell(&record, tau_idx) else {
            row_errors.push(RowError {
                line,
                message: "Missing/invalid `tau` value.".to_string(),
            });
            continue;
        };

        tau.push(t);
        mean.push(mean_idx.and_then(|i| parse_cell(&record, i)).unwrap_or(f64::NAN));
        for (slot, (col, _)) in values.iter_mut().zip(&cycle_columns) {
            slot.push(parse_cell(&record, *col).unwrap_or(f64::NAN));
        }
    }

    for err in &row_errors {
        warn!(line = err.line, "skipped row: {}", err.message);
    }

    let rows_used = tau.len();
    if rows_used == 0 {
        return Err(AppError::no_data("No valid rows in cycle table."));
    }

    let cycles = cycle_columns
        .into_iter()
        .zip(values)
        .map(|((_, name), values)| CycleSeries { name, values })
        .collect();

    // Only trust `mean_val` when every kept row has one.
    let mean = (mean_idx.is_some() && mean.iter().all(|v| v.is_finite())).then_some(mean);
    let table = CycleTable::new(tau, cycles, mean)?;

    let stats = compute_stats(&table)
        .ok_or_else(|| AppError::no_data("No valid rows in cycle table."))?;

    Ok(IngestedTable {
        table,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn is_summary_column(name: &str) -> bool {
    name.starts_with("mean") || name.starts_with("std") || name == "sd"
}

fn parse_cell(record: &StringRecord, idx: usize) -> Option<f64> {
    let s = record.get(idx).map(str::trim).filter(|s| !s.is_empty())?;
    // Tolerate decimal commas when the delimiter is not a comma.
    let v = s.parse::<f64>().or_else(|_| s.replace(',', ".").parse::<f64>()).ok()?;
    v.is_finite().then_some(v)
}

fn compute_stats(table: &CycleTable) -> Option<TableStats> {
    let (tau_min, tau_max) = crate::math::finite_range(&table.tau)?;
    let n_observations = table
        .cycles
        .iter()
        .flat_map(|c| c.values.iter())
        .filter(|v| v.is_finite())
        .count();
    Some(TableStats {
        n_rows: table.len(),
        n_cycles: table.cycles.len(),
        tau_min,
        tau_max,
        n_observations,
    })
}
