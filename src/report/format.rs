//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the model/evaluation code stays clean and testable
//! - output changes are localized

use crate::domain::{Coefficients, CycleTable, DataSource, ModelKind};
use crate::io::ingest::IngestedTable;
use crate::report::{CycleFit, CycleFits, ModelSeries};

/// Format the run summary (data source + table stats + model diagnostics).
pub fn format_summary(source: &DataSource, ingest: &IngestedTable, series: &[ModelSeries]) -> String {
    let mut out = String::new();

    out.push_str("=== alfalfa - growth model overlay ===\n");
    out.push_str(&format!("Data: {}\n", source.describe()));
    out.push_str(&format!(
        "Table: rows={} | cycles={} | tau=[{:.3}, {:.3}] | observations={}\n",
        ingest.stats.n_rows,
        ingest.stats.n_cycles,
        ingest.stats.tau_min,
        ingest.stats.tau_max,
        ingest.stats.n_observations,
    ));
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "Skipped rows: {} of {}\n",
            ingest.row_errors.len(),
            ingest.rows_read
        ));
        for err in ingest.row_errors.iter().take(5) {
            out.push_str(&format!("  line {}: {}\n", err.line, err.message));
        }
    }

    out.push_str("\nMean-cycle models:\n");
    out.push_str(
        format!(
            "{:<10} {:>12} {:>12} {:>10} {:>10} {:>10}\n",
            "model", "c1", "c2", "rmse_ref", "rmse_obs", "tau_half"
        )
        .trim_end(),
    );
    out.push('\n');
    for s in series {
        out.push_str(
            format!(
                "{:<10} {:>12.8} {:>12.8} {:>10} {:>10} {:>10}\n",
                s.kind.display_name(),
                s.coefficients.c1,
                s.coefficients.c2,
                fmt_opt(s.reference_rmse, 4),
                fmt_opt(Some(s.stats.rmse), 4),
                fmt_opt(s.half_growth_tau, 3),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str("\nFormulas:\n");
    for s in series {
        out.push_str(&format!("- {:<9} {}\n", s.kind.display_name(), s.kind.formula()));
    }
    out.push('\n');

    out
}

/// Format the per-cycle Fisher coefficient table.
pub fn format_cycle_table(fits: &CycleFits) -> String {
    let mut out = String::new();

    out.push_str("Per-cycle Fisher fits:\n");
    out.push_str(
        format!(
            "{:<12} {:>8} {:>8} {:>10} {:>10} {:>4}\n",
            "cycle", "c1", "c2", "rmse", "max_abs", "n"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<8} {:-<8} {:-<10} {:-<10} {:-<4}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for f in &fits.fits {
        out.push_str(
            format!(
                "{:<12} {:>8.3} {:>8.3} {:>10} {:>10} {:>4}\n",
                truncate(&f.cycle, 12),
                f.coefficients.c1,
                f.coefficients.c2,
                fmt_opt(Some(f.stats.rmse), 4),
                fmt_opt(Some(f.stats.max_abs), 4),
                f.stats.n,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    if !fits.skipped.is_empty() {
        out.push_str(&format!("(no coefficients) {}\n", fits.skipped.join(", ")));
    }

    out
}

/// Format the raw cycle table: one row per `tau`, one column per cycle, then the mean.
pub fn format_cycle_values(table: &CycleTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Cycle values (rows={}, cycles={}):\n",
        table.len(),
        table.cycles.len()
    ));

    let mut columns: Vec<(&str, &[f64])> = table
        .cycles
        .iter()
        .map(|c| (c.name.as_str(), c.values.as_slice()))
        .collect();
    columns.push(("mean", table.mean.as_slice()));
    let widths: Vec<usize> = columns.iter().map(|(name, _)| name.len().max(6)).collect();

    let mut header = format!("{:>6}", "tau");
    for ((name, _), w) in columns.iter().zip(&widths) {
        header.push_str(&format!(" {name:>w$}"));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (row, t) in table.tau.iter().enumerate() {
        let mut line = format!("{t:>6.3}");
        for ((_, values), w) in columns.iter().zip(&widths) {
            let cell = values.get(row).copied();
            line.push_str(&format!(" {:>w$}", fmt_opt(cell, 3)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Format one cycle's observations against its Fisher curve.
pub fn format_cycle_report(fit: &CycleFit, tau: &[f64], observed: &[f64]) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} - Fisher ===\n", fit.cycle));
    out.push_str(&format!(
        "c1={:.3} c2={:.3} | tau_half={} | rmse={} | n={}\n\n",
        fit.coefficients.c1,
        fit.coefficients.c2,
        fmt_opt(fit.half_growth_tau, 3),
        fmt_opt(Some(fit.stats.rmse), 4),
        fit.stats.n,
    ));

    out.push_str(format!("{:>8} {:>10} {:>10} {:>10}\n", "tau", "observed", "fisher", "residual").trim_end());
    out.push('\n');
    for ((t, y), f) in tau.iter().zip(observed).zip(&fit.predicted) {
        out.push_str(
            format!(
                "{:>8.3} {:>10} {:>10.4} {:>10}\n",
                t,
                fmt_opt(Some(*y), 4),
                f,
                fmt_opt(Some(y - f), 4),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format a direct model evaluation (`alfalfa eval`).
pub fn format_evaluation(kind: ModelKind, coefficients: Coefficients, tau: &[f64], values: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} c1={} c2={}\n{}\n",
        kind.display_name(),
        coefficients.c1,
        coefficients.c2,
        kind.formula()
    ));
    out.push_str(format!("{:>12} {:>12}\n", "tau", "f(tau)").trim_end());
    out.push('\n');
    for (t, y) in tau.iter().zip(values) {
        out.push_str(format!("{t:>12.6} {y:>12.6}\n").trim_end());
        out.push('\n');
    }
    out
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CycleSeries, ResidualStats};

    #[test]
    fn evaluation_lists_every_tau() {
        let txt = format_evaluation(
            ModelKind::Fisher,
            Coefficients::new(1.0, 0.0),
            &[0.0, 1.0],
            &[0.5, 0.880797],
        );
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Fisher c1=1 c2=0");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "    0.000000     0.500000");
        assert_eq!(lines[4], "    1.000000     0.880797");
    }

    #[test]
    fn cycle_table_reports_skipped() {
        let fits = CycleFits {
            fits: vec![CycleFit {
                cycle: "ciclo_a6".to_string(),
                coefficients: Coefficients::new(1.575, 0.626),
                half_growth_tau: Some(0.397),
                predicted: vec![],
                stats: ResidualStats {
                    n: 13,
                    sse: 0.0013,
                    rmse: 0.01,
                    max_abs: 0.02,
                },
            }],
            skipped: vec!["ciclo_zz".to_string()],
        };
        let txt = format_cycle_table(&fits);
        assert!(txt.contains("ciclo_a6        1.575    0.626     0.0100     0.0200   13"));
        assert!(txt.ends_with("(no coefficients) ciclo_zz\n"));
    }

    #[test]
    fn cycle_values_show_every_cycle_and_mean() {
        let table = CycleTable::new(
            vec![0.0, 0.5],
            vec![
                CycleSeries {
                    name: "a".to_string(),
                    values: vec![0.1, f64::NAN],
                },
                CycleSeries {
                    name: "ciclo_b4".to_string(),
                    values: vec![0.2, 0.6],
                },
            ],
            None,
        )
        .unwrap();
        let txt = format_cycle_values(&table);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Cycle values (rows=2, cycles=2):");
        assert_eq!(lines[1], "   tau      a ciclo_b4   mean");
        assert_eq!(lines[2], " 0.000  0.100    0.200  0.150");
        assert_eq!(lines[3], " 0.500      -    0.600  0.600");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(fmt_opt(None, 3), "-");
        assert_eq!(fmt_opt(Some(f64::NAN), 3), "-");
        assert_eq!(fmt_opt(Some(0.12345), 3), "0.123");
        assert_eq!(truncate("ciclo_very_long", 8), "ciclo_v.");
    }
}
