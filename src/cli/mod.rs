//! Command-line parsing for the alfalfa growth dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ModelKind, ModelSpec};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "alfalfa", version, about = "Alfalfa growth dynamics: Fisher, Landau and Gompertz models")]
pub struct Cli {
    /// Verbose logging (debug level) on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Overlay the mean-cycle models on the averaged cycle and print diagnostics.
    Summary(DashboardArgs),
    /// Print the per-cycle Fisher coefficient table.
    Cycles(DashboardArgs),
    /// Print the raw cycle table (every cycle's values plus the mean).
    Table(DashboardArgs),
    /// Show one cycle's observations against its Fisher curve.
    Cycle(CycleArgs),
    /// Evaluate a model directly for given coefficients.
    Eval(EvalArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `alfalfa summary`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(DashboardArgs),
}

/// Common options for every dashboard view.
#[derive(Debug, Args, Clone)]
pub struct DashboardArgs {
    /// Cycle table (`tau;<cycles...>;mean_val`). Synthetic demo cycles are used when omitted.
    #[arg(short = 'f', long, env = "ALFALFA_DATA", value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Coefficient overrides (JSON).
    #[arg(long, env = "ALFALFA_COEFFICIENTS", value_name = "JSON")]
    pub coefficients: Option<PathBuf>,

    /// Field delimiter of the cycle table.
    #[arg(long, default_value_t = ';')]
    pub delimiter: char,

    /// Which model(s) to overlay on the mean cycle.
    #[arg(short = 'm', long, value_enum, default_value_t = ModelSpec::All)]
    pub model: ModelSpec,

    /// Random seed for synthetic demo cycles.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Noise standard deviation for synthetic demo cycles.
    #[arg(long, default_value_t = 0.02)]
    pub noise: f64,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for a single-cycle view.
#[derive(Debug, Args, Clone)]
pub struct CycleArgs {
    /// Cycle column name (e.g. `ciclo_a6`).
    pub name: String,

    #[command(flatten)]
    pub dashboard: DashboardArgs,
}

/// Options for direct evaluation.
#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    /// Model family.
    #[arg(short = 'm', long, value_enum)]
    pub model: ModelKind,

    /// First coefficient.
    #[arg(long, allow_negative_numbers = true)]
    pub c1: f64,

    /// Second coefficient.
    #[arg(long, allow_negative_numbers = true)]
    pub c2: f64,

    /// Time coordinates to evaluate. An even grid is used when omitted.
    #[arg(allow_negative_numbers = true, value_name = "TAU")]
    pub tau: Vec<f64>,

    /// Grid points when no TAU values are given.
    #[arg(long, default_value_t = 13)]
    pub steps: usize,

    /// Grid start.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub tau_min: f64,

    /// Grid end.
    #[arg(long, default_value_t = 1.2, allow_negative_numbers = true)]
    pub tau_max: f64,
}
