//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - runs the dashboard pipeline
//! - prints reports/plots or launches the TUI

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CycleArgs, DashboardArgs, EvalArgs};
use crate::domain::{Coefficients, DashboardConfig};
use crate::error::AppError;

pub mod pipeline;

/// Env var holding a `tracing` filter directive (e.g. `alfalfa_growth=debug`).
pub const LOG_ENV: &str = "ALFALFA_LOG";

/// Entry point for the `alfalfa` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `alfalfa` and `alfalfa -f cycles.dat` to behave like `alfalfa tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // Log lines on stderr would tear through the alternate screen.
    if !matches!(cli.command, Command::Tui(_)) {
        setup_logging(cli.verbose);
    }

    match cli.command {
        Command::Summary(args) => handle_summary(&args),
        Command::Cycles(args) => handle_cycles(&args),
        Command::Table(args) => handle_table(&args),
        Command::Cycle(args) => handle_cycle(&args),
        Command::Eval(args) => handle_eval(&args),
        Command::Tui(args) => crate::tui::run(dashboard_config_from_args(&args)?),
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (e.g. in tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn handle_summary(args: &DashboardArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(args)?;
    let run = pipeline::run_dashboard(&config)?;
    let ingest = &run.inputs.ingest;

    println!(
        "{}",
        crate::report::format_summary(&run.inputs.source, ingest, &run.mean_fits)
    );

    if config.plot {
        let plot = crate::plot::render_mean_overlay(
            &ingest.table.tau,
            &ingest.table.mean,
            &run.mean_fits,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }
    Ok(())
}

fn handle_cycles(args: &DashboardArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(args)?;
    let run = pipeline::run_dashboard(&config)?;
    println!("{}", crate::report::format_cycle_table(&run.cycle_fits));
    Ok(())
}

fn handle_table(args: &DashboardArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(args)?;
    let run = pipeline::run_dashboard(&config)?;
    print!("{}", crate::report::format_cycle_values(&run.inputs.ingest.table));
    Ok(())
}

fn handle_cycle(args: &CycleArgs) -> Result<(), AppError> {
    println!("{}", render_cycle(args)?);
    Ok(())
}

/// Report (and plot, unless disabled) for a single named cycle.
fn render_cycle(args: &CycleArgs) -> Result<String, AppError> {
    let config = dashboard_config_from_args(&args.dashboard)?;
    let run = pipeline::run_dashboard(&config)?;
    let table = &run.inputs.ingest.table;

    let series = table.cycle(&args.name).ok_or_else(|| {
        AppError::usage(format!(
            "Unknown cycle `{}`. Available: {}",
            args.name,
            table.cycle_names().join(", ")
        ))
    })?;
    let fit = run.cycle_fits.get(&series.name).ok_or_else(|| {
        AppError::usage(format!("No Fisher coefficients for cycle `{}`.", series.name))
    })?;

    let mut out = crate::report::format_cycle_report(fit, &table.tau, &series.values);
    if config.plot {
        out.push('\n');
        out.push_str(&crate::plot::render_cycle_plot(
            &table.tau,
            &series.values,
            fit,
            config.plot_width,
            config.plot_height,
        ));
    }
    Ok(out)
}

fn handle_eval(args: &EvalArgs) -> Result<(), AppError> {
    print!("{}", render_eval(args)?);
    Ok(())
}

fn render_eval(args: &EvalArgs) -> Result<String, AppError> {
    let coefficients = Coefficients::new(args.c1, args.c2);
    let tau = eval_grid(args)?;
    let values = crate::models::evaluate_many(args.model, &tau, coefficients);
    Ok(crate::report::format_evaluation(args.model, coefficients, &tau, &values))
}

/// Explicit TAU values, or an even grid over `[tau_min, tau_max]`.
fn eval_grid(args: &EvalArgs) -> Result<Vec<f64>, AppError> {
    if !args.tau.is_empty() {
        return Ok(args.tau.clone());
    }
    if args.steps < 2 {
        return Err(AppError::usage("`--steps` must be >= 2."));
    }
    Ok(crate::math::linspace(args.tau_min, args.tau_max, args.steps))
}

pub fn dashboard_config_from_args(args: &DashboardArgs) -> Result<DashboardConfig, AppError> {
    if !args.delimiter.is_ascii() {
        return Err(AppError::usage(format!(
            "Delimiter must be a single ASCII character (got {:?}).",
            args.delimiter
        )));
    }
    Ok(DashboardConfig {
        data_path: args.data.clone(),
        coefficients_path: args.coefficients.clone(),
        delimiter: args.delimiter as u8,
        model_spec: args.model,
        demo_seed: args.seed,
        demo_noise: args.noise,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    })
}

/// Rewrite argv so `alfalfa` defaults to `alfalfa tui`.
///
/// Rules:
/// - `alfalfa`                          -> `alfalfa tui`
/// - `alfalfa -f cycles.dat ...`        -> `alfalfa tui -f cycles.dat ...`
/// - `alfalfa --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "cycles" | "table" | "cycle" | "eval" | "tui");
    if is_subcommand {
        return argv;
    }

    // The global verbose flag may precede a subcommand.
    if matches!(arg1.as_str(), "-v" | "--verbose") {
        let rest = rewrite_args(argv[1..].to_vec());
        let mut out = vec![argv[0].clone(), arg1];
        out.extend(rest.into_iter().skip(1));
        return out;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["alfalfa"])), argv(&["alfalfa", "tui"]));
    }

    #[test]
    fn leading_flags_become_tui_flags() {
        assert_eq!(
            rewrite_args(argv(&["alfalfa", "-f", "cycles.dat"])),
            argv(&["alfalfa", "tui", "-f", "cycles.dat"])
        );
        assert_eq!(
            rewrite_args(argv(&["alfalfa", "-v"])),
            argv(&["alfalfa", "-v", "tui"])
        );
        assert_eq!(
            rewrite_args(argv(&["alfalfa", "-v", "--seed", "3"])),
            argv(&["alfalfa", "-v", "tui", "--seed", "3"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            &["alfalfa", "summary"][..],
            &["alfalfa", "-v", "cycles"][..],
            &["alfalfa", "table", "--seed", "3"][..],
            &["alfalfa", "--help"][..],
            &["alfalfa", "eval", "-m", "fisher", "--c1", "1", "--c2", "0"][..],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    fn eval_args(extra: &[&str]) -> EvalArgs {
        let mut args = vec!["alfalfa", "eval", "-m", "fisher", "--c1", "2.35594909", "--c2", "0.86735709"];
        args.extend_from_slice(extra);
        let Command::Eval(args) = crate::cli::Cli::parse_from(args).command else {
            panic!("expected eval");
        };
        args
    }

    fn cycle_args(name: &str) -> CycleArgs {
        let cli = crate::cli::Cli::parse_from(["alfalfa", "cycle", name, "--no-plot"]);
        let Command::Cycle(args) = cli.command else {
            panic!("expected cycle");
        };
        args
    }

    #[test]
    fn eval_defaults_to_thirteen_point_grid() {
        let tau = eval_grid(&eval_args(&[])).unwrap();
        assert_eq!(tau.len(), 13);
        assert_eq!(tau[0], 0.0);
        assert!((tau[12] - 1.2).abs() < 1e-12);

        let out = render_eval(&eval_args(&[])).unwrap();
        assert!(out.contains("0.149986"), "{out}");
    }

    #[test]
    fn eval_prefers_explicit_tau() {
        let tau = eval_grid(&eval_args(&["0.5", "-1"])).unwrap();
        assert_eq!(tau, vec![0.5, -1.0]);
        // `--steps` only matters for the generated grid.
        assert!(eval_grid(&eval_args(&["--steps", "1", "0.5"])).is_ok());
    }

    #[test]
    fn eval_rejects_single_step_grid() {
        let err = render_eval(&eval_args(&["--steps", "1"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_cycle_is_usage_error() {
        let err = render_cycle(&cycle_args("ciclo_z9")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("ciclo_a6"));
    }

    #[test]
    fn known_cycle_renders_report() {
        let out = render_cycle(&cycle_args("CICLO_B4")).unwrap();
        assert!(out.contains("ciclo_b4"), "{out}");
        assert!(!out.contains("Plot:"));
    }

    #[test]
    fn config_rejects_non_ascii_delimiter() {
        let cli = crate::cli::Cli::parse_from(["alfalfa", "summary", "--delimiter", "§"]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(dashboard_config_from_args(&args).unwrap_err().exit_code(), 2);
    }
}
