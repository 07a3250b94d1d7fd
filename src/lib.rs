//! `alfalfa-growth` library crate.
//!
//! The binary (`alfalfa`) is a thin wrapper around this library so that:
//!
//! - the growth models are usable without the dashboard
//! - core logic is testable without spawning processes
//! - the CLI and the TUI share one pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
