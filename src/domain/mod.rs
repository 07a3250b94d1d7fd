//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model selection enums (`ModelKind`, `ModelSpec`)
//! - coefficient pairs and reference fits (`Coefficients`, `ReferenceFit`)
//! - the normalized cycle table (`CycleTable`, `CycleSeries`)
//! - diagnostics and run configuration (`ResidualStats`, `DashboardConfig`)

pub mod types;

pub use types::*;
