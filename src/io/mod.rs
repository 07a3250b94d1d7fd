//! Input helpers.
//!
//! - cycle table ingest + validation (`ingest`)
//! - coefficient table overrides (`coefficients`)

pub mod coefficients;
pub mod ingest;

pub use coefficients::*;
pub use ingest::*;
