//! Sigmoid growth model implementations (Fisher, Landau, Gompertz).
//!
//! Models are implemented as small, pure functions so that reporting and
//! plotting code can stay generic over the model family.

pub mod model;

pub use model::*;
