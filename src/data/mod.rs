//! Built-in data: reference coefficient tables and synthetic demo cycles.

pub mod reference;
pub mod synthetic;

pub use reference::*;
pub use synthetic::*;
