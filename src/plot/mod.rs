//! Terminal plotting (fixed-size ASCII grid).

pub mod ascii;

pub use ascii::*;
