//! Database query implementations.

pub mod reports;
pub mod settings;
