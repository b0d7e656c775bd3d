//! Route handlers.

pub mod analyze;
pub mod auth;
pub mod reports;
pub mod root;
pub mod settings;
