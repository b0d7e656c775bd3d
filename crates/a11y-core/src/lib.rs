//! Accessibility Analyzer Core Library
//!
//! Page fetching, the static accessibility rule engine, scoring, AI fix
//! suggestions and the report/settings services built on `a11y-db`.

pub mod analyzer;
pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod model;
pub mod report;
pub mod rules;
pub mod score;
pub mod settings;
pub mod suggest;

pub use error::{A11yError, A11yResult};
