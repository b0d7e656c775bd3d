//! Application state.

use a11y_core::analyzer::Analyzer;
use a11y_db::DbPool;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenValidator;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub analyzer: Arc<Analyzer>,
    /// `None` disables authentication.
    pub auth: Option<Arc<dyn TokenValidator>>,
    pub cache_ttl: Duration,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, analyzer: Arc<Analyzer>) -> Self {
        Self {
            db,
            analyzer,
            auth: None,
            cache_ttl: Duration::from_secs(3600),
        }
    }

    pub fn with_auth(mut self, validator: Arc<dyn TokenValidator>) -> Self {
        self.auth = Some(validator);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn auth_enabled(&self) -> bool {
        self.auth.is_some()
    }
}
