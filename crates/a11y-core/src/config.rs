//! Runtime configuration from environment variables and `.env`.

use base64::Engine;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{A11yError, A11yResult};

pub const DEFAULT_DATABASE_PATH: &str = ".a11y/a11y.db";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "https://accessibility-analyzer-kappa.vercel.app",
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub firebase_project_id: Option<String>,
    pub cors_origins: Vec<String>,
    /// How long a stored report is served instead of re-analysing. Zero disables.
    pub cache_ttl: Duration,
    pub ai_concurrency: usize,
    pub fetch_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            firebase_project_id: None,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            cache_ttl: Duration::from_secs(3600),
            ai_concurrency: 4,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// Load `.env` from the working directory if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env"),
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> A11yResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> A11yResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let firebase_project_id = match var("FIREBASE_PROJECT_ID") {
            Some(id) => Some(id),
            None => var("FIREBASE_SERVICE_ACCOUNT_BASE64")
                .map(|encoded| project_id_from_service_account(&encoded))
                .transpose()?,
        };

        Ok(Self {
            database_path: var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            firebase_project_id,
            cors_origins: match var("BACKEND_CORS_ORIGINS") {
                Some(raw) => parse_origins(&raw)?,
                None => defaults.cors_origins,
            },
            cache_ttl: match var("CACHE_TTL_SECS") {
                Some(raw) => Duration::from_secs(parse_number("CACHE_TTL_SECS", &raw)?),
                None => defaults.cache_ttl,
            },
            ai_concurrency: match var("AI_CONCURRENCY") {
                Some(raw) => parse_number::<usize>("AI_CONCURRENCY", &raw)?.max(1),
                None => defaults.ai_concurrency,
            },
            fetch_timeout: match var("FETCH_TIMEOUT_SECS") {
                Some(raw) => match parse_number::<u64>("FETCH_TIMEOUT_SECS", &raw)? {
                    0 => return Err(A11yError::config("FETCH_TIMEOUT_SECS must be at least 1")),
                    secs => Duration::from_secs(secs),
                },
                None => defaults.fetch_timeout,
            },
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> A11yResult<T> {
    raw.parse()
        .map_err(|_| A11yError::config(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}

/// Accepts a JSON array (`["a","b"]`) or a comma-separated list.
fn parse_origins(raw: &str) -> A11yResult<Vec<String>> {
    let origins: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str(raw)
            .map_err(|e| A11yError::config(format!("BACKEND_CORS_ORIGINS is not a JSON list: {}", e)))?
    } else {
        raw.split(',').map(|s| s.to_string()).collect()
    };

    Ok(origins
        .into_iter()
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect())
}

/// Extract `project_id` from a base64-encoded service account JSON document.
pub fn project_id_from_service_account(encoded: &str) -> A11yResult<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| A11yError::config(format!("FIREBASE_SERVICE_ACCOUNT_BASE64 is not valid base64: {}", e)))?;

    let account: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| A11yError::config(format!("service account is not valid JSON: {}", e)))?;

    account
        .get("project_id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| A11yError::config("service account JSON has no project_id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> A11yResult<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from(".a11y/a11y.db"));
        assert_eq!(config.cors_origins.len(), 3);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert!(config.gemini_api_key.is_none());
        assert!(config.firebase_project_id.is_none());
    }

    #[test]
    fn test_origins_comma_and_json() {
        let config = config_from(&[("BACKEND_CORS_ORIGINS", "https://a.test/, https://b.test")]).unwrap();
        assert_eq!(config.cors_origins, vec!["https://a.test", "https://b.test"]);

        let config = config_from(&[("BACKEND_CORS_ORIGINS", r#"["https://c.test"]"#)]).unwrap();
        assert_eq!(config.cors_origins, vec!["https://c.test"]);
    }

    #[test]
    fn test_project_id_from_service_account() {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(r#"{"type":"service_account","project_id":"demo-project"}"#);
        let config = config_from(&[("FIREBASE_SERVICE_ACCOUNT_BASE64", &encoded)]).unwrap();
        assert_eq!(config.firebase_project_id.as_deref(), Some("demo-project"));

        let config = config_from(&[
            ("FIREBASE_PROJECT_ID", "explicit"),
            ("FIREBASE_SERVICE_ACCOUNT_BASE64", &encoded),
        ])
        .unwrap();
        assert_eq!(config.firebase_project_id.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            config_from(&[("FIREBASE_SERVICE_ACCOUNT_BASE64", "%%%")]),
            Err(A11yError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("CACHE_TTL_SECS", "soon")]),
            Err(A11yError::Config(_))
        ));
    }

    #[test]
    fn test_concurrency_floor() {
        let config = config_from(&[("AI_CONCURRENCY", "0")]).unwrap();
        assert_eq!(config.ai_concurrency, 1);
    }

    #[test]
    fn test_zero_fetch_timeout_rejected() {
        assert!(matches!(
            config_from(&[("FETCH_TIMEOUT_SECS", "0")]),
            Err(A11yError::Config(_))
        ));
        let config = config_from(&[("FETCH_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }
}
