//! Firebase ID token validation.
//!
//! Tokens are RS256 JWTs signed by Google's `securetoken` service account.
//! Signing keys are fetched from the public JWKS endpoint and cached for an
//! hour; an unknown `kid` forces a refresh.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::{AuthError, AuthenticatedUser, TokenValidator};

/// Public signing keys for Firebase ID tokens.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// A single RSA JSON Web Key.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub n: String,
    pub e: String,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

struct CachedKeys {
    keys: Vec<Jwk>,
    fetched_at: Instant,
}

pub struct FirebaseTokenValidator {
    project_id: String,
    jwks_url: String,
    cached: RwLock<Option<CachedKeys>>,
    http_client: Option<reqwest::Client>,
}

impl FirebaseTokenValidator {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_jwks_url(project_id, FIREBASE_JWKS_URL)
    }

    pub fn with_jwks_url(project_id: impl Into<String>, jwks_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            project_id: project_id.into(),
            jwks_url: jwks_url.into(),
            cached: RwLock::new(None),
            http_client: Some(http_client),
        }
    }

    /// Validator with fixed keys and no network access.
    pub fn with_static_keys(project_id: impl Into<String>, keys: Vec<Jwk>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: String::new(),
            cached: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
            http_client: None,
        }
    }

    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid in token header".to_string()))?;

        let key = self.find_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| AuthError::KeyFetch(format!("unusable key '{}': {}", kid, e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let data = decode::<serde_json::Value>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let claims = data.claims;
        let uid = claims
            .get("sub")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("token has an empty subject".to_string()))?
            .to_string();

        Ok(AuthenticatedUser {
            uid,
            decoded_token: claims,
        })
    }

    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(key) = self.lookup_cached(kid) {
            return Ok(key);
        }

        if self.http_client.is_some() {
            self.refresh_keys().await?;
            if let Some(key) = self.lookup_cached(kid) {
                return Ok(key);
            }
        }

        Err(AuthError::InvalidToken(format!("no signing key matches kid '{}'", kid)))
    }

    fn lookup_cached(&self, kid: &str) -> Option<Jwk> {
        let cache = self.cached.read().ok()?;
        let cached = cache.as_ref()?;

        if self.http_client.is_some() && cached.fetched_at.elapsed() > JWKS_CACHE_TTL {
            return None;
        }
        cached.keys.iter().find(|k| k.kid == kid).cloned()
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let client = self
            .http_client
            .as_ref()
            .ok_or_else(|| AuthError::KeyFetch("no HTTP client (static keys mode)".to_string()))?;

        let response = client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetch(format!("JWKS endpoint returned {}", response.status())));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        tracing::debug!(keys = jwks.keys.len(), "Refreshed Firebase signing keys");

        let mut cache = self
            .cached
            .write()
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;
        *cache = Some(CachedKeys {
            keys: jwks.keys,
            fetched_at: Instant::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl TokenValidator for FirebaseTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.validate_token(token).await
    }
}
