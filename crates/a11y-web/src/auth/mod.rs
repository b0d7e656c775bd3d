//! Bearer-token authentication.
//!
//! Handlers take a [`CurrentUser`] argument; the extractor reads the
//! `Authorization: Bearer <token>` header and checks it with the configured
//! [`TokenValidator`]. With no validator configured, authentication is
//! disabled and every request acts as [`ANONYMOUS_UID`].

pub mod firebase;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Uid used for every request when authentication is disabled.
pub const ANONYMOUS_UID: &str = "anonymous";

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is missing. Please provide a Firebase ID token.")]
    MissingHeader,

    #[error("Invalid Authorization header format. Expected 'Bearer <token>'.")]
    InvalidHeaderFormat,

    #[error("Invalid authentication scheme. Must be 'Bearer'.")]
    InvalidScheme,

    #[error("Your authentication session has expired. Please log in again.")]
    Expired,

    #[error("Authentication token signature is invalid. Please ensure correct service account configuration.")]
    InvalidSignature,

    #[error("Invalid or expired authentication token. Please log in again. Detail: {0}")]
    InvalidToken(String),

    #[error("Failed to fetch token signing keys: {0}")]
    KeyFetch(String),

    #[error("Authentication service not available. Please try again later.")]
    Unavailable,
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::KeyFetch(_) | AuthError::Unavailable)
    }

    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Identity extracted from a validated token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub uid: String,
    /// Full decoded claim set.
    pub decoded_token: serde_json::Value,
}

impl AuthenticatedUser {
    pub fn anonymous() -> Self {
        Self {
            uid: ANONYMOUS_UID.to_string(),
            decoded_token: serde_json::json!({ "uid": ANONYMOUS_UID }),
        }
    }
}

/// Validates a bearer token and returns the user it identifies.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::InvalidHeaderFormat)?;

    let (scheme, token) = value
        .trim()
        .split_once(char::is_whitespace)
        .ok_or(AuthError::InvalidHeaderFormat)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidHeaderFormat);
    }
    Ok(token)
}

/// The authenticated caller.
pub struct CurrentUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(validator) = &state.auth else {
            return Ok(CurrentUser(AuthenticatedUser::anonymous()));
        };

        let token = extract_bearer_token(&parts.headers).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request without usable credentials");
            ApiError::from(e)
        })?;

        let user = validator.validate(token).await.map_err(|e| {
            tracing::warn!(error = %e, "Authentication failed");
            ApiError::from(e)
        })?;

        tracing::debug!(uid = %user.uid, "Authenticated request");
        Ok(CurrentUser(user))
    }
}
