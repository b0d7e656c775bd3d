//! Token inspection endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{AuthError, CurrentUser};
use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyTokenParams {
    pub id_token: String,
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({
        "message": "Authenticated successfully",
        "user": user,
    }))
}

pub async fn verify_token(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<VerifyTokenParams>,
) -> Result<Json<Value>, ApiError> {
    let validator = state.auth.as_ref().ok_or_else(|| ApiError::from(AuthError::Unavailable))?;

    let user = validator.validate(&params.id_token).await.map_err(|e| {
        if e.is_client_error() {
            ApiError::new(StatusCode::UNAUTHORIZED, format!("Invalid or expired token: {}", e))
        } else {
            ApiError::from(e)
        }
    })?;

    Ok(Json(json!({
        "message": "Token verified successfully",
        "decoded_token": user.decoded_token,
    })))
}
