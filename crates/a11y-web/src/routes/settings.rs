//! Per-user settings.

use a11y_core::settings::{self, UserSettings};
use axum::{extract::State, Json};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserSettings>, ApiError> {
    Ok(Json(settings::get_settings(&state.db, &user.uid)?))
}

pub async fn update_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<UserSettings>,
) -> Result<Json<UserSettings>, ApiError> {
    let saved = settings::update_settings(&state.db, &user.uid, &req)?;
    tracing::debug!(user_id = %user.uid, "Settings updated");
    Ok(Json(saved))
}
