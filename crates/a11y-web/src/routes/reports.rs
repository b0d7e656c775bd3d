//! Report route handlers.

use a11y_core::model::AnalysisResult;
use a11y_core::{report, A11yError};
use axum::{extract::State, http::StatusCode, Json};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::state::AppState;

pub async fn list_user_reports(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(uid): ApiPath<String>,
) -> Result<Json<Vec<AnalysisResult>>, ApiError> {
    if uid != user.uid {
        return Err(ApiError::forbidden("You are not authorized to view these reports."));
    }

    let reports = report::list_user_reports(&state.db, &user.uid)?;
    Ok(Json(reports))
}

pub async fn get_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<AnalysisResult>, ApiError> {
    report::get_user_report(&state.db, &id, &user.uid)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Report not found or you are not authorized to view it."))
}

pub async fn delete_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    report::delete_user_report(&state.db, &id, &user.uid).map_err(|e| match e {
        A11yError::ReportNotFound(_) => ApiError::not_found("Report not found"),
        A11yError::Forbidden(_) => ApiError::forbidden("You are not authorized to delete this report."),
        e => ApiError::from(e),
    })?;

    Ok(StatusCode::NO_CONTENT)
}
