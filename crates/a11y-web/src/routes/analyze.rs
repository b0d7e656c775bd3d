//! Page analysis endpoint.

use a11y_core::fetch::validate_url;
use a11y_core::model::AnalysisResult;
use a11y_core::report;
use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    /// Skip the stored report and analyse again.
    #[serde(default)]
    pub refresh: bool,
}

fn analysis_failed(e: impl std::fmt::Display) -> ApiError {
    ApiError::internal(format!("Analysis failed: {}", e))
}

pub async fn analyze(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let url = validate_url(&req.url)?;
    let key = url.to_string();

    if !req.refresh {
        if let Some(cached) = report::find_cached_report(&state.db, &key, &user.uid)? {
            if report::is_fresh(&cached, state.cache_ttl) {
                tracing::info!(url = %key, user_id = %user.uid, "Serving cached report");
                return Ok(Json(cached));
            }
        }
    }

    let analysis = state.analyzer.analyze_url(&url).await.map_err(analysis_failed)?;
    let saved = report::save_report(&state.db, report::build_report(&key, &user.uid, &analysis))
        .map_err(analysis_failed)?;

    Ok(Json(saved))
}
