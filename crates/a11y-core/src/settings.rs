//! Per-user dashboard settings.

use a11y_db::queries::settings as queries;
use a11y_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::A11yResult;

/// Dashboard colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    #[serde(rename = "System Default")]
    SystemDefault,
}

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(rename = "emailNotifications", default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub theme: Theme,
}

/// Load settings for a user, falling back to defaults when none are stored
/// or the stored document no longer decodes.
pub fn get_settings(pool: &DbPool, user_id: &str) -> A11yResult<UserSettings> {
    let Some(raw) = queries::get_settings(pool, user_id)? else {
        return Ok(UserSettings::default());
    };

    match serde_json::from_str(&raw) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Stored settings are unreadable, using defaults");
            Ok(UserSettings::default())
        }
    }
}

/// Replace a user's settings.
pub fn update_settings(pool: &DbPool, user_id: &str, settings: &UserSettings) -> A11yResult<UserSettings> {
    let raw = serde_json::to_string(settings)?;
    queries::upsert_settings(pool, user_id, &raw)?;
    tracing::info!(user_id, "Settings updated");
    Ok(settings.clone())
}
