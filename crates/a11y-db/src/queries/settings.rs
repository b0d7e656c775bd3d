//! User settings queries.

use crate::pool::{DbPool, DbResult};
use rusqlite::{params, OptionalExtension};

/// Load the raw settings document for a user.
pub fn get_settings(pool: &DbPool, user_id: &str) -> DbResult<Option<String>> {
    pool.with_conn(|conn| {
        let settings = conn
            .query_row(
                "SELECT settings FROM user_settings WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(settings)
    })
}

/// Store the settings document for a user, replacing any previous one.
pub fn upsert_settings(pool: &DbPool, user_id: &str, settings: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO user_settings (user_id, settings) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                settings = excluded.settings,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![user_id, settings],
        )?;
        Ok(())
    })
}
