//! Analysis report queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::{params, OptionalExtension, Row};

/// Report row from database. `summary` and `issues` hold JSON documents.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub id: String,
    pub user_id: String,
    pub url: String,
    pub page_title: Option<String>,
    pub timestamp: String,
    pub summary: String,
    pub issues: String,
}

const COLUMNS: &str = "id, user_id, url, page_title, timestamp, summary, issues";

fn map_row(row: &Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        url: row.get(2)?,
        page_title: row.get(3)?,
        timestamp: row.get(4)?,
        summary: row.get(5)?,
        issues: row.get(6)?,
    })
}

/// Insert a report, or overwrite the existing one for the same
/// `(url, user_id)`. Returns the id of the stored row, which is the
/// existing id when a row already existed.
pub fn upsert_report(pool: &DbPool, report: &ReportRow) -> DbResult<String> {
    pool.with_conn(|conn| {
        let id = conn.query_row(
            "INSERT INTO reports (id, user_id, url, page_title, timestamp, summary, issues)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(url, user_id) DO UPDATE SET
                page_title = excluded.page_title,
                timestamp = excluded.timestamp,
                summary = excluded.summary,
                issues = excluded.issues
             RETURNING id",
            params![
                report.id,
                report.user_id,
                report.url,
                report.page_title,
                report.timestamp,
                report.summary,
                report.issues,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    })
}

/// Get a report by ID.
pub fn get_report(pool: &DbPool, id: &str) -> DbResult<ReportRow> {
    pool.with_conn(|conn| {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM reports WHERE id = ?1"),
            params![id],
            map_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Report: {}", id)),
            e => DbError::Connection(e),
        })
    })
}

/// Find the stored report for a URL and user, if any.
pub fn find_report_by_url(pool: &DbPool, url: &str, user_id: &str) -> DbResult<Option<ReportRow>> {
    pool.with_conn(|conn| {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM reports WHERE url = ?1 AND user_id = ?2"),
                params![url, user_id],
                map_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// List a user's reports, newest first.
pub fn list_reports_for_user(pool: &DbPool, user_id: &str) -> DbResult<Vec<ReportRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM reports WHERE user_id = ?1 ORDER BY timestamp DESC"
        ))?;

        let rows = stmt
            .query_map(params![user_id], map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    })
}

/// Delete a report. Returns whether a row was removed.
pub fn delete_report(pool: &DbPool, id: &str) -> DbResult<bool> {
    pool.with_conn(|conn| {
        let affected = conn.execute("DELETE FROM reports WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    })
}
