//! Report assembly and per-user report storage.

use a11y_db::queries::reports as queries;
use a11y_db::{DbError, DbPool};
use chrono::Utc;
use std::time::Duration;
use uuid::Uuid;

use crate::analyzer::PageAnalysis;
use crate::error::{A11yError, A11yResult};
use crate::model::AnalysisResult;
use crate::score::summarize;

/// Assemble a report for `user_id` from a finished analysis.
pub fn build_report(url: &str, user_id: &str, analysis: &PageAnalysis) -> AnalysisResult {
    AnalysisResult {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        url: url.to_string(),
        timestamp: Utc::now(),
        summary: summarize(&analysis.issues),
        issues: analysis.issues.clone(),
        page_title: Some(analysis.title.clone()),
    }
}

/// Store a report, replacing the user's previous report for the same URL.
/// The returned report carries the id of the stored row.
pub fn save_report(pool: &DbPool, mut report: AnalysisResult) -> A11yResult<AnalysisResult> {
    let stored_id = queries::upsert_report(pool, &report.to_row()?)?;
    if stored_id != report.id {
        tracing::debug!(id = %stored_id, url = %report.url, "Overwrote existing report");
    }
    report.id = stored_id;
    tracing::info!(id = %report.id, user_id = %report.user_id, "Report saved");
    Ok(report)
}

/// The user's stored report for a URL, if any.
pub fn find_cached_report(pool: &DbPool, url: &str, user_id: &str) -> A11yResult<Option<AnalysisResult>> {
    queries::find_report_by_url(pool, url, user_id)?
        .map(AnalysisResult::from_row)
        .transpose()
}

/// Whether a stored report is younger than `ttl`. A zero TTL disables caching.
pub fn is_fresh(report: &AnalysisResult, ttl: Duration) -> bool {
    if ttl.is_zero() {
        return false;
    }
    let age = Utc::now().signed_duration_since(report.timestamp);
    age.to_std().map(|age| age < ttl).unwrap_or(true)
}

/// All of a user's reports, newest first. Rows that no longer decode are
/// logged and skipped.
pub fn list_user_reports(pool: &DbPool, user_id: &str) -> A11yResult<Vec<AnalysisResult>> {
    let rows = queries::list_reports_for_user(pool, user_id)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match AnalysisResult::from_row(row) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::error!(id = %id, error = %e, "Skipping malformed report");
                    None
                }
            }
        })
        .collect())
}

/// Validate a report identifier.
pub fn parse_report_id(report_id: &str) -> A11yResult<Uuid> {
    Uuid::parse_str(report_id.trim()).map_err(|_| A11yError::InvalidReportId(report_id.to_string()))
}

/// A report owned by `user_id`. Reports of other users are reported as absent.
pub fn get_user_report(pool: &DbPool, report_id: &str, user_id: &str) -> A11yResult<Option<AnalysisResult>> {
    let id = parse_report_id(report_id)?;

    let row = match queries::get_report(pool, &id.to_string()) {
        Ok(row) => row,
        Err(DbError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if row.user_id != user_id {
        tracing::warn!(id = %id, user_id, "Report requested by non-owner");
        return Ok(None);
    }
    AnalysisResult::from_row(row).map(Some)
}

/// Delete a report owned by `user_id`.
pub fn delete_user_report(pool: &DbPool, report_id: &str, user_id: &str) -> A11yResult<()> {
    let id = parse_report_id(report_id)?.to_string();

    let row = queries::get_report(pool, &id).map_err(|e| match e {
        DbError::NotFound(_) => A11yError::ReportNotFound(id.clone()),
        e => e.into(),
    })?;

    if row.user_id != user_id {
        return Err(A11yError::Forbidden(format!(
            "user {} does not own report {}",
            user_id, id
        )));
    }

    if !queries::delete_report(pool, &id)? {
        return Err(A11yError::ReportNotFound(id));
    }
    tracing::info!(id = %id, user_id, "Report deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Issue, Severity};

    fn analysis(issue_count: usize) -> PageAnalysis {
        PageAnalysis {
            issues: (0..issue_count)
                .map(|_| Issue::new("custom-image-alt-missing", Severity::Critical, "d", "h"))
                .collect(),
            html: "<html></html>".to_string(),
            title: "Home".to_string(),
        }
    }

    fn pool() -> DbPool {
        a11y_db::init_memory_pool().unwrap()
    }

    #[test]
    fn test_build_report() {
        let report = build_report("https://a.test/", "alice", &analysis(2));
        assert!(Uuid::parse_str(&report.id).is_ok());
        assert_eq!(report.summary.total_issues, 2);
        assert_eq!(report.summary.score, 90);
        assert_eq!(report.page_title.as_deref(), Some("Home"));
    }

    #[test]
    fn test_reanalysis_overwrites_and_keeps_id() {
        let pool = pool();
        let first = save_report(&pool, build_report("https://a.test/", "alice", &analysis(1))).unwrap();
        let second = save_report(&pool, build_report("https://a.test/", "alice", &analysis(3))).unwrap();

        assert_eq!(first.id, second.id);
        let reports = list_user_reports(&pool, "alice").unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].summary.total_issues, 3);

        let cached = find_cached_report(&pool, "https://a.test/", "alice").unwrap().unwrap();
        assert_eq!(cached.id, first.id);
        assert!(find_cached_report(&pool, "https://a.test/", "bob").unwrap().is_none());
    }

    #[test]
    fn test_freshness() {
        let mut report = build_report("https://a.test/", "alice", &analysis(0));
        assert!(is_fresh(&report, Duration::from_secs(60)));
        assert!(!is_fresh(&report, Duration::ZERO));

        report.timestamp = Utc::now() - chrono::Duration::hours(2);
        assert!(!is_fresh(&report, Duration::from_secs(3600)));
    }

    #[test]
    fn test_get_user_report_ownership() {
        let pool = pool();
        let saved = save_report(&pool, build_report("https://a.test/", "alice", &analysis(1))).unwrap();

        assert_eq!(get_user_report(&pool, &saved.id, "alice").unwrap().unwrap().id, saved.id);
        assert!(get_user_report(&pool, &saved.id, "bob").unwrap().is_none());
        assert!(get_user_report(&pool, &Uuid::new_v4().to_string(), "alice").unwrap().is_none());
        assert!(matches!(
            get_user_report(&pool, "not-an-id", "alice"),
            Err(A11yError::InvalidReportId(_))
        ));
    }

    #[test]
    fn test_delete_user_report() {
        let pool = pool();
        let saved = save_report(&pool, build_report("https://a.test/", "alice", &analysis(1))).unwrap();

        assert!(matches!(
            delete_user_report(&pool, &saved.id, "bob"),
            Err(A11yError::Forbidden(_))
        ));
        delete_user_report(&pool, &saved.id, "alice").unwrap();
        assert!(matches!(
            delete_user_report(&pool, &saved.id, "alice"),
            Err(A11yError::ReportNotFound(_))
        ));
        assert!(matches!(
            delete_user_report(&pool, "bad", "alice"),
            Err(A11yError::InvalidReportId(_))
        ));
    }

    #[test]
    fn test_list_skips_malformed_rows() {
        let pool = pool();
        save_report(&pool, build_report("https://a.test/ok", "alice", &analysis(1))).unwrap();
        pool.with_conn(|conn| {
            conn.execute(
                "INSERT INTO reports (id, user_id, url, timestamp, summary, issues)
                 VALUES ('broken', 'alice', 'https://a.test/bad', '2099-01-01T00:00:00.000Z', 'not json', '[]')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let reports = list_user_reports(&pool, "alice").unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].url, "https://a.test/ok");
    }
}
