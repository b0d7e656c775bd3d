//! Report data model.
//!
//! Field names follow the JSON contract consumed by the dashboard, which
//! mixes snake_case and camelCase keys.

use a11y_db::queries::reports::ReportRow;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::A11yResult;

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl Severity {
    /// Lenient parse: `low` and anything unrecognised count as minor.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "serious" => Self::Serious,
            "moderate" => Self::Moderate,
            _ => Self::Minor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Serious => "serious",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remediation advice for an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSuggestion {
    pub short_fix: String,
    pub detailed_fix: String,
}

impl AiSuggestion {
    pub fn new(short_fix: impl Into<String>, detailed_fix: impl Into<String>) -> Self {
        Self {
            short_fix: short_fix.into(),
            detailed_fix: detailed_fix.into(),
        }
    }
}

/// One offending element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueNode {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub target: Vec<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(rename = "failureSummary", default)]
    pub failure_summary: Option<String>,
    #[serde(default)]
    pub xpath: Option<String>,
}

/// A single accessibility finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub description: String,
    pub help: String,
    #[serde(rename = "helpUrl", default)]
    pub help_url: Option<String>,
    pub severity: Severity,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<IssueNode>,
    #[serde(default)]
    pub ai_suggestions: Option<AiSuggestion>,
}

impl Issue {
    /// HTML of the first node, used as context for suggestions.
    pub fn primary_html(&self) -> &str {
        self.nodes
            .first()
            .and_then(|n| n.html.as_deref())
            .unwrap_or("")
    }
}

/// Issue counts and score for a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_issues: usize,
    #[serde(rename = "criticalIssues")]
    pub critical_issues: usize,
    #[serde(rename = "moderateIssues")]
    pub moderate_issues: usize,
    #[serde(rename = "minorIssues")]
    pub minor_issues: usize,
    pub score: u8,
}

/// A stored analysis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub user_id: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub summary: AnalysisSummary,
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub page_title: Option<String>,
}

impl AnalysisResult {
    /// Decode a database row.
    pub fn from_row(row: ReportRow) -> A11yResult<Self> {
        let timestamp = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|e| crate::A11yError::validation(format!("bad timestamp '{}': {}", row.timestamp, e)))?
            .with_timezone(&Utc);

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            url: row.url,
            timestamp,
            summary: serde_json::from_str(&row.summary)?,
            issues: serde_json::from_str(&row.issues)?,
            page_title: row.page_title,
        })
    }

    /// Encode as a database row.
    pub fn to_row(&self) -> A11yResult<ReportRow> {
        Ok(ReportRow {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            url: self.url.clone(),
            page_title: self.page_title.clone(),
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            summary: serde_json::to_string(&self.summary)?,
            issues: serde_json::to_string(&self.issues)?,
        })
    }
}
