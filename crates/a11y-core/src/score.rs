//! Summary counts and the 0-100 accessibility score.

use crate::model::{AnalysisSummary, Issue, Severity};

/// Points deducted per issue of a given severity.
pub fn deduction(severity: Severity) -> u32 {
    match severity {
        Severity::Critical => 5,
        Severity::Serious | Severity::Moderate => 2,
        Severity::Minor => 1,
    }
}

/// Count issues by bucket and compute the score. Serious issues are
/// counted with the moderate ones.
pub fn summarize(issues: &[Issue]) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        total_issues: issues.len(),
        ..Default::default()
    };
    let mut deducted: u32 = 0;

    for issue in issues {
        match issue.severity {
            Severity::Critical => summary.critical_issues += 1,
            Severity::Serious | Severity::Moderate => summary.moderate_issues += 1,
            Severity::Minor => summary.minor_issues += 1,
        }
        deducted = deducted.saturating_add(deduction(issue.severity));
    }

    summary.score = 100u32.saturating_sub(deducted) as u8;

    tracing::info!(
        total = summary.total_issues,
        critical = summary.critical_issues,
        moderate = summary.moderate_issues,
        minor = summary.minor_issues,
        score = summary.score,
        "Computed accessibility score"
    );
    summary
}
