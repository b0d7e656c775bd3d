//! Terminal output formatting.

use a11y_core::model::{AnalysisResult, Issue, Severity};
use colored::{ColoredString, Colorize};

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => "critical".red().bold(),
        Severity::Serious => "serious".red(),
        Severity::Moderate => "moderate".yellow(),
        Severity::Minor => "minor".dimmed(),
    }
}

fn score_label(score: u8) -> ColoredString {
    let text = format!("{}/100", score);
    match score {
        90..=100 => text.green().bold(),
        50..=89 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

/// Print a report: summary first, then every issue.
pub fn print_report(report: &AnalysisResult) {
    let title = report.page_title.as_deref().unwrap_or("N/A");
    println!("{} {}", title.cyan().bold(), format!("({})", report.url).dimmed());
    println!(
        "{}: {}  {}",
        "Report".bold(),
        report.id.dimmed(),
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
    );
    println!();

    let summary = &report.summary;
    println!("{}: {}", "Score".bold(), score_label(summary.score));
    println!(
        "{}: {} total, {} critical, {} moderate, {} minor",
        "Issues".bold(),
        summary.total_issues,
        summary.critical_issues.to_string().red(),
        summary.moderate_issues.to_string().yellow(),
        summary.minor_issues
    );

    if report.issues.is_empty() {
        println!();
        println!("{}", "No accessibility issues found.".green());
        return;
    }

    for (i, issue) in report.issues.iter().enumerate() {
        println!();
        print_issue(i + 1, issue);
    }
}

fn print_issue(n: usize, issue: &Issue) {
    println!("{}. [{}] {}", n, severity_label(issue.severity), issue.id.bold());
    println!("   {}", issue.description);
    if let Some(url) = &issue.help_url {
        println!("   {}", url.blue().underline());
    }
    if let Some(node) = issue.nodes.first() {
        if let Some(html) = node.snippet.as_deref().or(node.html.as_deref()) {
            println!("   {} {}", "at".dimmed(), truncate(html, 100).dimmed());
        }
    }
    if issue.nodes.len() > 1 {
        println!("   {}", format!("(+{} more elements)", issue.nodes.len() - 1).dimmed());
    }
    if let Some(ai) = &issue.ai_suggestions {
        println!("   {} {}", "Fix:".green().bold(), ai.short_fix);
    }
}

/// Print reports as a table.
pub fn print_reports_table(reports: &[AnalysisResult]) {
    if reports.is_empty() {
        println!("{}", "No reports found.".dimmed());
        return;
    }

    println!("{:<36}  {:<19}  {:>5}  {:>6}  URL", "ID", "Analyzed", "Score", "Issues");
    println!("{}", "─".repeat(100));

    for report in reports {
        println!(
            "{:<36}  {:<19}  {:>5}  {:>6}  {}",
            report.id,
            report.timestamp.format("%Y-%m-%d %H:%M:%S"),
            report.summary.score,
            report.summary.total_issues,
            truncate(&report.url, 40)
        );
    }
}

/// Print the rule catalogue.
pub fn print_rules(rules: &[(&str, &str)]) {
    println!("{}", "Accessibility rules".bold());
    println!();
    for (id, summary) in rules {
        println!("  {:<18} {}", id.cyan(), summary);
    }
}

/// Truncate to `max` characters, ending with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("  padded  ", 10), "padded");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }
}
