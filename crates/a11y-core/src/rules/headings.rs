//! Heading structure: a top-level heading exists and levels are not skipped.

use std::collections::BTreeSet;

use super::{wcag_url, Rule};
use crate::document::{node_for, Document};
use crate::model::{Issue, IssueNode, Severity};

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

pub struct Headings;

impl Rule for Headings {
    fn id(&self) -> &'static str {
        "heading-order"
    }

    fn summary(&self) -> &'static str {
        "Page has an h1 and heading levels do not skip"
    }

    fn check(&self, doc: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        if doc.first("h1").is_none() {
            issues.push(missing_h1());
        }

        let levels: BTreeSet<u8> = doc
            .elements_named(HEADING_TAGS)
            .filter_map(|h| level_of(h.value().name()))
            .collect();
        let levels: Vec<u8> = levels.into_iter().collect();

        // Only the first gap is reported.
        if let Some(pair) = levels.windows(2).find(|w| w[1] - w[0] > 1) {
            let (current, next) = (pair[0], pair[1]);
            issues.push(skipped_level(doc, current, next));
        }

        issues
    }
}

fn level_of(name: &str) -> Option<u8> {
    name.strip_prefix('h')?.parse().ok()
}

fn missing_h1() -> Issue {
    Issue::new(
        "custom-missing-h1",
        Severity::Critical,
        "Page should have at least one H1 heading.",
        "The H1 heading states the main topic of the page. Screen reader users rely on it \
         to orient themselves and to jump straight to the main content.",
    )
    .help_url(wcag_url("info-and-relationships"))
    .tags(&["wcag2a", "wcag131", "best-practice", "headings"])
    .node(IssueNode {
        html: Some("<html>...</html>".to_string()),
        target: vec!["html".to_string()],
        snippet: None,
        failure_summary: Some("Page must contain a level-one heading".to_string()),
        xpath: Some("/html".to_string()),
    })
    .suggestion(
        "Add an H1 heading.",
        "Mark the page's main title with `<h1>`. Single-page applications should update it when \
         the view changes. If the design has no visible title, add a visually hidden one, e.g. \
         `<h1 class=\"sr-only\">Page title</h1>`.",
    )
}

fn skipped_level(doc: &Document, current: u8, next: u8) -> Issue {
    let skipped = current + 1;
    let mut issue = Issue::new(
        format!("custom-skipped-heading-level-h{}", skipped),
        Severity::Moderate,
        format!(
            "Skipped heading level: H{} is missing between H{} and H{}.",
            skipped, current, next
        ),
        "Heading levels should form an outline without gaps (H1, then H2, then H3). Skipping a \
         level confuses users who navigate by headings.",
    )
    .help_url(wcag_url("info-and-relationships"))
    .tags(&["wcag2a", "wcag131", "best-practice", "headings"])
    .suggestion(
        format!("Ensure consecutive heading levels (e.g., H{} then H{}).", current, skipped),
        format!(
            "Either insert an `<h{skipped}>` between the `<h{current}>` and the `<h{next}>` sections, \
             or change the `<h{next}>` to `<h{skipped}>` so no level is skipped. Choose heading levels \
             by structure, not by font size; restyle with CSS instead.",
        ),
    );

    for level in [current, next] {
        if let Some(heading) = doc.first(&format!("h{}", level)) {
            issue = issue.node(node_for(heading, format!("First H{} on the page", level)));
        }
    }
    issue
}
