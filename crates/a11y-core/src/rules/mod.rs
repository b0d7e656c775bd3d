//! Static accessibility rules.
//!
//! Each rule inspects a parsed [`Document`] and reports zero or more
//! [`Issue`]s. Rules carry a built-in remediation suggestion so reports stay
//! useful when AI suggestions are unavailable.

pub mod alt_text;
pub mod color;
pub mod contrast;
pub mod empty_interactive;
pub mod headings;
pub mod labels;
pub mod language;
pub mod link_text;
pub mod media;

use crate::document::Document;
use crate::model::{AiSuggestion, Issue, IssueNode, Severity};

/// A single static check.
pub trait Rule: Send + Sync {
    /// Stable rule identifier.
    fn id(&self) -> &'static str;

    /// One-line description for listings.
    fn summary(&self) -> &'static str;

    fn check(&self, doc: &Document) -> Vec<Issue>;
}

/// An ordered collection of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(vec![
            Box::new(alt_text::AltText),
            Box::new(headings::Headings),
            Box::new(labels::FormLabels),
            Box::new(contrast::ColorContrast),
            Box::new(empty_interactive::EmptyInteractive),
            Box::new(language::DocumentLanguage),
            Box::new(link_text::LinkText),
            Box::new(media::MediaCaptions),
        ])
    }
}

impl RuleSet {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Run every rule in order and concatenate their issues.
    pub fn check(&self, doc: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            let found = rule.check(doc);
            if !found.is_empty() {
                tracing::debug!(rule = rule.id(), count = found.len(), "Rule reported issues");
            }
            issues.extend(found);
        }
        issues
    }
}

/// `(id, summary)` for every default rule.
pub fn catalogue() -> Vec<(&'static str, &'static str)> {
    RuleSet::default()
        .rules()
        .iter()
        .map(|rule| (rule.id(), rule.summary()))
        .collect()
}

const WCAG_UNDERSTANDING: &str = "https://www.w3.org/WAI/WCAG21/Understanding";

/// Link to the WCAG 2.1 "Understanding" page for a success criterion slug.
pub(crate) fn wcag_url(slug: &str) -> String {
    format!("{}/{}.html", WCAG_UNDERSTANDING, slug)
}

impl Issue {
    pub(crate) fn new(
        id: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            help: help.into(),
            help_url: None,
            severity,
            tags: Vec::new(),
            nodes: Vec::new(),
            ai_suggestions: None,
        }
    }

    pub(crate) fn help_url(mut self, url: String) -> Self {
        self.help_url = Some(url);
        self
    }

    pub(crate) fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub(crate) fn node(mut self, node: IssueNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub(crate) fn suggestion(mut self, short_fix: impl Into<String>, detailed_fix: impl Into<String>) -> Self {
        self.ai_suggestions = Some(AiSuggestion::new(short_fix, detailed_fix));
        self
    }
}

#[cfg(test)]
pub(crate) fn ids(issues: &[Issue]) -> Vec<&str> {
    issues.iter().map(|i| i.id.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESSIBLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Accessible</title></head>
<body>
  <h1>Welcome</h1>
  <h2>News</h2>
  <img src="logo.png" alt="Company logo">
  <label for="email">Email</label><input id="email" type="email">
  <p style="color: #000; background-color: #fff">Readable</p>
  <a href="/pricing">View pricing plans</a>
  <button>Send</button>
  <video src="intro.mp4">
    <track kind="captions" src="en.vtt">
    <track kind="descriptions" src="desc.vtt">
  </video>
</body>
</html>"#;

    #[test]
    fn test_accessible_page_has_no_issues() {
        let doc = Document::parse(ACCESSIBLE_PAGE);
        let issues = RuleSet::default().check(&doc);
        assert!(issues.is_empty(), "unexpected issues: {:?}", ids(&issues));
    }

    #[test]
    fn test_rule_order_is_stable() {
        let doc = Document::parse(
            r#"<html><body><img src="a.png"><h2>Sub</h2><a href="/x">click here</a></body></html>"#,
        );
        let issues = RuleSet::default().check(&doc);
        assert_eq!(
            ids(&issues),
            vec![
                "custom-image-alt-missing",
                "custom-missing-h1",
                "custom-missing-lang-attribute",
                "custom-non-descriptive-link-text",
            ]
        );
    }

    #[test]
    fn test_catalogue_lists_all_rules() {
        let catalogue = catalogue();
        assert_eq!(catalogue.len(), 8);
        assert_eq!(catalogue[0].0, "image-alt");
        assert_eq!(catalogue[7].0, "media-captions");
    }

    #[test]
    fn test_every_issue_has_builtin_suggestion() {
        let doc = Document::parse("<p>fragment <img src=x><a href=/y>more</a><video></video></p>");
        let issues = RuleSet::default().check(&doc);
        assert!(!issues.is_empty());
        assert!(issues.iter().all(|i| i.ai_suggestions.is_some()));
    }
}
