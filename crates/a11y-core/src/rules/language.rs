//! Document language declaration.

use regex::Regex;
use std::sync::LazyLock;

use super::{wcag_url, Rule};
use crate::document::{non_blank_attr, start_tag, truncate, Document};
use crate::model::{Issue, IssueNode, Severity};

/// Primary language subtag plus optional subtags, e.g. `en`, `pt-BR`, `zh-Hant-TW`.
static LANG_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{1,8})*$").expect("Invalid language tag regex")
});

pub struct DocumentLanguage;

impl Rule for DocumentLanguage {
    fn id(&self) -> &'static str {
        "html-lang"
    }

    fn summary(&self) -> &'static str {
        "The <html> element declares a valid lang attribute"
    }

    fn check(&self, doc: &Document) -> Vec<Issue> {
        if !doc.has_html_tag() {
            return vec![missing_html_tag(doc)];
        }

        let html = doc.root();
        match non_blank_attr(html, "lang") {
            None => vec![missing_lang(html)],
            Some(lang) if !LANG_TAG_PATTERN.is_match(lang) => vec![invalid_lang(html, lang)],
            Some(_) => Vec::new(),
        }
    }
}

fn missing_html_tag(doc: &Document) -> Issue {
    Issue::new(
        "custom-missing-html-tag",
        Severity::Critical,
        "No <html> tag found in the document.",
        "The <html> element is the root of every page and carries the document language. \
         Without it, browsers and assistive technology have to guess.",
    )
    .help_url(wcag_url("language-of-page"))
    .tags(&["wcag2a", "wcag311"])
    .node(IssueNode {
        html: Some(truncate(doc.source(), 100)),
        target: vec!["document".to_string()],
        failure_summary: Some("Document has no <html> root element".to_string()),
        ..Default::default()
    })
    .suggestion(
        "Add an <html> tag as the root element of the HTML document.",
        "Start the page with `<!DOCTYPE html>` followed by `<html lang=\"en\">` (using the page's \
         language) and close it with `</html>` after the body.",
    )
}

fn missing_lang(html: scraper::ElementRef<'_>) -> Issue {
    Issue::new(
        "custom-missing-lang-attribute",
        Severity::Critical,
        "The <html> element is missing a 'lang' attribute or its value is empty.",
        "Screen readers pick pronunciation rules from the page language. Without a lang \
         attribute, content may be read with the wrong voice and accent.",
    )
    .help_url(wcag_url("language-of-page"))
    .tags(&["wcag2a", "wcag311"])
    .node(html_node(html, "The <html> element does not have a lang attribute"))
    .suggestion(
        "Add `lang=\"en\"` (or appropriate language code) to the <html> tag.",
        "Set the `lang` attribute on the root element to the BCP 47 code of the page's primary \
         language, e.g. `<html lang=\"en\">` or `<html lang=\"pt-BR\">`. Mark passages in other \
         languages with their own `lang` attribute.",
    )
}

fn invalid_lang(html: scraper::ElementRef<'_>, lang: &str) -> Issue {
    Issue::new(
        "custom-invalid-lang-attribute",
        Severity::Moderate,
        format!("The <html> element has an invalid 'lang' value: '{}'.", lang),
        "The lang attribute must hold a valid BCP 47 language tag for assistive technology \
         to recognise the language.",
    )
    .help_url(wcag_url("language-of-page"))
    .tags(&["wcag2a", "wcag311"])
    .node(html_node(html, "The lang attribute is not a valid language tag"))
    .suggestion(
        "Use a valid language code such as `en` or `en-US`.",
        format!(
            "Replace `lang=\"{}\"` with a BCP 47 tag: a two or three letter language code, \
             optionally followed by region or script subtags (`en`, `en-GB`, `zh-Hant`).",
            lang
        ),
    )
}

/// Node for the root element holding only its start tag, not the whole page.
fn html_node(html: scraper::ElementRef<'_>, summary: &str) -> IssueNode {
    let start = start_tag(html);
    IssueNode {
        html: Some(start.clone()),
        target: vec!["html".to_string()],
        snippet: Some(start),
        failure_summary: Some(summary.to_string()),
        xpath: Some("/html".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ids;

    fn check(html: &str) -> Vec<Issue> {
        DocumentLanguage.check(&Document::parse(html))
    }

    #[test]
    fn test_valid_lang() {
        assert!(check(r#"<html lang="en"><body></body></html>"#).is_empty());
        assert!(check(r#"<html lang="pt-BR"></html>"#).is_empty());
    }

    #[test]
    fn test_missing_or_blank_lang() {
        let issues = check("<html><body>hi</body></html>");
        assert_eq!(ids(&issues), vec!["custom-missing-lang-attribute"]);
        assert_eq!(issues[0].nodes[0].html.as_deref(), Some("<html>"));
        assert_eq!(ids(&check(r#"<html lang="  "></html>"#)), vec!["custom-missing-lang-attribute"]);
    }

    #[test]
    fn test_invalid_lang() {
        let issues = check(r#"<html lang="english language"></html>"#);
        assert_eq!(ids(&issues), vec!["custom-invalid-lang-attribute"]);
        assert_eq!(issues[0].severity, Severity::Moderate);
    }

    #[test]
    fn test_missing_html_tag_stops_early() {
        let source = "<p>".to_string() + &"x".repeat(200) + "</p>";
        let issues = check(&source);
        assert_eq!(ids(&issues), vec!["custom-missing-html-tag"]);
        let node = &issues[0].nodes[0];
        assert_eq!(node.target, vec!["document"]);
        assert_eq!(node.html.as_deref().map(|h| h.chars().count()), Some(103));
    }
}
