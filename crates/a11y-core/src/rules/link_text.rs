//! Link text must describe the destination.

use regex::Regex;
use std::sync::LazyLock;

use super::{wcag_url, Rule};
use crate::document::{has_aria_name, node_for, text_of, Document};
use crate::model::{Issue, Severity};

const GENERIC_PHRASES: &[&str] = &[
    "click here",
    "read more",
    "learn more",
    "find out more",
    "details",
    "here",
    "more",
];

/// "here" or "more" as whole words anywhere in the link text.
static VAGUE_WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(here|more)\b").expect("Invalid vague word regex"));

pub struct LinkText;

impl Rule for LinkText {
    fn id(&self) -> &'static str {
        "link-name"
    }

    fn summary(&self) -> &'static str {
        "Link text is descriptive (no bare \"click here\" or \"read more\")"
    }

    fn check(&self, doc: &Document) -> Vec<Issue> {
        doc.elements_named(&["a"])
            .filter(|a| a.value().attr("href").is_some() && !has_aria_name(*a))
            .filter_map(|a| {
                let text = text_of(a).to_lowercase();
                is_generic(&text).then(|| non_descriptive(a, &text))
            })
            .collect()
    }
}

/// Whether normalised link text is too vague to stand on its own.
pub fn is_generic(text: &str) -> bool {
    let text = text.trim().trim_end_matches(['.', '!', '…']).trim();
    !text.is_empty() && (GENERIC_PHRASES.contains(&text) || VAGUE_WORD_PATTERN.is_match(text))
}

fn non_descriptive(a: scraper::ElementRef<'_>, text: &str) -> Issue {
    Issue::new(
        "custom-non-descriptive-link-text",
        Severity::Critical,
        "Link text is non-descriptive.",
        "Screen reader users often browse a list of links out of context. Text like \"click here\" \
         or \"read more\" gives no clue where the link goes.",
    )
    .help_url(wcag_url("link-purpose-in-context"))
    .tags(&["wcag2a", "wcag244", "links"])
    .node(node_for(a, format!("Link text \"{}\" does not describe its purpose", text)))
    .suggestion(
        "Revise link text to be descriptive of its destination or purpose.",
        "Rewrite the link so it makes sense on its own, e.g. \"Read the 2024 annual report\" \
         instead of \"read more\". If the visible text must stay short, add an `aria-label` with \
         the full purpose.",
    )
}
