//! Links and buttons must have an accessible name.

use scraper::ElementRef;

use super::{wcag_url, Rule};
use crate::document::{has_aria_name, node_for, non_blank_attr, text_of, Document};
use crate::model::{Issue, Severity};

pub struct EmptyInteractive;

impl Rule for EmptyInteractive {
    fn id(&self) -> &'static str {
        "empty-interactive"
    }

    fn summary(&self) -> &'static str {
        "Links and buttons have text, an aria-label, or an image with alt text"
    }

    fn check(&self, doc: &Document) -> Vec<Issue> {
        doc.elements_named(&["a", "button"])
            .filter(|el| !has_accessible_name(*el))
            .map(empty_element)
            .collect()
    }
}

fn has_accessible_name(el: ElementRef<'_>) -> bool {
    if !text_of(el).is_empty() || has_aria_name(el) {
        return true;
    }
    el.descendants()
        .filter_map(ElementRef::wrap)
        .any(|child| child.value().name() == "img" && non_blank_attr(child, "alt").is_some())
}

fn empty_element(el: ElementRef<'_>) -> Issue {
    let kind = el.value().name();
    let (short_fix, detailed_fix) = if kind == "a" {
        (
            "Give the link text that describes its destination.",
            "Put visible text inside the `<a>`, or for icon-only links add `aria-label=\"Open settings\"` \
             (or an `<img>` with meaningful alt text) so screen readers can announce it.",
        )
    } else {
        (
            "Give the button text that describes its action.",
            "Put visible text inside the `<button>`, or for icon-only buttons add \
             `aria-label=\"Close dialog\"` so screen readers can announce it.",
        )
    };

    Issue::new(
        format!("custom-empty-{}", kind),
        Severity::Critical,
        format!("Empty {} element detected.", kind),
        "Interactive elements need an accessible name. Without one, screen readers announce \
         only \"link\" or \"button\" and users cannot tell what it does.",
    )
    .help_url(wcag_url("name-role-value"))
    .tags(&["wcag2a", "wcag244", "wcag412"])
    .node(node_for(el, "Element has no discernible text"))
    .suggestion(short_fix, detailed_fix)
}
