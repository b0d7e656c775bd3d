//! Image alternative text.

use super::{wcag_url, Rule};
use crate::document::{node_for, non_blank_attr, Document};
use crate::model::{Issue, Severity};

pub struct AltText;

impl Rule for AltText {
    fn id(&self) -> &'static str {
        "image-alt"
    }

    fn summary(&self) -> &'static str {
        "Images have non-empty alt text"
    }

    fn check(&self, doc: &Document) -> Vec<Issue> {
        doc.elements_named(&["img"])
            .filter(|img| non_blank_attr(*img, "alt").is_none())
            .map(|img| {
                Issue::new(
                    "custom-image-alt-missing",
                    Severity::Critical,
                    "Images must have meaningful alternate text for accessibility.",
                    "Screen readers announce an image through its alt attribute. Without it, \
                     users who cannot see the image miss the information it carries.",
                )
                .help_url(wcag_url("non-text-content"))
                .tags(&["wcag2a", "wcag111", "images"])
                .node(node_for(img, "Element does not have a non-empty alt attribute"))
                .suggestion(
                    "Add descriptive alt text to the image.",
                    "Give the `<img>` an `alt` attribute describing its content or purpose, e.g. \
                     `alt=\"Bar chart of 2024 sales by region\"`. Describe what the image conveys, \
                     not how it looks.",
                )
            })
            .collect()
    }
}
