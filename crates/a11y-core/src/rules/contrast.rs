//! Text/background colour contrast from inline styles.

use super::color::{contrast_ratio, Rgb};
use super::{wcag_url, Rule};
use crate::document::{node_for, text_of, Document};
use crate::model::{Issue, Severity};

/// Minimum ratio for normal-size text (WCAG 1.4.3, level AA).
pub const REQUIRED_RATIO: f64 = 4.5;

const TEXT_TAGS: &[&str] = &[
    "p", "span", "div", "h1", "h2", "h3", "h4", "h5", "h6", "a", "li", "td", "th", "label",
];

pub struct ColorContrast;

impl Rule for ColorContrast {
    fn id(&self) -> &'static str {
        "color-contrast"
    }

    fn summary(&self) -> &'static str {
        "Inline text and background colours reach a 4.5:1 contrast ratio"
    }

    fn check(&self, doc: &Document) -> Vec<Issue> {
        doc.elements_named(TEXT_TAGS)
            .filter(|el| !text_of(*el).is_empty())
            .filter_map(|el| {
                let style = el.value().attr("style")?;
                let (fg, bg) = inline_colors(style);
                let ratio = contrast_ratio(fg?, bg?);
                (ratio < REQUIRED_RATIO).then(|| low_contrast(el, ratio))
            })
            .collect()
    }
}

fn low_contrast(el: scraper::ElementRef<'_>, ratio: f64) -> Issue {
    Issue::new(
        "custom-color-contrast-low",
        Severity::Critical,
        format!(
            "Low color contrast: The contrast ratio is {:.2}:1, but requires {}:1.",
            ratio, REQUIRED_RATIO
        ),
        format!(
            "Text needs a contrast ratio of at least {}:1 against its background to stay readable \
             for people with low vision or colour deficiencies, and in poor lighting.",
            REQUIRED_RATIO
        ),
    )
    .help_url(wcag_url("contrast-minimum"))
    .tags(&["wcag2aa", "wcag143", "color"])
    .node(node_for(
        el,
        format!("Element has insufficient color contrast of {:.2}:1", ratio),
    ))
    .suggestion(
        "Increase the contrast between text and background colors.",
        format!(
            "Darken the text or lighten the background (or the reverse) in the element's `color` and \
             `background-color` until the ratio reaches {}:1. Check hover, focus and active states too, \
             and verify the pair with a contrast checker.",
            REQUIRED_RATIO
        ),
    )
}

/// Foreground and background colours declared in a `style` attribute.
/// Later declarations win, as in CSS.
pub fn inline_colors(style: &str) -> (Option<Rgb>, Option<Rgb>) {
    let mut fg = None;
    let mut bg = None;

    for decl in style.split(';') {
        let Some((prop, value)) = decl.split_once(':') else { continue };
        match prop.trim().to_ascii_lowercase().as_str() {
            "color" => fg = Rgb::parse(value),
            "background-color" => bg = Rgb::parse(value),
            "background" => bg = shorthand_color(value),
            _ => {}
        }
    }
    (fg, bg)
}

/// First colour token in a `background` shorthand.
fn shorthand_color(value: &str) -> Option<Rgb> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in value.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens.iter().find_map(|t| Rgb::parse(t))
}
