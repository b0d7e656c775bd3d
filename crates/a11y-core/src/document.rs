//! Parsed HTML document and element helpers shared by the rules.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

use crate::model::IssueNode;

/// Longest outer HTML kept on an issue node before truncation.
const MAX_NODE_HTML: usize = 500;

/// An `<html` start tag anywhere in the raw source.
static HTML_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html(\s|>|/|$)").expect("Invalid html tag regex"));

/// A page parsed once and shared by every rule.
pub struct Document {
    html: Html,
    source: String,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            source: source.to_string(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the raw markup declares an `<html>` element. The parser
    /// synthesises one either way, so this looks at the source.
    pub fn has_html_tag(&self) -> bool {
        HTML_TAG_PATTERN.is_match(&self.source)
    }

    /// The root `<html>` element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Elements whose tag name is one of `names`, in document order.
    pub fn elements_named<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.elements().filter(move |el| names.contains(&el.value().name()))
    }

    /// First element with the given tag name.
    pub fn first(&self, name: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|el| el.value().name() == name)
    }

    /// Element carrying `id="..."`.
    pub fn by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|el| el.value().id() == Some(id))
    }

    /// Trimmed `<title>` text, if any.
    pub fn title(&self) -> Option<String> {
        self.first("title")
            .map(text_of)
            .filter(|t| !t.is_empty())
    }
}

/// Visible text of an element with whitespace collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(|chunk| chunk.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attribute value if present and not blank.
pub fn non_blank_attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).map(str::trim).filter(|v| !v.is_empty())
}

/// Whether an element has an accessible name from ARIA attributes.
pub fn has_aria_name(el: ElementRef<'_>) -> bool {
    non_blank_attr(el, "aria-label").is_some() || non_blank_attr(el, "aria-labelledby").is_some()
}

/// Reconstructed start tag, e.g. `<img src="a.png">`.
pub fn start_tag(el: ElementRef<'_>) -> String {
    let mut tag = format!("<{}", el.value().name());
    for (name, value) in el.value().attrs() {
        tag.push_str(&format!(" {}=\"{}\"", name, value.replace('"', "&quot;")));
    }
    tag.push('>');
    tag
}

/// Truncate on a char boundary, appending an ellipsis when shortened.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Absolute XPath of an element. Positions are only written when an
/// element has same-named siblings, e.g. `/html/body/div[2]/img`.
pub fn xpath(el: ElementRef<'_>) -> String {
    let mut chain: Vec<ElementRef<'_>> = el.ancestors().filter_map(ElementRef::wrap).collect();
    chain.reverse();
    chain.push(el);

    let mut path = String::new();
    for node in chain {
        let name = node.value().name();
        path.push('/');
        path.push_str(name);

        let Some(parent) = node.parent() else { continue };
        let same_name: Vec<ElementRef<'_>> = parent
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|sib| sib.value().name() == name)
            .collect();

        if same_name.len() > 1 {
            if let Some(pos) = same_name.iter().position(|sib| sib.id() == node.id()) {
                path.push_str(&format!("[{}]", pos + 1));
            }
        }
    }
    path
}

/// Issue node describing `el`.
pub fn node_for(el: ElementRef<'_>, failure_summary: impl Into<String>) -> IssueNode {
    IssueNode {
        html: Some(truncate(&el.html(), MAX_NODE_HTML)),
        target: vec![el.value().name().to_string()],
        snippet: Some(start_tag(el)),
        failure_summary: Some(failure_summary.into()),
        xpath: Some(xpath(el)),
    }
}
