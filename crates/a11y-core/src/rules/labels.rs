//! Form controls need an accessible label.

use std::collections::HashSet;

use scraper::ElementRef;

use super::{wcag_url, Rule};
use crate::document::{has_aria_name, node_for, non_blank_attr, Document};
use crate::model::{Issue, Severity};

const FORM_TAGS: &[&str] = &["input", "textarea", "select"];

/// Input types that are labelled by their value or never shown.
const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

pub struct FormLabels;

impl Rule for FormLabels {
    fn id(&self) -> &'static str {
        "label"
    }

    fn summary(&self) -> &'static str {
        "Form fields have a <label>, a wrapping label, or aria-label/aria-labelledby"
    }

    fn check(&self, doc: &Document) -> Vec<Issue> {
        let label_targets: HashSet<&str> = doc
            .elements_named(&["label"])
            .filter_map(|label| non_blank_attr(label, "for"))
            .collect();

        doc.elements_named(FORM_TAGS)
            .filter(|field| !is_exempt(*field))
            .filter(|field| !is_labelled(*field, &label_targets))
            .map(missing_label)
            .collect()
    }
}

fn is_exempt(field: ElementRef<'_>) -> bool {
    field.value().name() == "input"
        && field
            .value()
            .attr("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .is_some_and(|t| EXEMPT_INPUT_TYPES.contains(&t.as_str()))
}

fn is_labelled(field: ElementRef<'_>, label_targets: &HashSet<&str>) -> bool {
    if has_aria_name(field) {
        return true;
    }
    if non_blank_attr(field, "id").is_some_and(|id| label_targets.contains(id)) {
        return true;
    }
    field
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "label")
}

fn missing_label(field: ElementRef<'_>) -> Issue {
    let placeholder = non_blank_attr(field, "placeholder");
    let (description, short_fix) = match placeholder {
        Some(_) => (
            "Form element relies on placeholder text instead of a label.",
            "Add a persistent label; placeholder text is not a label.",
        ),
        None => (
            "Form element is missing an associated label.",
            "Associate a label with the form field.",
        ),
    };

    let mut detailed = format!(
        "Add `<label for=\"field_id\">Your name</label>` and give the `<{}>` a matching `id`, wrap \
         the field in a `<label>`, or name it with `aria-label` or `aria-labelledby`.",
        field.value().name()
    );
    if placeholder.is_some() {
        detailed.push_str(" Placeholder text disappears on input and is not announced reliably.");
    }

    Issue::new(
        "custom-missing-form-label",
        Severity::Critical,
        description,
        "Every form control needs a programmatically associated label so screen reader users \
         know what to enter. Visual proximity of text is not enough.",
    )
    .help_url(wcag_url("labels-or-instructions"))
    .tags(&["wcag2a", "wcag332", "wcag412", "forms"])
    .node(node_for(field, "Form element does not have an accessible label"))
    .suggestion(short_fix, detailed)
}
