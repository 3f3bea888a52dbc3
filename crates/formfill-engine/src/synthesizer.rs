//! CSS selector synthesis for a single element.
//!
//! Fragments are collected in a fixed priority order (stable `id`, then
//! [`ATTRIBUTE_PRIORITY`]). The owning document is probed for the cheapest
//! unique form: bare tag first, then tag plus each single fragment. When
//! nothing is unique the selector carries every fragment.

use crate::classifier::is_generated_id;
use formfill_common::dom::{DocumentQuery, DomElement};
use formfill_common::protocol::{SelectorResult, TEXT_CONTENT_MARKER};
use std::collections::HashSet;

/// Attributes considered after `id`, highest priority first.
pub const ATTRIBUTE_PRIORITY: [&str; 5] = ["name", "type", "role", "aria-label", "placeholder"];

/// Text at or above this many UTF-16 units is left out of descriptions.
const MAX_DESCRIPTION_TEXT: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct SelectorOptions {
    /// Attribute names to ignore. Accepts `id`, any priority attribute, and
    /// `textContent`.
    pub disabled_attributes: HashSet<String>,
}

impl SelectorOptions {
    pub fn disabling<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            disabled_attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    fn is_disabled(&self, attr: &str) -> bool {
        self.disabled_attributes.contains(attr)
    }
}

/// One matched attribute: its selector fragment and its description form.
struct Fragment {
    selector: String,
    description: String,
}

pub fn generate_selector<E: DomElement>(element: &E, options: &SelectorOptions) -> SelectorResult {
    let tag = element.tag();
    let mut used_attributes = Vec::new();
    let mut fragments = Vec::new();

    if !options.is_disabled("id")
        && let Some(id) = element.non_empty_attribute("id")
        && !is_generated_id(Some(&id))
    {
        used_attributes.push("id".to_string());
        fragments.push(Fragment {
            selector: format!("#{id}"),
            description: format!("#{id}"),
        });
    }

    for attr in ATTRIBUTE_PRIORITY {
        if options.is_disabled(attr) {
            continue;
        }
        let Some(value) = element.non_empty_attribute(attr) else {
            continue;
        };
        used_attributes.push(attr.to_string());
        fragments.push(Fragment {
            selector: format!("[{attr}=\"{}\"]", escape_attribute_value(&value)),
            description: format!("{attr}=\"{value}\""),
        });
    }

    let text = description_text(element);
    if text.is_some()
        && !options.is_disabled(TEXT_CONTENT_MARKER)
        && (used_attributes.is_empty() || used_attributes == ["type"])
    {
        used_attributes.push(TEXT_CONTENT_MARKER.to_string());
    }

    let human_readable = describe(&tag, &fragments, text.as_deref());
    let selector = element
        .owner_document()
        .and_then(|doc| first_unique(doc, &tag, &fragments))
        .unwrap_or_else(|| {
            let mut full = tag.clone();
            for f in &fragments {
                full.push_str(&f.selector);
            }
            full
        });

    SelectorResult {
        selector,
        used_attributes,
        human_readable,
    }
}

/// Bare tag, then tag plus each single fragment; first exact-one match wins.
fn first_unique<D: DocumentQuery + ?Sized>(
    doc: &D,
    tag: &str,
    fragments: &[Fragment],
) -> Option<String> {
    std::iter::once(tag.to_string())
        .chain(fragments.iter().map(|f| format!("{tag}{}", f.selector)))
        .find(|candidate| match doc.count_matching(candidate) {
            Some(count) => count == 1,
            None => {
                tracing::debug!(selector = %candidate, "uniqueness probe failed, skipping");
                false
            }
        })
}

/// Trimmed text content when short enough to help a human recognise the element.
fn description_text<E: DomElement>(element: &E) -> Option<String> {
    element
        .text_content()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && t.encode_utf16().count() < MAX_DESCRIPTION_TEXT)
}

/// `'Sign In' button (type="submit")`
fn describe(tag: &str, fragments: &[Fragment], text: Option<&str>) -> String {
    let mut parts = Vec::new();

    if let Some(text) = text {
        parts.push(format!("'{text}'"));
    }

    parts.push(tag.to_string());

    if !fragments.is_empty() {
        let attrs: Vec<&str> = fragments.iter().map(|f| f.description.as_str()).collect();
        parts.push(format!("({})", attrs.join(", ")));
    }

    parts.join(" ")
}

fn escape_attribute_value(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_double_quotes_only() {
        assert_eq!(escape_attribute_value(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_attribute_value("it's"), "it's");
    }

    #[test]
    fn description_layout() {
        let fragments = vec![
            Fragment {
                selector: "#login".into(),
                description: "#login".into(),
            },
            Fragment {
                selector: "[type=\"submit\"]".into(),
                description: "type=\"submit\"".into(),
            },
        ];
        assert_eq!(
            describe("button", &fragments, Some("Sign In")),
            "'Sign In' button (#login, type=\"submit\")"
        );
        assert_eq!(describe("div", &[], None), "div");
    }
}
