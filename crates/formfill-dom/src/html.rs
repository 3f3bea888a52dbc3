use crate::document::{Document, DocumentError, NodeId};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "html.pest"]
pub struct HtmlParser;

#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("Pest error: {0}")]
    Pest(#[from] pest::error::Error<Rule>),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Parse a well-formed HTML snapshot into a [`Document`].
///
/// Close tags must match their open tag exactly; void elements need no close
/// tag. Comments and doctypes are dropped.
pub fn parse_html(input: &str) -> Result<Document, HtmlError> {
    let mut doc = Document::new();
    let root = doc.root();

    if let Some(top) = HtmlParser::parse(Rule::document, input)?.next() {
        for pair in top.into_inner() {
            build_node(&mut doc, root, pair)?;
        }
    }

    Ok(doc)
}

fn build_node(doc: &mut Document, parent: NodeId, pair: Pair<Rule>) -> Result<(), HtmlError> {
    match pair.as_rule() {
        Rule::element => {
            let mut inner = pair.into_inner();
            let Some(open) = inner.next() else {
                return Ok(());
            };
            let el = build_tag(doc, parent, open)?;
            for child in inner {
                if child.as_rule() != Rule::close_tag {
                    build_node(doc, el, child)?;
                }
            }
        }
        Rule::void_element | Rule::self_closing => {
            build_tag(doc, parent, pair)?;
        }
        Rule::text => {
            doc.append_text(parent, &decode_entities(pair.as_str()))?;
        }
        _ => {}
    }
    Ok(())
}

/// Create the element described by an open/void/self-closing tag pair.
fn build_tag(doc: &mut Document, parent: NodeId, pair: Pair<Rule>) -> Result<NodeId, HtmlError> {
    let mut id = None;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::tag_name | Rule::void_name => {
                let el = doc.create_element(part.as_str());
                doc.append_child(parent, el)?;
                id = Some(el);
            }
            Rule::attribute => {
                if let Some(el) = id {
                    let mut kv = part.into_inner();
                    let name = kv.next().map(|p| p.as_str()).unwrap_or_default();
                    let value = kv.next().map(|p| decode_entities(p.as_str()));
                    doc.set_attribute(el, name, value.as_deref().unwrap_or(""))?;
                }
            }
            _ => {}
        }
    }

    id.ok_or(HtmlError::Document(DocumentError::UnknownNode(parent)))
}

/// Decode the handful of character references that show up in form markup.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let decoded = rest.find(';').and_then(|end| {
            let name = &rest[1..end];
            let ch = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => numeric_reference(name),
            };
            ch.map(|c| (c, end + 1))
        });

        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn numeric_reference(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}
