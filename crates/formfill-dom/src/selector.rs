//! CSS selector parsing and matching for [`Document`](crate::Document) queries.

use crate::document::ElementRef;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "selector.pest"]
pub struct SelectorParser;

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("Pest error: {0}")]
    Pest(#[from] pest::error::Error<Rule>),
    #[error("Unexpected rule: {0:?}")]
    UnexpectedRule(Rule),
}

/// Comma-separated selector list. Matches when any member matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

/// Compound selectors joined by combinators, stored left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
    pub combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Lowercase tag; `None` for `*` or when omitted.
    pub tag: Option<String>,
    pub ids: Vec<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Lowercase attribute name.
    pub name: String,
    /// `None` for presence-only `[name]`.
    pub value: Option<String>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut pairs = SelectorParser::parse(Rule::selector_list, input)?;
        let mut list = Vec::new();

        if let Some(top) = pairs.next() {
            for inner in top.into_inner() {
                match inner.as_rule() {
                    Rule::complex => list.push(parse_complex(inner)?),
                    Rule::EOI => {}
                    other => return Err(SelectorError::UnexpectedRule(other)),
                }
            }
        }

        Ok(Self(list))
    }

    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        self.0.iter().any(|c| c.matches(el))
    }
}

impl ComplexSelector {
    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(n - 1, el),
        }
    }

    fn matches_at(&self, idx: usize, el: ElementRef<'_>) -> bool {
        if !self.compounds[idx].matches(el) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match self.combinators[idx - 1] {
            Combinator::Child => el
                .parent_element()
                .is_some_and(|p| self.matches_at(idx - 1, p)),
            Combinator::Descendant => {
                let mut cur = el.parent_element();
                while let Some(p) = cur {
                    if self.matches_at(idx - 1, p) {
                        return true;
                    }
                    cur = p.parent_element();
                }
                false
            }
        }
    }
}

impl CompoundSelector {
    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        if let Some(tag) = &self.tag
            && !el.tag().eq_ignore_ascii_case(tag)
        {
            return false;
        }

        if !self.ids.iter().all(|id| el.attr("id") == Some(id.as_str())) {
            return false;
        }

        if !self.classes.is_empty() {
            let classes: Vec<&str> = el
                .attr("class")
                .map(|c| c.split_ascii_whitespace().collect())
                .unwrap_or_default();
            if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
                return false;
            }
        }

        self.attributes.iter().all(|a| match (&a.value, el.attr(&a.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }
}

fn parse_complex(pair: Pair<Rule>) -> Result<ComplexSelector, SelectorError> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::compound => compounds.push(parse_compound(inner)?),
            Rule::child => combinators.push(Combinator::Child),
            Rule::descendant => combinators.push(Combinator::Descendant),
            other => return Err(SelectorError::UnexpectedRule(other)),
        }
    }

    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

fn parse_compound(pair: Pair<Rule>) -> Result<CompoundSelector, SelectorError> {
    let mut compound = CompoundSelector::default();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::type_sel => compound.tag = Some(first_ident(inner).to_ascii_lowercase()),
            Rule::universal => compound.tag = None,
            Rule::id_sel => compound.ids.push(first_ident(inner)),
            Rule::class_sel => compound.classes.push(first_ident(inner)),
            Rule::attr_sel => compound.attributes.push(parse_attribute(inner)?),
            other => return Err(SelectorError::UnexpectedRule(other)),
        }
    }

    Ok(compound)
}

fn parse_attribute(pair: Pair<Rule>) -> Result<AttributeSelector, SelectorError> {
    let mut inner = pair.into_inner();
    let name = inner
        .next()
        .map(|p| unescape(p.as_str()).to_ascii_lowercase())
        .unwrap_or_default();

    let value = match inner.next() {
        None => None,
        Some(p) => match p.as_rule() {
            Rule::string => Some(unescape(
                p.into_inner().next().map(|v| v.as_str()).unwrap_or_default(),
            )),
            Rule::ident => Some(unescape(p.as_str())),
            other => return Err(SelectorError::UnexpectedRule(other)),
        },
    };

    Ok(AttributeSelector { name, value })
}

fn first_ident(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| unescape(p.as_str()))
        .unwrap_or_default()
}

/// Resolve CSS backslash escapes: `\"` becomes `"`, `\31 ` becomes `1`.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let mut hex = String::new();
        while hex.len() < 6
            && let Some(h) = chars.peek().copied().filter(char::is_ascii_hexdigit)
        {
            hex.push(h);
            chars.next();
        }

        if hex.is_empty() {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }

        let code = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
        out.push(char::from_u32(code).filter(|c| *c != '\0').unwrap_or('\u{FFFD}'));
        if chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }
    }

    out
}
