//! Candidate discovery and ranking around a clicked element.
//!
//! The literal click target is often a wrapper or a decorative child. We look
//! at the target, its ancestors, and its semantic descendants, score each one,
//! and offer the best few with selectors already attached.

use crate::classifier::is_generated_id;
use crate::semantic::{is_content_editable, is_semantic_element, is_semantic_role, is_semantic_tag};
use crate::synthesizer::{SelectorOptions, generate_selector};
use formfill_common::dom::DomElement;
use formfill_common::protocol::SelectorResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const BASE_SCORE: i32 = 100;
const DISTANCE_PENALTY: i32 = 10;
const SEMANTIC_TAG_BONUS: i32 = 50;
const SEMANTIC_ROLE_BONUS: i32 = 40;
const CONTENT_EDITABLE_BONUS: i32 = 45;
const ATTRIBUTE_BONUS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateOptions {
    /// Parent steps walked from the click target.
    #[serde(default = "default_max_ancestors")]
    pub max_ancestors: usize,
    /// Deepest child level searched for semantic descendants (children are 1).
    #[serde(default = "default_max_descendant_depth")]
    pub max_descendant_depth: usize,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for CandidateOptions {
    fn default() -> Self {
        Self {
            max_ancestors: default_max_ancestors(),
            max_descendant_depth: default_max_descendant_depth(),
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_max_ancestors() -> usize {
    5
}

fn default_max_descendant_depth() -> usize {
    3
}

fn default_max_candidates() -> usize {
    8
}

/// A scored element offered to the user, with its selector attached.
#[derive(Debug, Clone)]
pub struct Candidate<E> {
    pub element: E,
    pub score: i32,
    pub is_semantic: bool,
    pub selector: String,
    pub human_readable: String,
    pub used_attributes: Vec<String>,
    /// Lowercase tag name.
    pub tag: String,
}

impl<E> Candidate<E> {
    pub fn selector_result(&self) -> SelectorResult {
        SelectorResult {
            selector: self.selector.clone(),
            used_attributes: self.used_attributes.clone(),
            human_readable: self.human_readable.clone(),
        }
    }

    /// Element-free view for rendering or serialization.
    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            tag: self.tag.clone(),
            score: self.score,
            is_semantic: self.is_semantic,
            selector: self.selector.clone(),
            human_readable: self.human_readable.clone(),
            used_attributes: self.used_attributes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub tag: String,
    pub score: i32,
    pub is_semantic: bool,
    pub selector: String,
    pub human_readable: String,
    pub used_attributes: Vec<String>,
}

/// Heuristic score of `element` found `distance` steps from the click target.
pub fn score_candidate<E: DomElement>(element: &E, distance: usize) -> i32 {
    let distance = i32::try_from(distance).unwrap_or(i32::MAX / DISTANCE_PENALTY);
    let mut score = BASE_SCORE - DISTANCE_PENALTY * distance;

    if is_semantic_tag(&element.tag()) {
        score += SEMANTIC_TAG_BONUS;
    }
    if is_semantic_role(element.attribute("role").as_deref()) {
        score += SEMANTIC_ROLE_BONUS;
    }
    if is_content_editable(element.attribute("contenteditable").as_deref()) {
        score += CONTENT_EDITABLE_BONUS;
    }

    if let Some(id) = element.non_empty_attribute("id")
        && !is_generated_id(Some(&id))
    {
        score += ATTRIBUTE_BONUS;
    }
    if element.non_empty_attribute("name").is_some() {
        score += ATTRIBUTE_BONUS;
    }
    if element.non_empty_attribute("aria-label").is_some() {
        score += ATTRIBUTE_BONUS;
    }

    score
}

/// Every semantic element below `root` down to `max_depth` levels, depth-first.
///
/// Semantic hits do not stop the descent.
pub fn find_semantic_descendants<E: DomElement>(root: &E, max_depth: usize) -> Vec<(E, usize)> {
    fn walk<E: DomElement>(el: &E, depth: usize, max_depth: usize, out: &mut Vec<(E, usize)>) {
        if depth > max_depth {
            return;
        }
        for child in el.children() {
            if is_semantic_element(&child) {
                out.push((child.clone(), depth));
            }
            walk(&child, depth + 1, max_depth, out);
        }
    }

    let mut out = Vec::new();
    walk(root, 1, max_depth, &mut out);
    out
}

/// Visited-once accumulator for a single discovery pass.
struct Collector<E> {
    seen: HashSet<E>,
    candidates: Vec<Candidate<E>>,
}

impl<E: DomElement> Collector<E> {
    fn add(&mut self, element: E, distance: usize) {
        if !self.seen.insert(element.clone()) {
            return;
        }

        let score = score_candidate(&element, distance);
        let info = generate_selector(&element, &SelectorOptions::default());
        self.candidates.push(Candidate {
            is_semantic: is_semantic_element(&element),
            tag: element.tag(),
            element,
            score,
            selector: info.selector,
            human_readable: info.human_readable,
            used_attributes: info.used_attributes,
        });
    }
}

/// Ranked candidates around `click_target`, best first, at most
/// `options.max_candidates` long.
///
/// Discovery order is the click target, ancestors outward, then semantic
/// descendants depth-first. Equal scores keep that order.
pub fn build_candidate_list<E: DomElement>(
    click_target: &E,
    options: &CandidateOptions,
) -> Vec<Candidate<E>> {
    let mut collector = Collector {
        seen: HashSet::new(),
        candidates: Vec::new(),
    };

    collector.add(click_target.clone(), 0);

    let mut parent = click_target.parent();
    let mut distance = 1;
    while distance <= options.max_ancestors
        && let Some(p) = parent
    {
        parent = p.parent();
        collector.add(p, distance);
        distance += 1;
    }

    for (element, depth) in find_semantic_descendants(click_target, options.max_descendant_depth) {
        collector.add(element, depth);
    }

    let mut candidates = collector.candidates;
    let enumerated = candidates.len();
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(options.max_candidates);

    tracing::debug!(
        enumerated,
        kept = candidates.len(),
        top = candidates.first().map(|c| c.selector.as_str()).unwrap_or(""),
        "built candidate list"
    );

    candidates
}
