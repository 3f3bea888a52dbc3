//! Pick session: turn one or two element picks into a persisted [`Entry`].
//!
//! The visual side (hover outlines, panels) lives with the host. This keeps
//! the state that decides what gets saved: which mode we are in, which
//! candidate is selected, and what was recorded for the input and button.

use crate::candidates::{Candidate, CandidateOptions, build_candidate_list};
use formfill_common::dom::DomElement;
use formfill_common::protocol::{
    ButtonTarget, Entry, EntryType, ExecutionSettings, InputTarget, SelectorMeta, UrlMatch,
};
use formfill_common::url_match::host_of;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("No candidate at index {index} (have {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("Select an input element before switching to button mode")]
    NoInput,
    #[error("Page URL has no host: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    Input,
    Button,
}

/// Selector data captured from the selected candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedTarget {
    pub selector: String,
    pub selector_meta: SelectorMeta,
}

pub struct PickerSession<E> {
    mode: PickMode,
    options: CandidateOptions,
    execution: ExecutionSettings,
    candidates: Vec<Candidate<E>>,
    selected: Option<usize>,
    input: Option<PickedTarget>,
    button: Option<PickedTarget>,
}

impl<E: DomElement> PickerSession<E> {
    pub fn new(options: CandidateOptions) -> Self {
        Self {
            mode: PickMode::Input,
            options,
            execution: ExecutionSettings::default(),
            candidates: Vec::new(),
            selected: None,
            input: None,
            button: None,
        }
    }

    /// Timing written into the confirmed entry.
    pub fn with_execution(mut self, execution: ExecutionSettings) -> Self {
        self.execution = execution;
        self
    }

    pub fn mode(&self) -> PickMode {
        self.mode
    }

    pub fn candidates(&self) -> &[Candidate<E>] {
        &self.candidates
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Candidate<E>> {
        self.candidates.get(self.selected?)
    }

    pub fn input(&self) -> Option<&PickedTarget> {
        self.input.as_ref()
    }

    pub fn button(&self) -> Option<&PickedTarget> {
        self.button.as_ref()
    }

    /// Handle a click: rebuild candidates around `target` and select the best.
    pub fn pick(&mut self, target: &E) -> &[Candidate<E>] {
        self.candidates = build_candidate_list(target, &self.options);
        self.selected = if self.candidates.is_empty() { None } else { Some(0) };
        self.record_selected();
        &self.candidates
    }

    pub fn select_candidate(&mut self, index: usize) -> Result<(), PickerError> {
        if index >= self.candidates.len() {
            return Err(PickerError::OutOfRange {
                index,
                len: self.candidates.len(),
            });
        }
        self.selected = Some(index);
        self.record_selected();
        Ok(())
    }

    /// Move on to picking the button. Needs an input first.
    pub fn switch_to_button_mode(&mut self) -> Result<(), PickerError> {
        match self.mode {
            PickMode::Button => Ok(()),
            PickMode::Input if self.input.is_none() => Err(PickerError::NoInput),
            PickMode::Input => {
                self.mode = PickMode::Button;
                self.candidates.clear();
                self.selected = None;
                Ok(())
            }
        }
    }

    /// Build the entry for `page_url` from whatever was picked.
    pub fn confirm(self, page_url: &str, fill_value: &str) -> Result<Entry, PickerError> {
        let domain = host_of(page_url).ok_or_else(|| PickerError::InvalidUrl(page_url.into()))?;

        let entry_type = match (&self.input, &self.button) {
            (Some(_), Some(_)) => EntryType::InputAndButton,
            (None, Some(_)) => EntryType::ButtonOnly,
            _ => EntryType::StrategyOnly,
        };

        let mut entry = Entry::new(UrlMatch::domain(domain), entry_type);
        entry.input = self.input.map(|t| InputTarget {
            selector: t.selector,
            selector_meta: t.selector_meta,
            value: fill_value.to_string(),
        });
        entry.button = self.button.map(|t| ButtonTarget {
            selector: t.selector,
            selector_meta: t.selector_meta,
        });
        entry.execution = self.execution;

        tracing::debug!(?entry.entry_type, domain = %entry.url_match.domain, "confirmed pick");
        Ok(entry)
    }

    fn record_selected(&mut self) {
        let Some(candidate) = self.selected() else {
            return;
        };
        let result = candidate.selector_result();
        let picked = PickedTarget {
            selector_meta: result.meta(),
            selector: result.selector,
        };
        match self.mode {
            PickMode::Input => self.input = Some(picked),
            PickMode::Button => self.button = Some(picked),
        }
    }
}
