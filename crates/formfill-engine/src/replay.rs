//! Replaying saved entries against a page.
//!
//! Planning is pure: [`plan_entry`] turns an entry into timed steps. The
//! runner walks those steps against a [`ReplayDriver`], waiting for elements
//! to appear when the entry asks it to.

use async_trait::async_trait;
use formfill_common::protocol::{Entry, EntryType, ExecutionSettings, StoredState, Strategy};
use formfill_common::url_match::matches_url;
use std::time::Duration;
use thiserror::Error;

/// Interval between element lookups while waiting.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Sleep(Duration),
    Fill { selector: String, value: String },
    Click { selector: String },
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Driver error: {0}")]
    Driver(String),
}

/// What the host page can do for a replay.
#[async_trait]
pub trait ReplayDriver: Send + Sync {
    type Handle: Send + Sync;

    /// First element matching `selector`, if any right now.
    async fn find(&self, selector: &str) -> Result<Option<Self::Handle>, ReplayError>;
    async fn fill(&self, handle: &Self::Handle, value: &str) -> Result<(), ReplayError>;
    async fn click(&self, handle: &Self::Handle) -> Result<(), ReplayError>;
}

pub fn plan_entry(entry: &Entry) -> Vec<ReplayStep> {
    let exec = &entry.execution;
    let mut steps = vec![ReplayStep::Sleep(Duration::from_millis(exec.delay_before_action))];

    let fills = matches!(
        entry.entry_type,
        EntryType::InputAndButton | EntryType::StrategyOnly
    ) && entry.strategy != Some(Strategy::ClickOnly);
    if fills && let Some(input) = &entry.input {
        steps.push(ReplayStep::Fill {
            selector: input.selector.clone(),
            value: input.value.clone(),
        });
    }

    steps.push(ReplayStep::Sleep(Duration::from_millis(exec.delay_between_actions)));

    if entry.strategy == Some(Strategy::FillNoClick) {
        return steps;
    }

    if let Some(button) = &entry.button {
        steps.push(ReplayStep::Click {
            selector: button.selector.clone(),
        });
    }

    steps
}

/// Enabled entries that apply to `url`, in stored order.
pub fn entries_to_run<'a>(state: &'a StoredState, url: &str) -> Vec<&'a Entry> {
    if !state.global_settings.enabled {
        return Vec::new();
    }
    state
        .entries
        .iter()
        .filter(|e| e.enabled && matches_url(&e.url_match, url))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub filled: Vec<String>,
    pub clicked: Vec<String>,
    /// Selectors that never resolved.
    pub missing: Vec<String>,
}

pub struct ReplayRunner<D> {
    driver: D,
}

impl<D: ReplayDriver> ReplayRunner<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub async fn run_entry(&self, entry: &Entry) -> Result<ReplayReport, ReplayError> {
        let mut report = ReplayReport::default();

        for step in plan_entry(entry) {
            match step {
                ReplayStep::Sleep(d) => tokio::time::sleep(d).await,
                ReplayStep::Fill { selector, value } => {
                    match self.wait_for(&selector, &entry.execution).await? {
                        Some(el) => {
                            self.driver.fill(&el, &value).await?;
                            report.filled.push(selector);
                        }
                        None => self.skip(&entry.id, selector, &mut report),
                    }
                }
                ReplayStep::Click { selector } => {
                    match self.wait_for(&selector, &entry.execution).await? {
                        Some(el) => {
                            self.driver.click(&el).await?;
                            report.clicked.push(selector);
                        }
                        None => self.skip(&entry.id, selector, &mut report),
                    }
                }
            }
        }

        Ok(report)
    }

    /// Run every applicable entry for `url` in order.
    pub async fn run_page(
        &self,
        state: &StoredState,
        url: &str,
    ) -> Result<Vec<(String, ReplayReport)>, ReplayError> {
        let mut reports = Vec::new();
        for entry in entries_to_run(state, url) {
            tracing::debug!(entry = %entry.id, url, "replaying entry");
            reports.push((entry.id.clone(), self.run_entry(entry).await?));
        }
        Ok(reports)
    }

    async fn wait_for(
        &self,
        selector: &str,
        exec: &ExecutionSettings,
    ) -> Result<Option<D::Handle>, ReplayError> {
        if let Some(el) = self.driver.find(selector).await? {
            return Ok(Some(el));
        }
        if !exec.wait_for_element {
            return Ok(None);
        }

        let timeout = Duration::from_millis(exec.wait_timeout);
        let mut elapsed = Duration::ZERO;
        while elapsed < timeout {
            tokio::time::sleep(POLL_INTERVAL).await;
            elapsed += POLL_INTERVAL;
            if let Some(el) = self.driver.find(selector).await? {
                return Ok(Some(el));
            }
        }
        Ok(None)
    }

    fn skip(&self, entry_id: &str, selector: String, report: &mut ReplayReport) {
        tracing::warn!(entry = %entry_id, %selector, "element not found, skipping action");
        report.missing.push(selector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfill_common::protocol::{ButtonTarget, InputTarget, SelectorMeta, UrlMatch};

    fn entry(entry_type: EntryType, strategy: Option<Strategy>) -> Entry {
        let mut e = Entry::new(UrlMatch::domain("example.com"), entry_type);
        e.strategy = strategy;
        e.input = Some(InputTarget {
            selector: "input[name=\"q\"]".into(),
            selector_meta: SelectorMeta::default(),
            value: "rust".into(),
        });
        e.button = Some(ButtonTarget {
            selector: "button".into(),
            selector_meta: SelectorMeta::default(),
        });
        e
    }

    fn actions(steps: &[ReplayStep]) -> Vec<&'static str> {
        steps
            .iter()
            .filter_map(|s| match s {
                ReplayStep::Sleep(_) => None,
                ReplayStep::Fill { .. } => Some("fill"),
                ReplayStep::Click { .. } => Some("click"),
            })
            .collect()
    }

    #[test]
    fn input_and_button_fills_then_clicks() {
        let steps = plan_entry(&entry(EntryType::InputAndButton, None));
        assert_eq!(steps[0], ReplayStep::Sleep(Duration::from_millis(500)));
        assert_eq!(steps[2], ReplayStep::Sleep(Duration::from_millis(200)));
        assert_eq!(actions(&steps), vec!["fill", "click"]);
    }

    #[test]
    fn strategies_gate_actions() {
        let steps = plan_entry(&entry(EntryType::InputAndButton, Some(Strategy::FillNoClick)));
        assert_eq!(actions(&steps), vec!["fill"]);

        let steps = plan_entry(&entry(EntryType::StrategyOnly, Some(Strategy::ClickOnly)));
        assert_eq!(actions(&steps), vec!["click"]);
    }

    #[test]
    fn button_only_never_fills() {
        let steps = plan_entry(&entry(EntryType::ButtonOnly, None));
        assert_eq!(actions(&steps), vec!["click"]);
    }

    #[test]
    fn disabled_entries_and_settings_skip() {
        let mut state = StoredState::default();
        let mut off = entry(EntryType::ButtonOnly, None);
        off.enabled = false;
        state.entries = vec![entry(EntryType::ButtonOnly, None), off];

        assert_eq!(entries_to_run(&state, "https://example.com/").len(), 1);
        assert!(entries_to_run(&state, "https://other.com/").is_empty());

        state.global_settings.enabled = false;
        assert!(entries_to_run(&state, "https://example.com/").is_empty());
    }
}
