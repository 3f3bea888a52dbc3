use crate::candidates::CandidateOptions;
use formfill_common::protocol::ExecutionSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormfillConfig {
    #[serde(default)]
    pub candidates: CandidateOptions,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Timing given to newly confirmed entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_delay_before_action_ms")]
    pub delay_before_action_ms: u64,
    #[serde(default = "default_delay_between_actions_ms")]
    pub delay_between_actions_ms: u64,
    #[serde(default = "default_wait_for_element")]
    pub wait_for_element: bool,
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            delay_before_action_ms: default_delay_before_action_ms(),
            delay_between_actions_ms: default_delay_between_actions_ms(),
            wait_for_element: default_wait_for_element(),
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

impl ExecutionConfig {
    pub fn settings(&self) -> ExecutionSettings {
        ExecutionSettings {
            delay_before_action: self.delay_before_action_ms,
            delay_between_actions: self.delay_between_actions_ms,
            wait_for_element: self.wait_for_element,
            wait_timeout: self.wait_timeout_ms,
        }
    }
}

fn default_delay_before_action_ms() -> u64 {
    500
}

fn default_delay_between_actions_ms() -> u64 {
    200
}

fn default_wait_for_element() -> bool {
    true
}

fn default_wait_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".formfill").join("entries.json"),
        None => PathBuf::from(".formfill").join("entries.json"),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Input names whose fill values are masked when printed.
    #[serde(default = "default_sensitive_fields")]
    pub sensitive_fields: Vec<String>,
    #[serde(default = "default_redact_in_logs")]
    pub redact_in_logs: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            sensitive_fields: default_sensitive_fields(),
            redact_in_logs: default_redact_in_logs(),
        }
    }
}

impl SecurityConfig {
    /// Whether a selector or description mentions a sensitive field.
    pub fn is_sensitive(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.sensitive_fields
            .iter()
            .any(|f| text.contains(&f.to_lowercase()))
    }
}

fn default_sensitive_fields() -> Vec<String> {
    vec![
        "password".to_string(),
        "passwd".to_string(),
        "token".to_string(),
        "card_number".to_string(),
        "cvv".to_string(),
        "secret".to_string(),
    ]
}

fn default_redact_in_logs() -> bool {
    true
}
