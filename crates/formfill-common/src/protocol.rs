use serde::{Deserialize, Serialize};

/// Version stamped into every persisted [`StoredState`].
pub const SCHEMA_VERSION: u32 = 1;

/// Synthetic entry in `used_attributes` marking that visible text was the
/// only meaningful signal for the description. Never part of a selector.
pub const TEXT_CONTENT_MARKER: &str = "textContent";

/// Output of selector synthesis for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorResult {
    pub selector: String,
    /// Attribute names in the order their fragments were collected.
    pub used_attributes: Vec<String>,
    pub human_readable: String,
}

impl SelectorResult {
    pub fn meta(&self) -> SelectorMeta {
        SelectorMeta {
            used_attributes: self.used_attributes.clone(),
            human_readable: self.human_readable.clone(),
        }
    }
}

/// Description stored next to a selector in a persisted entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorMeta {
    #[serde(default)]
    pub used_attributes: Vec<String>,
    #[serde(default)]
    pub human_readable: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    InputAndButton,
    ButtonOnly,
    StrategyOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    FillNoClick,
    ClickOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMatch {
    pub domain: String,
    #[serde(default)]
    pub path_prefix: Option<String>,
}

impl UrlMatch {
    pub fn domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            path_prefix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTarget {
    pub selector: String,
    #[serde(default)]
    pub selector_meta: SelectorMeta,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonTarget {
    pub selector: String,
    #[serde(default)]
    pub selector_meta: SelectorMeta,
}

/// Replay timing, all durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSettings {
    #[serde(default = "default_delay_before_action")]
    pub delay_before_action: u64,
    #[serde(default = "default_delay_between_actions")]
    pub delay_between_actions: u64,
    #[serde(default = "default_wait_for_element")]
    pub wait_for_element: bool,
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout: u64,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            delay_before_action: default_delay_before_action(),
            delay_between_actions: default_delay_between_actions(),
            wait_for_element: default_wait_for_element(),
            wait_timeout: default_wait_timeout(),
        }
    }
}

fn default_delay_before_action() -> u64 {
    500
}

fn default_delay_between_actions() -> u64 {
    200
}

fn default_wait_for_element() -> bool {
    true
}

fn default_wait_timeout() -> u64 {
    5000
}

/// A user-confirmed rule: on pages matching `url_match`, fill and/or click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Empty until the store assigns one.
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub url_match: UrlMatch,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub input: Option<InputTarget>,
    #[serde(default)]
    pub button: Option<ButtonTarget>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub execution: ExecutionSettings,
}

fn default_enabled() -> bool {
    true
}

impl Entry {
    pub fn new(url_match: UrlMatch, entry_type: EntryType) -> Self {
        Self {
            id: String::new(),
            enabled: true,
            url_match,
            entry_type,
            input: None,
            button: None,
            strategy: None,
            execution: ExecutionSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_delay")]
    pub default_delay: u64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_delay: default_delay(),
        }
    }
}

fn default_delay() -> u64 {
    300
}

/// Everything the extension persists under its single storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub global_settings: GlobalSettings,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Default for StoredState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            global_settings: GlobalSettings::default(),
            entries: Vec::new(),
        }
    }
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}
