//! JSON-file persistence for saved entries and global settings.

use formfill_common::protocol::{
    ButtonTarget, Entry, ExecutionSettings, InputTarget, StoredState, Strategy, UrlMatch,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access entry store: {0}")]
    Io(#[from] std::io::Error),
    #[error("Entry store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Partial update applied by [`EntryStore::update_entry`]. `None` leaves the
/// field alone.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub enabled: Option<bool>,
    pub url_match: Option<UrlMatch>,
    pub input: Option<InputTarget>,
    pub button: Option<ButtonTarget>,
    pub strategy: Option<Strategy>,
    pub execution: Option<ExecutionSettings>,
}

impl EntryUpdate {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    fn apply(self, entry: &mut Entry) {
        if let Some(enabled) = self.enabled {
            entry.enabled = enabled;
        }
        if let Some(url_match) = self.url_match {
            entry.url_match = url_match;
        }
        if let Some(input) = self.input {
            entry.input = Some(input);
        }
        if let Some(button) = self.button {
            entry.button = Some(button);
        }
        if let Some(strategy) = self.strategy {
            entry.strategy = Some(strategy);
        }
        if let Some(execution) = self.execution {
            entry.execution = execution;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GlobalSettingsUpdate {
    pub enabled: Option<bool>,
    pub default_delay: Option<u64>,
}

/// Entry file on disk. Every mutation is load, modify, save under one lock.
pub struct EntryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl EntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current state; a missing file reads as the empty default.
    pub async fn load(&self) -> Result<StoredState, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredState::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, state: &StoredState) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::info!(path = %self.path.display(), entries = state.entries.len(), "saved entry store");
        Ok(())
    }

    /// Append `entry`, assigning a fresh id when it has none.
    pub async fn add_entry(&self, mut entry: Entry) -> Result<Entry, StoreError> {
        let _guard = self.lock.lock().await;
        let mut state = self.load().await?;

        if entry.id.is_empty() {
            entry.id = uuid::Uuid::new_v4().to_string();
        }
        state.entries.push(entry.clone());
        self.save(&state).await?;
        Ok(entry)
    }

    /// Drop the entry with `id`. Returns whether one was removed.
    pub async fn remove_entry(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut state = self.load().await?;

        let before = state.entries.len();
        state.entries.retain(|e| e.id != id);
        let removed = state.entries.len() != before;
        self.save(&state).await?;
        Ok(removed)
    }

    /// Apply `update` to the entry with `id`. Unknown ids leave the file untouched.
    pub async fn update_entry(&self, id: &str, update: EntryUpdate) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut state = self.load().await?;

        let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        update.apply(entry);
        self.save(&state).await?;
        Ok(true)
    }

    pub async fn entries_for_domain(&self, domain: &str) -> Result<Vec<Entry>, StoreError> {
        let state = self.load().await?;
        Ok(state
            .entries
            .into_iter()
            .filter(|e| e.url_match.domain.eq_ignore_ascii_case(domain))
            .collect())
    }

    pub async fn update_global_settings(
        &self,
        update: GlobalSettingsUpdate,
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut state = self.load().await?;

        if let Some(enabled) = update.enabled {
            state.global_settings.enabled = enabled;
        }
        if let Some(delay) = update.default_delay {
            state.global_settings.default_delay = delay;
        }
        self.save(&state).await
    }
}
