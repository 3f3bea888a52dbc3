use formfill_engine::protocol::{
    ButtonTarget, Entry, EntryType, SCHEMA_VERSION, SelectorMeta, Strategy, UrlMatch,
};
use formfill_engine::{EntryStore, EntryUpdate, GlobalSettingsUpdate, StoreError};
use tempfile::tempdir;

fn button_entry(domain: &str) -> Entry {
    let mut entry = Entry::new(UrlMatch::domain(domain), EntryType::ButtonOnly);
    entry.button = Some(ButtonTarget {
        selector: "button[type=\"submit\"]".into(),
        selector_meta: SelectorMeta::default(),
    });
    entry
}

#[tokio::test]
async fn test_missing_file_loads_default() {
    let dir = tempdir().unwrap();
    let store = EntryStore::new(dir.path().join("entries.json"));

    let state = store.load().await.unwrap();
    assert_eq!(state.schema_version, SCHEMA_VERSION);
    assert!(state.global_settings.enabled);
    assert!(state.entries.is_empty());
}

#[tokio::test]
async fn test_add_assigns_id_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("entries.json");
    let store = EntryStore::new(&path);

    let saved = store.add_entry(button_entry("example.com")).await.unwrap();
    assert!(!saved.id.is_empty());
    assert!(saved.enabled);

    let mut fixed = button_entry("example.com");
    fixed.id = "keep-me".into();
    assert_eq!(store.add_entry(fixed).await.unwrap().id, "keep-me");

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["schemaVersion"], 1);
    assert_eq!(json["entries"][0]["urlMatch"]["domain"], "example.com");
    assert_eq!(json["entries"][1]["id"], "keep-me");

    let reopened = EntryStore::new(&path);
    assert_eq!(reopened.load().await.unwrap().entries.len(), 2);
}

#[tokio::test]
async fn test_remove_and_update() {
    let dir = tempdir().unwrap();
    let store = EntryStore::new(dir.path().join("entries.json"));
    let a = store.add_entry(button_entry("a.com")).await.unwrap();
    let b = store.add_entry(button_entry("b.com")).await.unwrap();

    assert!(store.update_entry(&a.id, EntryUpdate::enabled(false)).await.unwrap());
    let update = EntryUpdate {
        strategy: Some(Strategy::ClickOnly),
        ..EntryUpdate::default()
    };
    assert!(store.update_entry(&b.id, update).await.unwrap());
    assert!(!store.update_entry("nope", EntryUpdate::enabled(false)).await.unwrap());

    let state = store.load().await.unwrap();
    assert!(!state.entries[0].enabled);
    assert_eq!(state.entries[1].strategy, Some(Strategy::ClickOnly));
    assert!(state.entries[1].enabled);

    assert!(store.remove_entry(&a.id).await.unwrap());
    assert!(!store.remove_entry(&a.id).await.unwrap());
    let state = store.load().await.unwrap();
    assert_eq!(state.entries.len(), 1);
    assert_eq!(state.entries[0].id, b.id);
}

#[tokio::test]
async fn test_entries_for_domain_ignores_case() {
    let dir = tempdir().unwrap();
    let store = EntryStore::new(dir.path().join("entries.json"));
    store.add_entry(button_entry("Login.Example.com")).await.unwrap();
    store.add_entry(button_entry("other.com")).await.unwrap();

    let found = store.entries_for_domain("login.example.COM").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].url_match.domain, "Login.Example.com");
}

#[tokio::test]
async fn test_global_settings_merge() {
    let dir = tempdir().unwrap();
    let store = EntryStore::new(dir.path().join("entries.json"));

    store
        .update_global_settings(GlobalSettingsUpdate {
            enabled: Some(false),
            default_delay: None,
        })
        .await
        .unwrap();

    let state = store.load().await.unwrap();
    assert!(!state.global_settings.enabled);
    assert_eq!(state.global_settings.default_delay, 300);
}

#[tokio::test]
async fn test_concurrent_adds_are_serialized() {
    let dir = tempdir().unwrap();
    let store = std::sync::Arc::new(EntryStore::new(dir.path().join("entries.json")));

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.add_entry(button_entry(&format!("site{i}.com"))).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    assert_eq!(store.load().await.unwrap().entries.len(), 8);
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("entries.json");
    tokio::fs::write(&path, "{not json").await.unwrap();

    let result = EntryStore::new(&path).load().await;
    assert!(matches!(result, Err(StoreError::Json(_))));
}
