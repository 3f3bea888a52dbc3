use formfill_engine::CandidateOptions;
use formfill_engine::config::{ConfigLoader, FormfillConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_values() {
    let config = FormfillConfig::default();
    assert_eq!(config.candidates, CandidateOptions::default());
    assert_eq!(config.candidates.max_ancestors, 5);
    assert_eq!(config.candidates.max_descendant_depth, 3);
    assert_eq!(config.candidates.max_candidates, 8);

    let exec = config.execution.settings();
    assert_eq!(exec.delay_before_action, 500);
    assert_eq!(exec.delay_between_actions, 200);
    assert!(exec.wait_for_element);
    assert_eq!(exec.wait_timeout, 5000);

    assert!(config.store.path.ends_with("entries.json"));
    assert!(config.security.redact_in_logs);
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
candidates:
  max_candidates: 4
execution:
  wait_timeout_ms: 1500
store:
  path: /tmp/formfill-test/entries.json
security:
  sensitive_fields:
    - "pin"
    "#
    )
    .unwrap();

    let config = ConfigLoader::load_from(file.path()).await.unwrap();

    assert_eq!(config.candidates.max_candidates, 4);
    assert_eq!(config.candidates.max_ancestors, 5);
    assert_eq!(config.execution.wait_timeout_ms, 1500);
    assert_eq!(config.execution.delay_before_action_ms, 500);
    assert_eq!(
        config.store.path,
        std::path::PathBuf::from("/tmp/formfill-test/entries.json")
    );
    assert_eq!(config.security.sensitive_fields, vec!["pin".to_string()]);
    assert!(config.security.is_sensitive("input[name=\"PIN\"]"));
    assert!(!config.security.is_sensitive("input[name=\"password\"]"));
}

#[tokio::test]
async fn test_store_path_expands_home() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "store:\n  path: ~/ff/entries.json").unwrap();

    let config = ConfigLoader::load_from(file.path()).await.unwrap();
    let home = dirs::home_dir().unwrap();
    assert_eq!(config.store.path, home.join("ff").join("entries.json"));
    assert!(!config.store.path.starts_with("~"));
}

#[tokio::test]
async fn test_empty_mapping_uses_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{}}").unwrap();
    let config = ConfigLoader::load_from(file.path()).await.unwrap();
    assert_eq!(config.candidates.max_candidates, 8);
}

#[tokio::test]
async fn test_load_from_nonexistent_file() {
    let result =
        ConfigLoader::load_from(std::path::Path::new("/nonexistent/path/config.yaml")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_invalid_yaml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "candidates: [not, a, map").unwrap();
    assert!(ConfigLoader::load_from(file.path()).await.is_err());
}
