use super::schema::FormfillConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./formfill.yaml
    /// 2. ~/.formfill/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<FormfillConfig, ConfigError> {
        let local_config = PathBuf::from("./formfill.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".formfill").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(FormfillConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<FormfillConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let mut config: FormfillConfig = serde_yaml::from_str(&content)?;
        config.store.path = expand_home(&config.store.path);
        tracing::debug!(
            path = %path.display(),
            store = %config.store.path.display(),
            "loaded config"
        );
        Ok(config)
    }
}

/// Resolves a leading `~` component against the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_only_a_leading_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_home(Path::new("~/.formfill/entries.json")),
            home.join(".formfill").join("entries.json")
        );
        assert_eq!(expand_home(Path::new("/srv/~/x.json")), PathBuf::from("/srv/~/x.json"));
        assert_eq!(expand_home(Path::new("~bob/x.json")), PathBuf::from("~bob/x.json"));
        assert_eq!(expand_home(Path::new("data/x.json")), PathBuf::from("data/x.json"));
    }
}
