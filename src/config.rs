use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dataset folder opened in the previous run
    #[serde(default)]
    pub last_dataset: Option<String>,
    /// Where export archives are written (current directory when unset)
    #[serde(default)]
    pub export_dir: Option<String>,
    /// Caption tags shown as separate sections, in order
    #[serde(default = "default_display_tags")]
    pub display_tags: Vec<String>,
}

fn default_display_tags() -> Vec<String> {
    vec!["caption".to_string(), "action".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            last_dataset: None,
            export_dir: None,
            display_tags: default_display_tags(),
        }
    }
}

impl Config {
    /// `~/.pairpick`, holding config, labels and logs
    pub fn default_state_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".pairpick"))
    }

    fn config_path(state_dir: &Path) -> PathBuf {
        state_dir.join(CONFIG_FILE_NAME)
    }

    pub fn load(state_dir: &Path) -> Option<Config> {
        let config_path = Self::config_path(state_dir);
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(error = %e, path = %config_path.display(), "ignoring unreadable config");
                None
            }
        }
    }

    /// Save the config to disk
    pub fn save(&self, state_dir: &Path) -> anyhow::Result<()> {
        if !state_dir.exists() {
            fs::create_dir_all(state_dir)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(Self::config_path(state_dir), contents)?;

        Ok(())
    }

    /// Resolved export directory
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            last_dataset: Some("/data/pairs".to_string()),
            export_dir: Some("/tmp/out".to_string()),
            display_tags: vec!["answer".to_string()],
        };

        config.save(dir.path()).unwrap();

        assert_eq!(Config::load(dir.path()), Some(config));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_unreadable_config_is_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "not json").unwrap();
        assert!(Config::load(dir.path()).is_none());
    }

    #[test]
    fn test_save_creates_state_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        Config::default().save(&nested).unwrap();
        assert!(nested.join(CONFIG_FILE_NAME).exists());
    }
}
