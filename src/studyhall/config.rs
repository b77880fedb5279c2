use crate::error::{Result, StudyError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_USER: &str = "me";

/// Configuration for studyhall, stored in <root>/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyConfig {
    /// User name recorded on progress, journal entries and authored content
    /// when no --user flag is given
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Extensions to look for when importing flashcard decks from
    /// directories (e.g. ".md")
    #[serde(default = "default_import_ext")]
    pub import_extensions: Vec<String>,
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

fn default_import_ext() -> Vec<String> {
    vec![".md".to_string(), ".markdown".to_string()]
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
            import_extensions: default_import_ext(),
        }
    }
}

impl StudyConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(StudyError::Io)?;
        let config: StudyConfig =
            serde_json::from_str(&content).map_err(StudyError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(StudyError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(StudyError::Serialization)?;
        fs::write(config_path, content).map_err(StudyError::Io)?;
        Ok(())
    }

    /// Look up a config value by key name for `study config <key>`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_user" => Some(self.default_user.clone()),
            "import_extensions" => Some(self.import_extensions.join(",")),
            _ => None,
        }
    }

    /// Set a config value by key name, parsing the string form
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "default_user" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err("default_user cannot be empty".to_string());
                }
                self.default_user = value.to_string();
                Ok(())
            }
            "import_extensions" => {
                let exts: Vec<String> = value
                    .split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        if s.starts_with('.') {
                            s.to_string()
                        } else {
                            format!(".{}", s)
                        }
                    })
                    .collect();
                if exts.is_empty() {
                    return Err("import_extensions cannot be empty".to_string());
                }
                self.import_extensions = exts;
                Ok(())
            }
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudyConfig::default();
        assert_eq!(config.default_user, "me");
        assert!(config.import_extensions.contains(&".md".to_string()));
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StudyConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, StudyConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();

        let mut config = StudyConfig::default();
        config.default_user = "ada".to_string();
        config.save(temp_dir.path()).unwrap();

        let loaded = StudyConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.default_user, "ada");
    }

    #[test]
    fn test_get_set_by_key() {
        let mut config = StudyConfig::default();
        config.set("default_user", "ada").unwrap();
        assert_eq!(config.get("default_user").as_deref(), Some("ada"));

        config.set("import_extensions", "md, txt").unwrap();
        assert_eq!(
            config.get("import_extensions").as_deref(),
            Some(".md,.txt")
        );

        assert!(config.set("unknown", "x").is_err());
        assert!(config.get("unknown").is_none());
        assert!(config.set("default_user", "  ").is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = StudyConfig {
            default_user: "grace".to_string(),
            import_extensions: vec![".md".to_string()],
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: StudyConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, parsed);
    }
}
