use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Base URL of the remote template catalog.
    pub remote_catalog_url: String,
    /// Where user templates are stored; defaults under the config directory.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            remote_catalog_url: "https://catalog.pagecraft.dev".to_string(),
            templates_dir: None,
        }
    }
}

impl EditorConfig {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".pagecraft"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Resolved user templates directory.
    pub fn templates_dir(&self) -> PathBuf {
        self.templates_dir
            .clone()
            .or_else(|| Self::config_dir().map(|dir| dir.join("templates")))
            .unwrap_or_else(|| PathBuf::from("templates"))
    }

    pub fn load() -> Option<EditorConfig> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = EditorConfig {
            remote_catalog_url: "https://example.com/catalog".to_string(),
            templates_dir: Some(PathBuf::from("/tmp/templates")),
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.remote_catalog_url, config.remote_catalog_url);
        assert_eq!(back.templates_dir, config.templates_dir);
    }

    #[test]
    fn templates_dir_falls_back_under_the_config_dir() {
        let config = EditorConfig::default();
        let dir = config.templates_dir();
        assert!(dir.ends_with("templates"));
    }
}
