use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxaError};

const CONFIG_FILE: &str = "config.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# taxa configuration file
# Location: ~/.taxa/config.toml

[tree]
# Maximum depth of the category tree (root counts as 1)
# Default: 32
max_depth = 32

[slug]
# Base used when a name normalizes to nothing (e.g. "!!!")
# The allocator still suffixes -1, -2, ... on collision
# Default: "category"
placeholder = "category"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub slug: SlugConfig,
}

/// Tree shape limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the category tree (root counts as 1)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Slug allocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugConfig {
    /// Base used when normalization yields an empty slug
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_max_depth() -> usize {
    32
}

fn default_placeholder() -> String {
    crate::category::slug::DEFAULT_PLACEHOLDER.to_string()
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| TaxaError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self).map_err(|e| TaxaError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "tree.max_depth" => Some(self.tree.max_depth.to_string()),
            "slug.placeholder" => Some(self.slug.placeholder.clone()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "tree.max_depth" => {
                let depth: usize = value.trim().parse().map_err(|_| {
                    TaxaError::validation(format!("tree.max_depth must be a positive integer: '{}'", value))
                })?;
                if depth == 0 {
                    return Err(TaxaError::validation("tree.max_depth must be at least 1"));
                }
                self.tree.max_depth = depth;
                Ok(())
            }
            "slug.placeholder" => {
                if !crate::category::slug::is_valid(value.trim()) {
                    return Err(TaxaError::validation(format!(
                        "slug.placeholder must be lowercase kebab-case: '{}'",
                        value
                    )));
                }
                self.slug.placeholder = value.trim().to_string();
                Ok(())
            }
            _ => Err(TaxaError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            ("tree.max_depth".to_string(), self.tree.max_depth.to_string()),
            ("slug.placeholder".to_string(), self.slug.placeholder.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.tree.max_depth, 32);
        assert_eq!(config.slug.placeholder, "category");
    }

    #[test]
    fn get_set_roundtrip() {
        let mut config = Config::default();

        config.set("tree.max_depth", "8").unwrap();
        assert_eq!(config.get("tree.max_depth").unwrap(), "8");

        config.set("slug.placeholder", "section").unwrap();
        assert_eq!(config.get("slug.placeholder").unwrap(), "section");

        assert!(config.get("unknown.key").is_none());
        assert!(config.set("unknown.key", "x").is_err());
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("tree.max_depth", "zero").is_err());
        assert!(config.set("tree.max_depth", "0").is_err());
        assert!(config.set("slug.placeholder", "Not A Slug").is_err());
    }

    #[test]
    fn save_load_roundtrip() {
        let temp = TempDir::new().unwrap();

        let mut config = Config::default();
        config.tree.max_depth = 4;
        config.save(temp.path()).unwrap();

        let loaded = Config::load(temp.path()).unwrap();
        assert_eq!(loaded.tree.max_depth, 4);
    }

    #[test]
    fn load_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.tree.max_depth, 32);
    }

    #[test]
    fn init_writes_template_once() {
        let temp = TempDir::new().unwrap();
        let path = Config::init(temp.path()).unwrap();
        assert!(path.exists());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("max_depth = 32"));

        // Second init leaves an edited file alone
        fs::write(&path, "[tree]\nmax_depth = 5\n").unwrap();
        Config::init(temp.path()).unwrap();
        assert_eq!(Config::load(temp.path()).unwrap().tree.max_depth, 5);
    }
}
