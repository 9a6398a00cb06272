//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the wikipress.yml schema
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    /// Site path prefix of copied images
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    #[serde(default)]
    pub search: SearchConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_image_prefix() -> String {
    String::from("/img")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_vault")]
    pub vault: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_vault() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("out")
}

/// Names of the special entries inside the vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,

    #[serde(default = "default_drafts_dir")]
    pub drafts_dir: String,

    #[serde(default = "default_series_index")]
    pub series_index: String,
}

fn default_posts_dir() -> String {
    String::from("Blog posts")
}

fn default_drafts_dir() -> String {
    String::from("drafts")
}

fn default_series_index() -> String {
    String::from("_index.md")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Executable that renders search pages
    #[serde(default = "default_search_program")]
    pub program: String,
}

fn default_search_program() -> String {
    String::from("search")
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Get the vault directory, resolved relative to config file
    pub fn vault_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.vault)
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Directory holding posts, series directories and drafts
    pub fn posts_dir(&self) -> PathBuf {
        self.vault_dir().join(&self.layout.posts_dir)
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.posts_dir().join(&self.layout.drafts_dir)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            layout: LayoutConfig::default(),
            image_prefix: default_image_prefix(),
            search: SearchConfig::default(),
            config_path: None,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            vault: default_vault(),
            output: default_output(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            posts_dir: default_posts_dir(),
            drafts_dir: default_drafts_dir(),
            series_index: default_series_index(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            program: default_search_program(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.image_prefix, "/img");
        assert_eq!(config.layout.posts_dir, "Blog posts");
        assert_eq!(config.layout.drafts_dir, "drafts");
        assert_eq!(config.search.program, "search");
        assert_eq!(config.drafts_dir(), PathBuf::from("./Blog posts/drafts"));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_example_config_parses() {
        let example = include_str!("../../wikipress.yml.example");
        let config: Config = serde_yaml::from_str(example).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_paths_resolve_against_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "paths:\n  vault: notes\n  output: /abs/site").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        let parent = file.path().parent().unwrap();

        assert_eq!(config.vault_dir(), parent.join("notes"));
        assert_eq!(config.output_dir(), PathBuf::from("/abs/site"));
    }

    #[test]
    fn test_partial_sections() {
        let config: Config =
            serde_yaml::from_str("layout:\n  posts_dir: Posts\nsearch:\n  program: my-search\n")
                .unwrap();
        assert_eq!(config.layout.posts_dir, "Posts");
        assert_eq!(config.layout.drafts_dir, "drafts");
        assert_eq!(config.search.program, "my-search");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::from_file_or_default("/nonexistent/wikipress.yml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "paths: [unclosed").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
