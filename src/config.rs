use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::providers::bamboo::DEFAULT_MAX_CHAIN_DEPTH;

/// Configuration file structure for Bamboolens.
///
/// Lets users keep the server address and credentials out of every command
/// line. Configuration files are loaded from the current directory, the user
/// configuration directory, or a specified path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Bamboo server settings
    #[serde(default)]
    pub bamboo: BambooConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BambooConfig {
    /// Bamboo base URL, including any context path
    pub base_url: Option<String>,

    /// Username for basic authentication
    pub username: Option<String>,

    /// Password for basic authentication
    pub password: Option<String>,

    /// Maximum number of builds followed when walking a build chain
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl Default for BambooConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            password: None,
            max_chain_depth: default_max_chain_depth(),
            timeout_seconds: None,
        }
    }
}

fn default_max_chain_depth() -> usize {
    DEFAULT_MAX_CHAIN_DEPTH
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./bamboolens.toml
    /// 3. ./bamboolens.json
    /// 4. ./bamboolens.yaml
    /// 5. ./bamboolens.yml
    /// 6. `<config dir>/bamboolens/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "bamboolens.toml",
            "bamboolens.json",
            "bamboolens.yaml",
            "bamboolens.yml",
        ]
        .into_iter()
        .map(PathBuf::from)
        .chain(user_config_path());

        for candidate in candidates {
            if candidate.exists() {
                log::debug!("Loading configuration from {}", candidate.display());
                return Self::load_from_path(&candidate);
            }
        }

        // No config file found, return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bamboolens").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.bamboo.base_url.is_none());
        assert_eq!(config.bamboo.max_chain_depth, 64);
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[bamboo]
base-url = "https://ci.example.com/bamboo"
username = "builder"
password = "secret"
max-chain-depth = 10
timeout-seconds = 30

[output]
format = "json"
pretty = true
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(
            config.bamboo.base_url.as_deref(),
            Some("https://ci.example.com/bamboo")
        );
        assert_eq!(config.bamboo.username.as_deref(), Some("builder"));
        assert_eq!(config.bamboo.password.as_deref(), Some("secret"));
        assert_eq!(config.bamboo.max_chain_depth, 10);
        assert_eq!(config.bamboo.timeout_seconds, Some(30));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "bamboo": {
    "base-url": "https://ci.json.example.com"
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(
            config.bamboo.base_url.as_deref(),
            Some("https://ci.json.example.com")
        );
        assert_eq!(config.bamboo.max_chain_depth, 64);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yml").unwrap();
        let yaml_content = "bamboo:\n  username: yaml-user\noutput:\n  format: summary\n";
        write!(temp_file, "{}", yaml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.bamboo.username.as_deref(), Some("yaml-user"));
        assert_eq!(config.output.format, OutputFormat::Summary);
    }

    #[test]
    fn test_load_missing_explicit_config_fails() {
        let result = Config::load(Some(Path::new("nonexistent-bamboolens.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_extension_falls_back_through_formats() {
        let mut temp_file = NamedTempFile::with_suffix(".conf").unwrap();
        write!(temp_file, r#"{{"bamboo": {{"max-chain-depth": 3}}}}"#).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.bamboo.max_chain_depth, 3);
    }
}
