use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::tag::{TagPattern, DEFAULT_TAG_PATTERN};
use crate::error::{Result, VersionSyncError};

/// File name looked up in the project directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "versionsync.toml";

/// Represents the complete configuration for version-sync.
///
/// Describes where the project keeps its build descriptor and sources, and how
/// tags and version commits are named.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Build descriptor, relative to the project directory
    #[serde(default = "default_build_file")]
    pub build_file: PathBuf,

    /// Whether README.md next to the build descriptor is scanned
    #[serde(default = "default_true")]
    pub scan_readme: bool,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default)]
    pub commit: CommitConfig,
}

fn default_build_file() -> PathBuf {
    PathBuf::from("build.gradle.kts")
}

fn default_true() -> bool {
    true
}

fn default_java_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("src/main/java")]
}

fn default_kotlin_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("src/main/kotlin")]
}

/// Source roots per dialect, relative to the project directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourcesConfig {
    #[serde(default = "default_java_roots")]
    pub java: Vec<PathBuf>,

    #[serde(default = "default_kotlin_roots")]
    pub kotlin: Vec<PathBuf>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            java: default_java_roots(),
            kotlin: default_kotlin_roots(),
        }
    }
}

fn default_tag_pattern() -> String {
    DEFAULT_TAG_PATTERN.to_string()
}

/// Tag naming
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            pattern: default_tag_pattern(),
        }
    }
}

fn default_commit_message() -> String {
    "Version {version}".to_string()
}

/// Message of the commit that records updated version files before tagging
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitConfig {
    #[serde(default = "default_commit_message")]
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            message: default_commit_message(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            build_file: default_build_file(),
            scan_readme: true,
            sources: SourcesConfig::default(),
            tag: TagConfig::default(),
            commit: CommitConfig::default(),
        }
    }
}

impl Config {
    /// Validated tag pattern
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag.pattern.clone())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versionsync.toml` in the project directory
/// 3. `versionsync.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `project_dir` - Directory of the project being versioned
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, project_dir: &Path) -> Result<Config> {
    let candidate = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if project_dir.join(CONFIG_FILE_NAME).exists() {
        Some(project_dir.join(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    };

    let Some(path) = candidate else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        VersionSyncError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&config_str).map_err(|e| {
        VersionSyncError::config(format!("Cannot parse {}: {}", path.display(), e))
    })?;
    // A pattern without the placeholder is rejected at load time
    config.tag_pattern()?;

    Ok(config)
}
