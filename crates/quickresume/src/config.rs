use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::render::TemplateName;

/// Five MiB, the usual browser budget for one origin's local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "quickresume")
}

/// `config.toml` in the platform config directory.
pub fn default_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".quickresume").join("config.toml"))
}

/// `storage.json` in the platform data directory.
pub fn default_storage_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("storage.json"))
        .unwrap_or_else(|| PathBuf::from(".quickresume").join("storage.json"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub locale: Option<String>,
    pub storage: StorageConfig,
    pub image: ImageConfig,
    pub preview: PreviewConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 400,
            max_height: 400,
            quality: 70,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub template: TemplateName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub filter: Option<String>,
}

impl Config {
    /// Reads `explicit`, or the default location when none is given.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = default_config_path();
                if !path.exists() {
                    debug!(path = %path.display(), "no config file, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = toml::from_str::<Config>(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// `--storage` wins over the config file, which wins over the default.
    pub fn storage_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.storage.path.clone())
            .unwrap_or_else(default_storage_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
locale = "de"

[image]
quality = 50

[preview]
template = "modern"
"#,
        )
        .expect("parse config");
        assert_eq!(config.locale.as_deref(), Some("de"));
        assert_eq!(config.image.quality, 50);
        assert_eq!(config.image.max_width, 400);
        assert_eq!(config.preview.template, TemplateName::Modern);
        assert_eq!(config.storage.quota_bytes, DEFAULT_QUOTA_BYTES);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("[storage]\nquota = 1\n").is_err());
    }

    #[test]
    fn storage_override_wins() {
        let config = Config {
            storage: StorageConfig {
                path: Some(PathBuf::from("from-config.json")),
                ..StorageConfig::default()
            },
            ..Config::default()
        };
        assert_eq!(
            config.storage_path(Some(Path::new("cli.json"))),
            PathBuf::from("cli.json")
        );
        assert_eq!(config.storage_path(None), PathBuf::from("from-config.json"));
    }
}
