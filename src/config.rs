//! Runtime configuration
//!
//! Resolution order, lowest to highest precedence:
//! built-in defaults, `~/.config/simkit/config.json`, `SIMKIT_*` env vars,
//! command-line flags (applied by the caller).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::simctl::XCRUN;

/// Where non-media files land when no directory is configured. Expanded by
/// the shell spawned inside the simulator, so `$HOME` is the device's home.
pub const DEFAULT_DOWNLOADS_DIR: &str = "$HOME/Downloads";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Launcher for simctl (`xcrun` unless overridden)
    pub xcrun: String,
    /// Default target device: UDID or name
    pub device: Option<String>,
    /// Destination for non-media files inside the simulator; `None` means
    /// [`DEFAULT_DOWNLOADS_DIR`]
    pub downloads_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            xcrun: XCRUN.to_string(),
            device: None,
            downloads_dir: None,
        }
    }
}

/// On-disk shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    xcrun: Option<String>,
    device: Option<String>,
    downloads_dir: Option<String>,
}

impl Config {
    /// Load from the default config path and the environment
    pub fn load() -> Result<Self> {
        let mut config = Config::default();
        if let Some(path) = config_path() {
            if path.exists() {
                config.merge_file(&path)?;
            }
        }
        config.merge_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        if let Some(xcrun) = file.xcrun {
            self.xcrun = xcrun;
        }
        if file.device.is_some() {
            self.device = file.device;
        }
        if file.downloads_dir.is_some() {
            self.downloads_dir = file.downloads_dir;
        }
        Ok(())
    }

    /// `lookup` is `std::env::var` outside of tests
    pub fn merge_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(xcrun) = non_empty("SIMKIT_XCRUN") {
            self.xcrun = xcrun;
        }
        if let Some(device) = non_empty("SIMKIT_DEVICE") {
            self.device = Some(device);
        }
        if let Some(dir) = non_empty("SIMKIT_DOWNLOADS_DIR") {
            self.downloads_dir = Some(dir);
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("simkit").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.xcrun, "xcrun");
        assert_eq!(config.device, None);
        assert_eq!(config.downloads_dir, None);
        assert!(!DEFAULT_DOWNLOADS_DIR.starts_with("/tmp"));
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"device": "iPhone 15", "downloads_dir": "/tmp/dl"}"#).unwrap();

        let mut config = Config::default();
        config.merge_file(&path).unwrap();
        assert_eq!(config.device.as_deref(), Some("iPhone 15"));
        assert_eq!(config.downloads_dir.as_deref(), Some("/tmp/dl"));

        let env: HashMap<&str, &str> = [("SIMKIT_DEVICE", "ABCD"), ("SIMKIT_XCRUN", "  ")].into();
        config.merge_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.device.as_deref(), Some("ABCD"));
        assert_eq!(config.xcrun, "xcrun");
    }

    #[test]
    fn test_bad_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"colour": true}"#).unwrap();

        let err = Config::default().merge_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.json"));
    }
}
