//! Recorder configuration
//!
//! Loaded from a JSON file; every field has a default so a missing file or
//! a partial file both work.

use crate::capture::QualityPreset;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Recorder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecorderConfig {
    /// Preset selected when the recorder starts
    pub default_quality: QualityPreset,

    /// Where [`crate::export::DirectoryFileSaver`] writes downloads
    pub download_dir: PathBuf,

    /// Session timer period in milliseconds
    pub tick_interval_ms: u64,

    /// Media type the finalized recording is tagged with
    pub mime_type: String,

    /// Appended to the timestamp in download file names
    pub file_suffix: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            default_quality: QualityPreset::High,
            download_dir: std::env::temp_dir().join("screen-recorder"),
            tick_interval_ms: 1000,
            mime_type: "video/webm".to_string(),
            file_suffix: "recorded-video.webm".to_string(),
        }
    }
}

impl RecorderConfig {
    /// Read config from `path`, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {:?}", path))?;

        anyhow::ensure!(config.tick_interval_ms > 0, "tickIntervalMs must be positive");

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = RecorderConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, RecorderConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "defaultQuality": "ld", "downloadDir": "/tmp/rec" }"#).unwrap();

        let config = RecorderConfig::load(&path).unwrap();
        assert_eq!(config.default_quality, QualityPreset::Low);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/rec"));
        assert_eq!(config.mime_type, "video/webm");
    }

    #[test]
    fn test_invalid_files_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "defaultQuality": "8k" }"#).unwrap();
        assert!(RecorderConfig::load(&path).is_err());

        std::fs::write(&path, r#"{ "tickIntervalMs": 0 }"#).unwrap();
        assert!(RecorderConfig::load(&path).is_err());
    }
}
