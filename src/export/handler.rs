//! Download handling
//!
//! Names the finalized recording after the local date and time and hands it
//! to the file saver.

use super::saver::FileSaver;
use super::types::{ExportError, RecordedArtifact, SavedDownload};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

/// Source of the current local date and time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// `DD-MM-YYYY HH-MM <suffix>`
pub fn download_file_name(now: NaiveDateTime, suffix: &str) -> String {
    format!("{} {}", now.format("%d-%m-%Y %H-%M"), suffix)
}

/// Saves the current recording under a timestamped name
pub struct ExportHandler {
    clock: Arc<dyn Clock>,
    saver: Arc<dyn FileSaver>,
    file_suffix: String,
}

impl ExportHandler {
    pub fn new(clock: Arc<dyn Clock>, saver: Arc<dyn FileSaver>, file_suffix: impl Into<String>) -> Self {
        Self {
            clock,
            saver,
            file_suffix: file_suffix.into(),
        }
    }

    /// Save `artifact`, or do nothing when there is none
    pub fn download(&self, artifact: Option<&RecordedArtifact>) -> Result<Option<SavedDownload>, ExportError> {
        let Some(artifact) = artifact else {
            tracing::debug!("Download requested without a recording");
            return Ok(None);
        };

        let file_name = download_file_name(self.clock.now(), &self.file_suffix);
        tracing::info!("Downloading {} as '{}'", artifact.url, file_name);

        self.saver.save(artifact, &file_name).map(Some)
    }
}
