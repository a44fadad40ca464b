//! Export types
//!
//! The finalized recording and the errors raised while saving it.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Recording data not found: {0}")]
    BlobNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque reference to published recording bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobUrl(String);

impl BlobUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finalized, downloadable recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedArtifact {
    /// Recording session that produced it
    pub session_id: Uuid,

    /// Order of the recording within this recorder; newer is larger
    pub sequence: u64,

    /// Reference to the concatenated chunks
    pub url: BlobUrl,

    /// Media type of the data, e.g. `video/webm`
    pub mime_type: String,

    /// Total size in bytes
    pub size_bytes: usize,

    /// Number of encoder chunks that were concatenated
    pub chunk_count: usize,

    /// When the recording was finalized
    pub created_at: DateTime<Local>,
}

/// Result of a save action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDownload {
    /// File name offered to the user
    pub file_name: String,

    /// Where the file ended up, when the saver writes to disk
    pub path: Option<PathBuf>,

    /// Link to the saved file
    pub url: String,
}
