//! Save-as-file actions
//!
//! A [`FileSaver`] turns a recorded artifact and a file name into a
//! download. [`DirectoryFileSaver`] writes into a downloads directory.

use super::blob::BlobStore;
use super::types::{ExportError, RecordedArtifact, SavedDownload};
use crate::config::RecorderConfig;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Platform download trigger
pub trait FileSaver: Send + Sync {
    fn save(&self, artifact: &RecordedArtifact, file_name: &str) -> Result<SavedDownload, ExportError>;
}

/// Writes recordings into a directory
pub struct DirectoryFileSaver {
    dir: PathBuf,
    blobs: Arc<dyn BlobStore>,
}

impl DirectoryFileSaver {
    pub fn new(dir: impl Into<PathBuf>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            dir: dir.into(),
            blobs,
        }
    }

    /// Saver writing into the configured download directory
    pub fn from_config(config: &RecorderConfig, blobs: Arc<dyn BlobStore>) -> Self {
        Self::new(config.download_dir.clone(), blobs)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectoryFileSaver {
    fn save(&self, artifact: &RecordedArtifact, file_name: &str) -> Result<SavedDownload, ExportError> {
        let blob = self
            .blobs
            .get(&artifact.url)
            .ok_or_else(|| ExportError::BlobNotFound(artifact.url.to_string()))?;

        std::fs::create_dir_all(&self.dir)?;

        // Write next to the destination, then move into place
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&blob.data)?;
        tmp.flush()?;

        let path = self.dir.join(file_name);
        tmp.persist(&path).map_err(|e| e.error)?;

        tracing::info!("Saved recording to {:?} ({} bytes)", path, blob.data.len());

        Ok(SavedDownload {
            file_name: file_name.to_string(),
            url: file_url(&path),
            path: Some(path),
        })
    }
}

/// `file://` URL with each path segment percent-encoded
fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let encoded: Vec<String> = raw
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    let joined = encoded.join("/");

    if joined.starts_with('/') {
        format!("file://{}", joined)
    } else {
        format!("file:///{}", joined)
    }
}
