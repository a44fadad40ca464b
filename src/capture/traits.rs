//! Capture trait definitions
//!
//! Platform-agnostic traits for display capture.

use super::quality::CaptureConstraints;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while acquiring a capture stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("No screen available: {0}")]
    Unavailable(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// Information about one track of a capture stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    /// Track identifier assigned by the platform
    pub id: String,

    /// Video or audio
    pub kind: TrackKind,

    /// Whether the track is still producing media
    pub live: bool,
}

/// A live screen-sharing stream
pub trait CaptureStream: Send + Sync {
    /// Stream identifier assigned by the platform
    fn id(&self) -> &str;

    /// Tracks that make up the stream
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Stop every track, releasing the platform capture resources
    fn stop_all_tracks(&mut self);
}

/// Platform display capture service
#[async_trait]
pub trait DisplayCapture: Send + Sync {
    /// Ask the platform for a screen-sharing stream.
    ///
    /// Resolves once the user has picked a source or dismissed the prompt.
    async fn request(&self, constraints: &CaptureConstraints) -> CaptureResult<Box<dyn CaptureStream>>;
}
