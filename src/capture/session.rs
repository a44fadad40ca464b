//! Capture session
//!
//! Owns an acquired screen-sharing stream. The session is the only place the
//! stream's tracks get stopped.

use super::quality::QualityPreset;
use super::traits::{CaptureResult, CaptureStream, DisplayCapture, TrackInfo};
use chrono::{DateTime, Utc};

/// An active screen-sharing stream
pub struct CaptureSession {
    stream: Box<dyn CaptureStream>,
    quality: QualityPreset,
    started_at: DateTime<Utc>,
}

impl CaptureSession {
    /// Request a new stream from the platform using `quality`'s constraints
    pub async fn acquire(capture: &dyn DisplayCapture, quality: QualityPreset) -> CaptureResult<Self> {
        let constraints = quality.constraints();
        tracing::debug!("Requesting display capture: {:?}", constraints);

        let stream = capture.request(&constraints).await?;

        tracing::info!(
            "Display capture acquired: stream={} tracks={}",
            stream.id(),
            stream.tracks().len()
        );

        Ok(Self {
            stream,
            quality,
            started_at: Utc::now(),
        })
    }

    pub fn stream(&self) -> &dyn CaptureStream {
        self.stream.as_ref()
    }

    pub fn stream_id(&self) -> &str {
        self.stream.id()
    }

    pub fn tracks(&self) -> Vec<TrackInfo> {
        self.stream.tracks()
    }

    /// Preset the stream was requested with
    pub fn quality(&self) -> QualityPreset {
        self.quality
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Stop every track and drop the stream
    pub fn release(mut self) {
        tracing::info!("Releasing display capture: stream={}", self.stream.id());
        self.stream.stop_all_tracks();
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("stream_id", &self.stream.id())
            .field("quality", &self.quality)
            .field("started_at", &self.started_at)
            .finish()
    }
}
