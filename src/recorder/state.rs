//! Recording state management
//!
//! Defines the session state machine and the recording buffers.

use super::encoder::{EncoderEvents, EncoderFactory, EventSender, MediaEncoder, RecordingResult};
use super::timer::SessionTimer;
use crate::capture::CaptureSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Current phase of the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    #[default]
    Idle,
    /// Currently recording
    Recording,
}

/// Ordered encoded chunks of one recording
#[derive(Debug, Default, Clone)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl ChunkBuffer {
    pub fn push(&mut self, chunk: Vec<u8>) {
        self.total_bytes += chunk.len();
        self.chunks.push(chunk);
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Concatenate every chunk in emission order
    pub fn concat(self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks {
            data.extend_from_slice(&chunk);
        }
        data
    }
}

/// An encoder running against the current capture
pub struct ActiveRecording {
    session_id: Uuid,
    sequence: u64,
    mime_type: Option<String>,
    encoder: Box<dyn MediaEncoder>,
    chunks: ChunkBuffer,
    elapsed_secs: u64,
    started_at: DateTime<Utc>,
    // Dropping the guard aborts the tick task
    _timer: SessionTimer,
}

impl ActiveRecording {
    /// Create and start an encoder for `capture`, then arm the session timer.
    ///
    /// `sequence` orders recordings; later recordings get larger numbers.
    pub fn begin(
        sequence: u64,
        capture: &CaptureSession,
        encoders: &dyn EncoderFactory,
        tx: &EventSender,
        tick_period: Duration,
    ) -> RecordingResult<Self> {
        let session_id = Uuid::new_v4();
        let events = EncoderEvents::new(session_id, tx.clone());

        let mut encoder = encoders.create(capture.stream(), events)?;
        encoder.start()?;
        let mime_type = encoder.mime_type().map(str::to_string);

        let timer = match SessionTimer::arm(session_id, tick_period, tx.clone()) {
            Ok(timer) => timer,
            Err(e) => {
                if let Err(stop_err) = encoder.stop() {
                    tracing::warn!("Failed to stop encoder after timer error: {}", stop_err);
                }
                return Err(e);
            }
        };

        Ok(Self {
            session_id,
            sequence,
            mime_type,
            encoder,
            chunks: ChunkBuffer::default(),
            elapsed_secs: 0,
            started_at: Utc::now(),
            _timer: timer,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn chunks(&self) -> &ChunkBuffer {
        &self.chunks
    }

    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    pub fn tick(&mut self) {
        self.elapsed_secs += 1;
    }

    /// Ask the encoder to finalize and hand over the buffered chunks.
    ///
    /// The timer and encoder handle are dropped here. The returned error, if
    /// any, is the encoder's stop failure; the buffer is returned regardless.
    pub fn finish(mut self) -> (PendingArtifact, RecordingResult<()>) {
        let stop_result = self.encoder.stop();
        tracing::info!(
            "Recording {} stopped after {}s ({} chunks so far)",
            self.session_id,
            self.elapsed_secs,
            self.chunks.len()
        );

        let pending = PendingArtifact {
            session_id: self.session_id,
            sequence: self.sequence,
            mime_type: self.mime_type.take(),
            chunks: std::mem::take(&mut self.chunks),
        };
        (pending, stop_result)
    }
}

impl std::fmt::Debug for ActiveRecording {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveRecording")
            .field("session_id", &self.session_id)
            .field("sequence", &self.sequence)
            .field("chunks", &self.chunks.len())
            .field("elapsed_secs", &self.elapsed_secs)
            .finish()
    }
}

/// Chunks of a stopped recording waiting for the encoder's stop event
#[derive(Debug)]
pub struct PendingArtifact {
    pub session_id: Uuid,
    pub sequence: u64,
    /// Media type reported by the encoder, if any
    pub mime_type: Option<String>,
    pub chunks: ChunkBuffer,
}

/// Capture and recording state as one value.
///
/// A recording always carries the capture it was started on.
#[derive(Debug)]
pub enum SessionState {
    Idle {
        capture: Option<CaptureSession>,
    },
    Recording {
        capture: CaptureSession,
        recording: ActiveRecording,
    },
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle { capture: None }
    }
}

impl SessionState {
    pub fn phase(&self) -> RecordingState {
        match self {
            SessionState::Idle { .. } => RecordingState::Idle,
            SessionState::Recording { .. } => RecordingState::Recording,
        }
    }

    pub fn capture(&self) -> Option<&CaptureSession> {
        match self {
            SessionState::Idle { capture } => capture.as_ref(),
            SessionState::Recording { capture, .. } => Some(capture),
        }
    }

    pub fn recording(&self) -> Option<&ActiveRecording> {
        match self {
            SessionState::Recording { recording, .. } => Some(recording),
            SessionState::Idle { .. } => None,
        }
    }

    pub fn recording_mut(&mut self) -> Option<&mut ActiveRecording> {
        match self {
            SessionState::Recording { recording, .. } => Some(recording),
            SessionState::Idle { .. } => None,
        }
    }

    /// Elapsed seconds of the active recording, 0 when idle
    pub fn elapsed_secs(&self) -> u64 {
        self.recording().map(|r| r.elapsed_secs()).unwrap_or(0)
    }
}
