//! Media encoder interface
//!
//! Defines the interface to the platform's media encoder and the events it
//! reports back to the recorder.

use crate::capture::CaptureStream;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Errors that can occur during recording
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordingError {
    #[error("No active stream to record")]
    NoActiveStream,

    #[error("Already recording")]
    AlreadyRecording,

    #[error("Not recording")]
    NotRecording,

    #[error("Encoding error: {0}")]
    Encoder(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type for recording operations
pub type RecordingResult<T> = Result<T, RecordingError>;

/// Callbacks delivered to the recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// The encoder emitted a chunk of encoded media
    DataAvailable { session_id: Uuid, chunk: Vec<u8> },
    /// The encoder finished; no more chunks follow for this session
    EncoderStopped { session_id: Uuid },
    /// One timer period elapsed for a recording session
    Tick { session_id: Uuid },
    /// The platform ended the capture stream (e.g. the user stopped sharing
    /// from the browser's own controls)
    CaptureEnded { stream_id: String },
}

pub type EventSender = mpsc::UnboundedSender<RecorderEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<RecorderEvent>;

/// Handle an encoder uses to report chunks and its stop event
#[derive(Debug, Clone)]
pub struct EncoderEvents {
    session_id: Uuid,
    tx: EventSender,
}

impl EncoderEvents {
    pub fn new(session_id: Uuid, tx: EventSender) -> Self {
        Self { session_id, tx }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Report one encoded chunk. Chunks must be reported in emission order.
    pub fn data_available(&self, chunk: Vec<u8>) {
        self.send(RecorderEvent::DataAvailable {
            session_id: self.session_id,
            chunk,
        });
    }

    /// Report that the encoder has finalized. Call exactly once.
    pub fn stopped(&self) {
        self.send(RecorderEvent::EncoderStopped {
            session_id: self.session_id,
        });
    }

    fn send(&self, event: RecorderEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Recorder gone, dropping encoder event for {}", self.session_id);
        }
    }
}

/// A stateful encoder bound to one capture stream
///
/// `stop` returns immediately; the encoder later reports any remaining
/// chunks and then its stop event through [`EncoderEvents`].
pub trait MediaEncoder: Send {
    /// Media type of the chunks this encoder emits, when the platform reports one
    fn mime_type(&self) -> Option<&str> {
        None
    }

    fn start(&mut self) -> RecordingResult<()>;

    fn stop(&mut self) -> RecordingResult<()>;
}

/// Creates encoders for capture streams
pub trait EncoderFactory: Send + Sync {
    fn create(
        &self,
        stream: &dyn CaptureStream,
        events: EncoderEvents,
    ) -> RecordingResult<Box<dyn MediaEncoder>>;
}
