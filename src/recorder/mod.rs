//! Recording system module
//!
//! - `MediaEncoder`/`EncoderFactory` traits for the platform encoder
//! - `SessionState` state machine and chunk buffers
//! - `SessionTimer` tied to the recording's lifetime
//! - `ScreenRecorder` to coordinate capture, recording and export

pub mod coordinator;
pub mod encoder;
pub mod state;
pub mod timer;
pub mod view;

pub use coordinator::{Platform, RecordingEvent, ScreenRecorder};
pub use encoder::{
    EncoderEvents, EncoderFactory, EventReceiver, EventSender, MediaEncoder, RecorderEvent,
    RecordingError, RecordingResult,
};
pub use state::{ChunkBuffer, RecordingState, SessionState};
pub use timer::{format_time, SessionTimer};
pub use view::{QualityOption, ViewState};
