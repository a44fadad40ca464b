//! Screen capture sources
//!
//! The host platform provides the actual display capture; this module
//! defines the interface to it, the quality presets used to request a
//! stream, and the session that owns an acquired stream.

pub mod quality;
pub mod session;
pub mod traits;

pub use quality::{AudioConstraints, CaptureConstraints, QualityPreset, VideoConstraints};
pub use session::CaptureSession;
pub use traits::{CaptureError, CaptureResult, CaptureStream, DisplayCapture, TrackInfo, TrackKind};
