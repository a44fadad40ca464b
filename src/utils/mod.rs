//! Shared utilities
//!
//! Error types and the user-facing notification sink.

pub mod error;
pub mod notify;

pub use error::{AppError, AppResult, ErrorResponse};
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
