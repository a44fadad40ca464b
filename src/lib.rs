//! Screen Recorder - capture your screen, record it, download it.
//!
//! This is the main library crate. The host platform supplies display
//! capture, media encoding and file saving through the traits in
//! [`capture`], [`recorder`] and [`export`]; [`ScreenRecorder`] drives the
//! session state machine on top of them.

pub mod capture;
pub mod config;
pub mod export;
pub mod recorder;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use capture::QualityPreset;
pub use config::RecorderConfig;
pub use recorder::{Platform, RecorderEvent, ScreenRecorder};
pub use utils::{AppError, AppResult};

use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
///
/// Honors `RUST_LOG`; defaults to debug output for this crate. Safe to call
/// more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screen_recorder_lib=debug,screen_recorder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    tracing::info!("Starting Screen Recorder v{}", env!("CARGO_PKG_VERSION"));
}

/// Load the recorder configuration from `path`, defaulting when absent
pub fn load_config(path: &Path) -> AppResult<RecorderConfig> {
    RecorderConfig::load(path).map_err(|e| AppError::Config(format!("{:#}", e)))
}
