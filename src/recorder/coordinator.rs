//! Screen recorder coordinator
//!
//! Owns the capture/recording state machine, applies platform callbacks and
//! user actions to it, and reports outcomes as notices.

use super::encoder::{
    EncoderFactory, EventReceiver, EventSender, RecorderEvent, RecordingError, RecordingResult,
};
use super::state::{ActiveRecording, PendingArtifact, RecordingState, SessionState};
use super::view::ViewState;
use crate::capture::{CaptureSession, DisplayCapture, QualityPreset};
use crate::config::RecorderConfig;
use crate::export::{
    BlobStore, BlobUrl, Clock, ExportError, ExportHandler, FileSaver, RecordedArtifact, SavedDownload,
};
use crate::utils::{AppResult, Notifier};
use chrono::Local;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

const SHARING_STARTED: &str = "Screen sharing started";
const SHARING_FAILED: &str = "Error accessing screen. Please try again.";
const RECORDING_STARTED: &str = "Recording started";
const NO_STREAM: &str = "No stream to record. Please start screen sharing first.";
const UNLOAD_PROMPT: &str = "Do you want to refresh the window?";

/// Status changes broadcast to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingEvent {
    /// Screen sharing started
    SharingStarted,
    /// Screen sharing stopped
    SharingStopped,
    /// Recording started
    Started,
    /// Recording stopped; the artifact follows once the encoder finalizes
    Stopped,
    /// A new recording is available for download
    ArtifactReady(BlobUrl),
    /// Elapsed seconds of the active recording
    Progress(u64),
}

/// Services provided by the host platform
#[derive(Clone)]
pub struct Platform {
    pub capture: Arc<dyn DisplayCapture>,
    pub encoders: Arc<dyn EncoderFactory>,
    pub blobs: Arc<dyn BlobStore>,
    pub saver: Arc<dyn FileSaver>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
}

/// Single-page screen recorder
pub struct ScreenRecorder {
    config: RecorderConfig,
    platform: Platform,
    export: ExportHandler,

    /// Preset for the next capture request
    quality: QualityPreset,

    state: SessionState,

    /// Stopped recordings waiting for their encoder's stop event
    finalizing: Vec<PendingArtifact>,

    /// Current downloadable recording
    artifact: Option<RecordedArtifact>,

    /// Sequence number for the next recording
    next_sequence: u64,

    events_tx: EventSender,
    events_rx: EventReceiver,
    status_tx: broadcast::Sender<RecordingEvent>,
}

impl ScreenRecorder {
    pub fn new(config: RecorderConfig, platform: Platform) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (status_tx, _) = broadcast::channel(100);
        let export = ExportHandler::new(
            platform.clock.clone(),
            platform.saver.clone(),
            config.file_suffix.clone(),
        );

        Self {
            quality: config.default_quality,
            config,
            platform,
            export,
            state: SessionState::default(),
            finalizing: Vec::new(),
            artifact: None,
            next_sequence: 1,
            events_tx,
            events_rx,
            status_tx,
        }
    }

    /// Sender for platform callbacks (encoder chunks, capture ended, ...)
    pub fn event_sender(&self) -> EventSender {
        self.events_tx.clone()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.status_tx.subscribe()
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn quality(&self) -> QualityPreset {
        self.quality
    }

    /// Select the preset for the next capture. An active capture keeps its
    /// original resolution.
    pub fn set_quality(&mut self, quality: QualityPreset) {
        tracing::debug!("Quality preset set to {}", quality);
        self.quality = quality;
    }

    pub fn state(&self) -> RecordingState {
        self.state.phase()
    }

    pub fn is_sharing(&self) -> bool {
        self.state.capture().is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.state.phase() == RecordingState::Recording
    }

    pub fn capture(&self) -> Option<&CaptureSession> {
        self.state.capture()
    }

    /// Elapsed seconds of the active recording; 0 when idle
    pub fn elapsed_secs(&self) -> u64 {
        self.state.elapsed_secs()
    }

    /// Id of the active recording session
    pub fn recording_session(&self) -> Option<Uuid> {
        self.state.recording().map(|r| r.session_id())
    }

    pub fn artifact(&self) -> Option<&RecordedArtifact> {
        self.artifact.as_ref()
    }

    // =========================================================================
    // Capture
    // =========================================================================

    /// Start screen sharing, or stop it if already sharing.
    ///
    /// Returns whether a capture is active afterwards.
    pub async fn toggle_capture(&mut self) -> AppResult<bool> {
        if self.is_sharing() {
            self.release_capture();
            return Ok(false);
        }

        match CaptureSession::acquire(self.platform.capture.as_ref(), self.quality).await {
            Ok(session) => {
                self.state = SessionState::Idle {
                    capture: Some(session),
                };
                self.platform.notifier.success(SHARING_STARTED);
                self.broadcast(RecordingEvent::SharingStarted);
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Error accessing screen: {}", e);
                self.platform.notifier.error(SHARING_FAILED);
                Err(e.into())
            }
        }
    }

    /// Stop any recording on the current capture, then stop its tracks
    fn release_capture(&mut self) {
        if self.is_recording() {
            tracing::info!("Capture released while recording, stopping recording first");
            if let Err(e) = self.stop_recording() {
                tracing::warn!("Stopping recording before release failed: {}", e);
            }
        }

        if let SessionState::Idle { capture } = &mut self.state {
            if let Some(session) = capture.take() {
                session.release();
                self.broadcast(RecordingEvent::SharingStopped);
            }
        }
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Start encoding the current capture
    pub fn start_recording(&mut self) -> RecordingResult<Uuid> {
        let result = self.begin_recording();

        match &result {
            Ok(session_id) => {
                tracing::info!("Recording started: {}", session_id);
                self.platform.notifier.success(RECORDING_STARTED);
                self.broadcast(RecordingEvent::Started);
            }
            Err(RecordingError::NoActiveStream) => {
                tracing::warn!("Recording requested without an active stream");
                self.platform.notifier.error(NO_STREAM);
            }
            Err(e) => {
                tracing::error!("Failed to start recording: {}", e);
                self.platform
                    .notifier
                    .error(&format!("Could not start recording: {}", e));
            }
        }

        result
    }

    fn begin_recording(&mut self) -> RecordingResult<Uuid> {
        let capture = match std::mem::take(&mut self.state) {
            SessionState::Idle {
                capture: Some(capture),
            } => capture,
            other => {
                let err = match other {
                    SessionState::Recording { .. } => RecordingError::AlreadyRecording,
                    SessionState::Idle { .. } => RecordingError::NoActiveStream,
                };
                self.state = other;
                return Err(err);
            }
        };

        let sequence = self.next_sequence;
        match ActiveRecording::begin(
            sequence,
            &capture,
            self.platform.encoders.as_ref(),
            &self.events_tx,
            self.config.tick_interval(),
        ) {
            Ok(recording) => {
                self.next_sequence += 1;
                let session_id = recording.session_id();
                self.state = SessionState::Recording { capture, recording };
                Ok(session_id)
            }
            Err(e) => {
                self.state = SessionState::Idle {
                    capture: Some(capture),
                };
                Err(e)
            }
        }
    }

    /// Ask the encoder to finalize and return to idle.
    ///
    /// The artifact becomes available when the encoder reports its stop event.
    pub fn stop_recording(&mut self) -> RecordingResult<Uuid> {
        let (capture, recording) = match std::mem::take(&mut self.state) {
            SessionState::Recording { capture, recording } => (capture, recording),
            idle => {
                self.state = idle;
                return Err(RecordingError::NotRecording);
            }
        };

        self.state = SessionState::Idle {
            capture: Some(capture),
        };

        let (pending, stop_result) = recording.finish();
        let session_id = pending.session_id;
        self.broadcast(RecordingEvent::Stopped);

        match stop_result {
            Ok(()) => {
                self.finalizing.push(pending);
                Ok(session_id)
            }
            Err(e) => {
                // No stop event will come; keep what was buffered
                tracing::error!("Encoder failed to stop cleanly: {}", e);
                self.platform
                    .notifier
                    .error(&format!("Recording stopped with an error: {}", e));
                self.finalize(pending);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Wait for the next platform callback
    pub async fn next_event(&mut self) -> Option<RecorderEvent> {
        self.events_rx.recv().await
    }

    /// Apply every callback that is already queued
    pub fn run_until_idle(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Apply one platform callback
    pub fn handle_event(&mut self, event: RecorderEvent) {
        match event {
            RecorderEvent::DataAvailable { session_id, chunk } => self.on_data(session_id, chunk),
            RecorderEvent::EncoderStopped { session_id } => self.on_encoder_stopped(session_id),
            RecorderEvent::Tick { session_id } => self.on_tick(session_id),
            RecorderEvent::CaptureEnded { stream_id } => self.on_capture_ended(&stream_id),
        }
    }

    fn on_data(&mut self, session_id: Uuid, chunk: Vec<u8>) {
        tracing::debug!("Chunk for {}: {} bytes", session_id, chunk.len());

        if let Some(recording) = self.state.recording_mut() {
            if recording.session_id() == session_id {
                recording.push_chunk(chunk);
                return;
            }
        }

        match self.finalizing.iter_mut().find(|p| p.session_id == session_id) {
            Some(pending) => pending.chunks.push(chunk),
            None => tracing::warn!("Dropping chunk for unknown recording {}", session_id),
        }
    }

    fn on_encoder_stopped(&mut self, session_id: Uuid) {
        if let Some(index) = self.finalizing.iter().position(|p| p.session_id == session_id) {
            let pending = self.finalizing.remove(index);
            self.finalize(pending);
            return;
        }

        // The encoder ended on its own while still recording
        if self.recording_session() == Some(session_id) {
            tracing::warn!("Encoder for {} stopped unexpectedly", session_id);
            if self.stop_recording().is_ok() {
                self.on_encoder_stopped(session_id);
            }
            return;
        }

        tracing::warn!("Stop event for unknown recording {}", session_id);
    }

    fn on_tick(&mut self, session_id: Uuid) {
        let Some(recording) = self.state.recording_mut() else {
            tracing::trace!("Ignoring tick for {} while idle", session_id);
            return;
        };

        if recording.session_id() != session_id {
            tracing::trace!("Ignoring stale tick for {}", session_id);
            return;
        }

        recording.tick();
        let elapsed = recording.elapsed_secs();
        self.broadcast(RecordingEvent::Progress(elapsed));
    }

    fn on_capture_ended(&mut self, stream_id: &str) {
        let matches = self
            .state
            .capture()
            .map(|c| c.stream_id() == stream_id)
            .unwrap_or(false);

        if matches {
            tracing::info!("Capture {} ended by the platform", stream_id);
            self.release_capture();
        } else {
            tracing::debug!("Ignoring end of inactive capture {}", stream_id);
        }
    }

    /// Concatenate a stopped recording and make it the current artifact.
    ///
    /// A recording older than the current artifact is discarded, and so is
    /// any older recording still waiting for its stop event.
    fn finalize(&mut self, pending: PendingArtifact) {
        self.finalizing.retain(|stale| {
            let keep = stale.sequence > pending.sequence;
            if !keep {
                tracing::warn!(
                    "Discarding recording {}: superseded before its encoder stopped",
                    stale.session_id
                );
            }
            keep
        });

        if let Some(current) = &self.artifact {
            if current.sequence > pending.sequence {
                tracing::warn!(
                    "Discarding recording {}: newer recording {} is already current",
                    pending.session_id,
                    current.session_id
                );
                return;
            }
        }

        let mime_type = pending
            .mime_type
            .unwrap_or_else(|| self.config.mime_type.clone());
        let chunk_count = pending.chunks.len();
        let data = pending.chunks.concat();
        let size_bytes = data.len();
        let url = self.platform.blobs.create(data, &mime_type);

        if let Some(previous) = self.artifact.take() {
            self.platform.blobs.revoke(&previous.url);
        }

        tracing::info!(
            "Recording {} finalized: {} ({} chunks, {} bytes)",
            pending.session_id,
            url,
            chunk_count,
            size_bytes
        );

        self.artifact = Some(RecordedArtifact {
            session_id: pending.session_id,
            sequence: pending.sequence,
            url: url.clone(),
            mime_type,
            size_bytes,
            chunk_count,
            created_at: Local::now(),
        });
        self.broadcast(RecordingEvent::ArtifactReady(url));
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Save the current recording under a timestamped name.
    ///
    /// Does nothing and returns `None` when no recording exists.
    pub fn download(&self) -> Result<Option<SavedDownload>, ExportError> {
        let result = self.export.download(self.artifact.as_ref());
        if let Err(e) = &result {
            tracing::error!("Download failed: {}", e);
            self.platform.notifier.error(&format!("Download failed: {}", e));
        }
        result
    }

    // =========================================================================
    // View
    // =========================================================================

    pub fn view(&self) -> ViewState {
        ViewState::build(
            self.quality,
            self.is_sharing(),
            self.is_recording(),
            self.elapsed_secs(),
            self.artifact.as_ref().map(|a| a.url.clone()),
        )
    }

    /// Confirmation to show before the page is unloaded, if work would be lost
    pub fn unload_prompt(&self) -> Option<&'static str> {
        let has_work = self.is_sharing() || self.artifact.is_some() || !self.finalizing.is_empty();
        has_work.then_some(UNLOAD_PROMPT)
    }

    fn broadcast(&self, event: RecordingEvent) {
        let _ = self.status_tx.send(event);
    }
}

impl Drop for ScreenRecorder {
    fn drop(&mut self) {
        match std::mem::take(&mut self.state) {
            SessionState::Recording { capture, recording } => {
                let _ = recording.finish();
                capture.release();
            }
            SessionState::Idle {
                capture: Some(capture),
            } => capture.release(),
            SessionState::Idle { capture: None } => {}
        }

        if let Some(artifact) = self.artifact.take() {
            self.platform.blobs.revoke(&artifact.url);
        }
    }
}
