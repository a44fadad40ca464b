//! Test doubles for the platform services

use crate::capture::{
    CaptureConstraints, CaptureError, CaptureResult, CaptureStream, DisplayCapture, TrackInfo, TrackKind,
};
use crate::config::RecorderConfig;
use crate::export::{
    BlobUrl, Clock, ExportError, FileSaver, InMemoryBlobStore, RecordedArtifact, SavedDownload,
};
use crate::recorder::{EncoderEvents, EncoderFactory, MediaEncoder, Platform, RecordingError, RecordingResult, ScreenRecorder};
use crate::utils::{Notice, NoticeLevel, Notifier};
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

// =============================================================================
// Capture
// =============================================================================

/// Observer for a stream handed out by [`FakeDisplayCapture`]
#[derive(Debug, Clone)]
pub struct FakeStreamHandle {
    id: String,
    tracks: Arc<Mutex<Vec<TrackInfo>>>,
}

impl FakeStreamHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> Vec<TrackInfo> {
        self.tracks.lock().clone()
    }
}

struct FakeStream {
    handle: FakeStreamHandle,
}

impl CaptureStream for FakeStream {
    fn id(&self) -> &str {
        &self.handle.id
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        self.handle.tracks()
    }

    fn stop_all_tracks(&mut self) {
        for track in self.handle.tracks.lock().iter_mut() {
            track.live = false;
        }
    }
}

#[derive(Default)]
pub struct FakeDisplayCapture {
    failure: Mutex<Option<CaptureError>>,
    requests: Mutex<Vec<CaptureConstraints>>,
    streams: Mutex<Vec<FakeStreamHandle>>,
}

impl FakeDisplayCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: CaptureError) -> Self {
        let capture = Self::default();
        capture.set_failure(Some(error));
        capture
    }

    pub fn set_failure(&self, error: Option<CaptureError>) {
        *self.failure.lock() = error;
    }

    pub fn requests(&self) -> Vec<CaptureConstraints> {
        self.requests.lock().clone()
    }

    pub fn last_stream(&self) -> Option<FakeStreamHandle> {
        self.streams.lock().last().cloned()
    }
}

#[async_trait]
impl DisplayCapture for FakeDisplayCapture {
    async fn request(&self, constraints: &CaptureConstraints) -> CaptureResult<Box<dyn CaptureStream>> {
        self.requests.lock().push(*constraints);

        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }

        let id = format!("stream-{}", Uuid::new_v4());
        let tracks = vec![
            TrackInfo {
                id: format!("{}-video", id),
                kind: TrackKind::Video,
                live: true,
            },
            TrackInfo {
                id: format!("{}-audio", id),
                kind: TrackKind::Audio,
                live: true,
            },
        ];
        let handle = FakeStreamHandle {
            id,
            tracks: Arc::new(Mutex::new(tracks)),
        };
        self.streams.lock().push(handle.clone());

        Ok(Box::new(FakeStream { handle }))
    }
}

// =============================================================================
// Encoder
// =============================================================================

/// Observer for an encoder created by [`FakeEncoderFactory`]
#[derive(Debug, Clone)]
pub struct FakeEncoderHandle {
    pub events: EncoderEvents,
    pub stream_id: String,
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl FakeEncoderHandle {
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

struct FakeEncoder {
    handle: FakeEncoderHandle,
    mime_type: Option<String>,
    fail_start: bool,
    fail_stop: bool,
    emit_stop: bool,
}

impl MediaEncoder for FakeEncoder {
    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn start(&mut self) -> RecordingResult<()> {
        if self.fail_start {
            return Err(RecordingError::Encoder("codec unsupported".to_string()));
        }
        self.handle.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> RecordingResult<()> {
        if self.fail_stop {
            return Err(RecordingError::Encoder("encoder crashed".to_string()));
        }
        self.handle.stopped.store(true, Ordering::SeqCst);
        if self.emit_stop {
            self.handle.events.stopped();
        }
        Ok(())
    }
}

/// Encoder factory whose encoders report their stop event right away
/// unless `emit_stop_on_stop` is turned off
pub struct FakeEncoderFactory {
    pub fail_start: AtomicBool,
    pub fail_stop: AtomicBool,
    pub emit_stop_on_stop: AtomicBool,
    pub mime_type: Mutex<Option<String>>,
    created: Mutex<Vec<FakeEncoderHandle>>,
}

impl Default for FakeEncoderFactory {
    fn default() -> Self {
        Self {
            fail_start: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
            emit_stop_on_stop: AtomicBool::new(true),
            mime_type: Mutex::new(None),
            created: Mutex::new(Vec::new()),
        }
    }
}

impl FakeEncoderFactory {
    pub fn created(&self) -> Vec<FakeEncoderHandle> {
        self.created.lock().clone()
    }

    pub fn last(&self) -> Option<FakeEncoderHandle> {
        self.created.lock().last().cloned()
    }
}

impl EncoderFactory for FakeEncoderFactory {
    fn create(&self, stream: &dyn CaptureStream, events: EncoderEvents) -> RecordingResult<Box<dyn MediaEncoder>> {
        let handle = FakeEncoderHandle {
            events,
            stream_id: stream.id().to_string(),
            started: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
        };
        self.created.lock().push(handle.clone());

        Ok(Box::new(FakeEncoder {
            handle,
            mime_type: self.mime_type.lock().clone(),
            fail_start: self.fail_start.load(Ordering::SeqCst),
            fail_stop: self.fail_stop.load(Ordering::SeqCst),
            emit_stop: self.emit_stop_on_stop.load(Ordering::SeqCst),
        }))
    }
}

// =============================================================================
// Export and notifications
// =============================================================================

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// File saver that only remembers what it was asked to save
#[derive(Default)]
pub struct RecordingSaver {
    saved: Mutex<Vec<(BlobUrl, String)>>,
}

impl RecordingSaver {
    pub fn saved(&self) -> Vec<(BlobUrl, String)> {
        self.saved.lock().clone()
    }
}

impl FileSaver for RecordingSaver {
    fn save(&self, artifact: &RecordedArtifact, file_name: &str) -> Result<SavedDownload, ExportError> {
        self.saved
            .lock()
            .push((artifact.url.clone(), file_name.to_string()));
        Ok(SavedDownload {
            file_name: file_name.to_string(),
            path: None,
            url: artifact.url.to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

pub fn sample_artifact() -> RecordedArtifact {
    RecordedArtifact {
        session_id: Uuid::new_v4(),
        sequence: 1,
        url: BlobUrl::new("blob:screen-recorder/sample"),
        mime_type: "video/webm".to_string(),
        size_bytes: 3,
        chunk_count: 1,
        created_at: Local::now(),
    }
}

// =============================================================================
// Whole platform
// =============================================================================

/// All fakes wired together, with handles kept for assertions
pub struct TestPlatform {
    pub capture: Arc<FakeDisplayCapture>,
    pub encoders: Arc<FakeEncoderFactory>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub saver: Arc<RecordingSaver>,
    pub notifier: Arc<RecordingNotifier>,
    pub now: NaiveDateTime,
}

impl Default for TestPlatform {
    fn default() -> Self {
        Self {
            capture: Arc::new(FakeDisplayCapture::new()),
            encoders: Arc::new(FakeEncoderFactory::default()),
            blobs: Arc::new(InMemoryBlobStore::new()),
            saver: Arc::new(RecordingSaver::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            now: NaiveDate::from_ymd_opt(2024, 3, 7)
                .and_then(|d| d.and_hms_opt(9, 5, 0))
                .unwrap(),
        }
    }
}

impl TestPlatform {
    pub fn platform(&self) -> Platform {
        Platform {
            capture: self.capture.clone(),
            encoders: self.encoders.clone(),
            blobs: self.blobs.clone(),
            saver: self.saver.clone(),
            clock: Arc::new(FixedClock(self.now)),
            notifier: self.notifier.clone(),
        }
    }

    pub fn recorder(&self) -> ScreenRecorder {
        ScreenRecorder::new(RecorderConfig::default(), self.platform())
    }
}
