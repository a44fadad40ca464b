//! Object storage for finalized recordings
//!
//! Recordings are published as blobs and referred to by URL until revoked.

use super::types::BlobUrl;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Published bytes with their media type
#[derive(Debug)]
pub struct Blob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Platform object-URL service
pub trait BlobStore: Send + Sync {
    /// Publish `data` and return a reference to it
    fn create(&self, data: Vec<u8>, mime_type: &str) -> BlobUrl;

    /// Look up published data
    fn get(&self, url: &BlobUrl) -> Option<Arc<Blob>>;

    /// Release the data behind `url`. Unknown URLs are ignored.
    fn revoke(&self, url: &BlobUrl);
}

/// Process-local blob store
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<BlobUrl, Arc<Blob>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held
    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().is_empty()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn create(&self, data: Vec<u8>, mime_type: &str) -> BlobUrl {
        let url = BlobUrl::new(format!("blob:screen-recorder/{}", Uuid::new_v4()));
        let blob = Arc::new(Blob {
            mime_type: mime_type.to_string(),
            data,
        });
        self.blobs.lock().insert(url.clone(), blob);
        url
    }

    fn get(&self, url: &BlobUrl) -> Option<Arc<Blob>> {
        self.blobs.lock().get(url).cloned()
    }

    fn revoke(&self, url: &BlobUrl) {
        if self.blobs.lock().remove(url).is_some() {
            tracing::debug!("Revoked {}", url);
        }
    }
}
