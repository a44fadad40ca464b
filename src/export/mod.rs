//! Recording export
//!
//! Finalized recordings are published to a [`BlobStore`] and saved to a file
//! by the [`ExportHandler`].

pub mod blob;
pub mod handler;
pub mod saver;
pub mod types;

pub use blob::{Blob, BlobStore, InMemoryBlobStore};
pub use handler::{download_file_name, Clock, ExportHandler, LocalClock};
pub use saver::{DirectoryFileSaver, FileSaver};
pub use types::{BlobUrl, ExportError, RecordedArtifact, SavedDownload};
