//! Study item engine
//!
//! This module provides:
//! - Study item models (flashcard, multiple choice, true/false, essay)
//! - Persistence of the whole collection as one blob
//! - The item store, owner of identity and favorite state
//! - Favorites filtering
//! - Validated ingestion of generated items over a channel
//! - The study session state machine

pub mod filter;
pub mod ingest;
pub mod models;
pub mod reply;
pub mod session;
pub mod storage;
pub mod store;

pub use filter::{view, FilterView};
pub use ingest::{ingest_batch, Batch, CandidateRecord, IngestReceiver, IngestReport, IngestSender, Rejection, RejectReason};
pub use models::*;
pub use session::{ItemProgress, Outcome, SessionMode, StudySession};
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore, StorageError};
pub use store::{ItemStore, LoadSource, DEFAULT_STORAGE_KEY};
