//! Ingestion gateway for externally generated items
//!
//! Producers (the AI assistant) push batches of raw candidate records over an
//! `add-quiz-items` channel instead of calling the store. The consumer side
//! validates each record on its own and merges the accepted ones; a bad
//! record never spoils the rest of its batch.

use std::sync::{Arc, Mutex};

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;

use super::models::{ItemError, ItemId, ItemKind, NewItem};
use super::store::ItemStore;

/// Event name carried by every ingestion signal
pub const ADD_ITEMS_EVENT: &str = "add-quiz-items";

/// Raw records as produced upstream
pub type Batch = Vec<serde_json::Value>;

const KNOWN_KINDS: [&str; 4] = ["flashcard", "multipleChoice", "trueFalse", "essay"];
const CHOICE_KINDS: [&str; 2] = ["multipleChoice", "trueFalse"];

/// A candidate record: no id, no favorite flag
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    /// Kept raw; only choice kinds decode it
    #[serde(default)]
    pub options: Option<serde_json::Value>,
}

impl CandidateRecord {
    /// Check kind, then text, then options, in that order.
    pub fn into_draft(self) -> Result<NewItem, ItemError> {
        let kind = self.kind.trim();
        if !KNOWN_KINDS.contains(&kind) {
            return Err(ItemError::UnknownKind(self.kind));
        }
        if self.question.trim().is_empty() {
            return Err(ItemError::EmptyQuestion);
        }
        if self.answer.trim().is_empty() {
            return Err(ItemError::EmptyAnswer);
        }
        let options = match self.options {
            Some(raw) if CHOICE_KINDS.contains(&kind) && !raw.is_null() => Some(
                serde_json::from_value::<Vec<String>>(raw)
                    .map_err(|e| ItemError::InvalidOptions(e.to_string()))?,
            ),
            _ => None,
        };
        let kind = ItemKind::from_parts(kind, options)?;
        Ok(NewItem::new(kind, self.question, self.answer))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("not a candidate record: {0}")]
    Malformed(String),

    #[error(transparent)]
    Invalid(#[from] ItemError),
}

/// A dropped record and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Position of the record in its batch
    pub index: usize,
    pub reason: RejectReason,
}

/// What happened to one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: Vec<ItemId>,
    pub rejected: Vec<Rejection>,
}

impl IngestReport {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Validate a batch and merge the accepted records into the store.
pub fn ingest_batch(store: &mut ItemStore, batch: Batch) -> IngestReport {
    let mut report = IngestReport::default();
    let mut drafts = Vec::with_capacity(batch.len());
    let mut positions = Vec::with_capacity(batch.len());

    for (index, value) in batch.into_iter().enumerate() {
        let draft = serde_json::from_value::<CandidateRecord>(value)
            .map_err(|e| RejectReason::Malformed(e.to_string()))
            .and_then(|candidate| candidate.into_draft().map_err(RejectReason::from));
        match draft {
            Ok(draft) => {
                drafts.push(draft);
                positions.push(index);
            }
            Err(reason) => report.rejected.push(Rejection { index, reason }),
        }
    }

    for (index, result) in positions.into_iter().zip(store.add_many(drafts)) {
        match result {
            Ok(id) => report.accepted.push(id),
            Err(e) => report.rejected.push(Rejection {
                index,
                reason: RejectReason::Invalid(e),
            }),
        }
    }
    report.rejected.sort_by_key(|r| r.index);

    log::info!(
        "Ingested batch: {} accepted, {} rejected",
        report.accepted_count(),
        report.rejected_count()
    );
    for rejection in &report.rejected {
        log::debug!("Dropped candidate #{}: {}", rejection.index, rejection.reason);
    }

    report
}

/// One signal on the ingestion channel
#[derive(Debug, Clone)]
pub struct IngestSignal {
    pub event: &'static str,
    pub batch: Batch,
}

/// Create a connected producer/consumer pair
pub fn channel() -> (IngestSender, IngestReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (IngestSender { tx }, IngestReceiver { rx })
}

/// Producer half; cheap to clone and never blocks
#[derive(Debug, Clone)]
pub struct IngestSender {
    tx: mpsc::UnboundedSender<IngestSignal>,
}

impl IngestSender {
    /// Fire a batch at the consumer. Returns false if nobody is listening.
    pub fn send(&self, batch: Batch) -> bool {
        let signal = IngestSignal {
            event: ADD_ITEMS_EVENT,
            batch,
        };
        match self.tx.send(signal) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "Dropped {} batch of {} records: receiver closed",
                    ADD_ITEMS_EVENT,
                    e.0.batch.len()
                );
                false
            }
        }
    }
}

/// Consumer half, owned by whoever owns the store
#[derive(Debug)]
pub struct IngestReceiver {
    rx: mpsc::UnboundedReceiver<IngestSignal>,
}

impl IngestReceiver {
    /// Wait for the next signal; `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<IngestSignal> {
        self.rx.recv().await
    }

    /// Apply every signal already queued, in arrival order.
    pub fn drain_into(&mut self, store: &mut ItemStore) -> Vec<IngestReport> {
        let mut reports = Vec::new();
        while let Ok(signal) = self.rx.try_recv() {
            reports.push(ingest_batch(store, signal.batch));
        }
        reports
    }

    /// Apply signals as they arrive until all senders are dropped.
    ///
    /// Returns the total number of accepted items.
    pub async fn listen(mut self, store: Arc<Mutex<ItemStore>>) -> usize {
        let mut accepted = 0;
        while let Some(signal) = self.recv().await {
            match store.lock() {
                Ok(mut store) => accepted += ingest_batch(&mut store, signal.batch).accepted_count(),
                Err(e) => log::error!("Item store lock poisoned, dropping batch: {}", e),
            }
        }
        log::debug!("{} channel closed after {} accepted items", ADD_ITEMS_EVENT, accepted);
        accepted
    }
}
