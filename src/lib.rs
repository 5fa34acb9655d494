pub mod config;
pub mod quiz;

use config::{ConfigError, EngineConfig};
use quiz::{
    FilterView, IngestReceiver, IngestReport, IngestSender, ItemStore, StudyItem, StudySession,
};

/// Everything one study surface owns: the store, the favorites toggle, the
/// session machine and the consumer end of the ingestion channel.
///
/// All mutation happens through `&mut self`, one step at a time.
pub struct StudyDeck {
    pub store: ItemStore,
    pub filter: FilterView,
    pub session: StudySession,
    ingest_tx: IngestSender,
    ingest_rx: IngestReceiver,
}

impl StudyDeck {
    pub fn new(store: ItemStore, only_favorites: bool) -> Self {
        let (ingest_tx, ingest_rx) = quiz::ingest::channel();
        Self {
            store,
            filter: FilterView::new(only_favorites),
            session: StudySession::new(),
            ingest_tx,
            ingest_rx,
        }
    }

    /// Open the file-backed deck described by `config`
    pub fn open(config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.open_store()?, config.only_favorites))
    }

    /// Producer handle for the `add-quiz-items` channel
    pub fn ingest_sender(&self) -> IngestSender {
        self.ingest_tx.clone()
    }

    /// Apply queued ingestion signals to the store.
    ///
    /// A running session keeps its snapshot; new items show up next time.
    pub fn pump_ingestion(&mut self) -> Vec<IngestReport> {
        self.ingest_rx.drain_into(&mut self.store)
    }

    /// Items under the current filter
    pub fn visible(&self) -> Vec<&StudyItem> {
        self.filter.apply(self.store.items())
    }

    /// Enter study mode over the current filter
    pub fn start_session(&mut self) -> bool {
        let visible = self.filter.apply(self.store.items());
        self.session.start(&visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz::{ItemId, MemoryBlobStore, SessionMode, DEFAULT_STORAGE_KEY};
    use serde_json::json;

    fn deck(only_favorites: bool) -> StudyDeck {
        let store = ItemStore::load(Box::new(MemoryBlobStore::new()), DEFAULT_STORAGE_KEY);
        StudyDeck::new(store, only_favorites)
    }

    #[test]
    fn test_ingestion_mid_session_keeps_snapshot() {
        let mut deck = deck(false);
        assert!(deck.start_session());
        deck.session.next();

        let sender = deck.ingest_sender();
        sender.send(vec![
            json!({"kind": "essay", "question": "New one", "answer": "a"}),
            json!({"kind": "essay", "question": "", "answer": "a"}),
        ]);
        let reports = deck.pump_ingestion();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].accepted_count(), 1);
        assert_eq!(reports[0].rejected_count(), 1);
        assert_eq!(deck.store.len(), 4);

        assert_eq!(deck.session.snapshot().len(), 3);
        assert_eq!(deck.session.cursor(), Some(1));
        assert_eq!(deck.session.current().unwrap().id().as_str(), "2");

        deck.session.exit();
        assert!(deck.start_session());
        assert_eq!(deck.session.snapshot().len(), 4);
        assert_eq!(deck.session.current().unwrap().question(), "New one");
    }

    #[test]
    fn test_favorites_filter_guards_session() {
        let mut deck = deck(true);
        assert_eq!(deck.visible().len(), 1);

        deck.store.toggle_favorite(&ItemId::from("1"));
        assert!(deck.visible().is_empty());
        assert!(!deck.start_session());
        assert_eq!(deck.session.mode(), SessionMode::Browsing);

        deck.filter.toggle();
        assert!(deck.start_session());
        assert_eq!(deck.session.snapshot().len(), 3);
    }

    #[test]
    fn test_store_changes_do_not_touch_snapshot() {
        let mut deck = deck(false);
        assert!(deck.start_session());

        deck.store.remove(&ItemId::from("1"));
        deck.store.toggle_favorite(&ItemId::from("2"));

        assert_eq!(deck.session.snapshot().len(), 3);
        assert_eq!(deck.session.current().unwrap().id().as_str(), "1");
        assert!(!deck.session.snapshot()[1].is_favorite());
    }
}
