//! In-memory item collection with write-through persistence
//!
//! The store is the single owner of the collection. Every mutation that
//! changes it serializes the whole collection and overwrites the blob.
//! Persistence failures are logged and swallowed; memory stays authoritative.

use std::collections::HashSet;

use super::filter;
use super::models::*;
use super::storage::{self, BlobStore};

/// Storage key used by the site
pub const DEFAULT_STORAGE_KEY: &str = "portfolio-quiz-items";

/// Where the collection came from at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from the persisted blob
    Restored,
    /// Nothing was persisted; seed set in use
    SeedMissing,
    /// The blob could not be read or decoded; seed set in use
    SeedCorrupt(String),
}

pub struct ItemStore {
    backend: Box<dyn BlobStore>,
    key: String,
    items: Vec<StudyItem>,
    source: LoadSource,
}

impl ItemStore {
    /// Load the collection from `backend`, falling back to the seed set.
    pub fn load(backend: Box<dyn BlobStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let (items, source) = match backend.load(&key) {
            Ok(Some(blob)) => match decode(&blob) {
                Ok(items) => {
                    log::info!("Restored {} study items from '{}'", items.len(), key);
                    (items, LoadSource::Restored)
                }
                Err(reason) => {
                    log::warn!("Stored items under '{}' are corrupt ({}), using seed set", key, reason);
                    (seed_items(), LoadSource::SeedCorrupt(reason))
                }
            },
            Ok(None) => {
                log::info!("No stored items under '{}', using seed set", key);
                (seed_items(), LoadSource::SeedMissing)
            }
            Err(e) => {
                log::warn!("Failed to read stored items under '{}': {}", key, e);
                (seed_items(), LoadSource::SeedCorrupt(e.to_string()))
            }
        };

        Self {
            backend,
            key,
            items,
            source,
        }
    }

    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All items, most recent first
    pub fn items(&self) -> &[StudyItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&StudyItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Items visible under the favorites flag
    pub fn view(&self, only_favorites: bool) -> Vec<&StudyItem> {
        filter::view(&self.items, only_favorites)
    }

    /// Add one authored item at the front of the collection.
    pub fn add(&mut self, draft: NewItem) -> Result<ItemId, ItemError> {
        let mut results = self.add_many(vec![draft]);
        results.remove(0)
    }

    /// Add several items as one block at the front, keeping their order.
    ///
    /// Each draft is validated on its own; invalid ones are skipped and their
    /// error returned in the matching slot. Persists once if anything was
    /// added.
    pub fn add_many(&mut self, drafts: Vec<NewItem>) -> Vec<Result<ItemId, ItemError>> {
        let mut taken: HashSet<ItemId> = self.items.iter().map(|item| item.id().clone()).collect();
        let mut block: Vec<StudyItem> = Vec::with_capacity(drafts.len());

        let results: Vec<Result<ItemId, ItemError>> = drafts
            .into_iter()
            .map(|draft| {
                let id = fresh_id(&taken);
                let item = StudyItem::create(id.clone(), draft)?;
                taken.insert(id.clone());
                block.push(item);
                Ok(id)
            })
            .collect();

        if !block.is_empty() {
            block.append(&mut self.items);
            self.items = block;
            self.persist();
        }

        results
    }

    /// Remove an item. Returns false (and writes nothing) if it was absent.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Flip the favorite flag, returning the new value.
    pub fn toggle_favorite(&mut self, id: &ItemId) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        item.toggle_favorite();
        let is_favorite = item.is_favorite();
        self.persist();
        Some(is_favorite)
    }

    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            log::error!("Failed to persist study items under '{}': {}", self.key, e);
        }
    }

    fn try_persist(&self) -> storage::Result<()> {
        let blob = serde_json::to_string(&self.items)?;
        self.backend.save(&self.key, &blob)
    }
}

fn fresh_id(taken: &HashSet<ItemId>) -> ItemId {
    loop {
        let id = ItemId::generate();
        if !taken.contains(&id) {
            return id;
        }
    }
}

fn decode(blob: &str) -> Result<Vec<StudyItem>, String> {
    let items: Vec<StudyItem> = serde_json::from_str(blob).map_err(|e| e.to_string())?;
    ensure_unique_ids(&items).map_err(|e| e.to_string())?;
    Ok(items)
}
