use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use studydeck_lib::config::EngineConfig;
use studydeck_lib::quiz::{ItemId, LoadSource, StudyItem};
use studydeck_lib::StudyDeck;

/// Shared application state for CLI commands
pub struct App {
    pub config: EngineConfig,
    pub deck: StudyDeck,
}

impl App {
    /// Load config (explicit path or default location) and open the deck
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => match EngineConfig::default_path() {
                Some(path) => EngineConfig::load(&path).context("Failed to load config")?,
                None => EngineConfig::default(),
            },
        };
        if data_dir.is_some() {
            config.data_dir = data_dir;
        }

        let deck = StudyDeck::open(&config).context("Failed to open study deck")?;
        if let LoadSource::SeedCorrupt(reason) = deck.store.source() {
            eprintln!(
                "Warning: items stored under '{}' were unreadable ({}); starting from the sample set.",
                deck.store.key(),
                reason
            );
        }

        Ok(Self { config, deck })
    }

    /// Find an item by exact id, or by unique id prefix
    pub fn resolve_id(&self, id: &str) -> Result<ItemId> {
        match_id(self.deck.store.items(), id)
    }

    /// Items under the deck's filter, with `favorites` forcing it on
    pub fn visible(&mut self, favorites: bool) -> Vec<&StudyItem> {
        if favorites {
            self.deck.filter.only_favorites = true;
        }
        self.deck.visible()
    }
}

fn match_id(items: &[StudyItem], id: &str) -> Result<ItemId> {
    let id = id.trim();
    if id.is_empty() {
        bail!("Item id is empty");
    }

    // Exact match first
    if let Some(item) = items.iter().find(|i| i.id().as_str() == id) {
        return Ok(item.id().clone());
    }

    let matches: Vec<&StudyItem> = items
        .iter()
        .filter(|i| i.id().as_str().starts_with(id))
        .collect();
    match matches.as_slice() {
        [] => bail!("No item matches '{}'", id),
        [only] => Ok(only.id().clone()),
        _ => bail!(
            "Ambiguous item id '{}'. Matches:\n{}",
            id,
            matches
                .iter()
                .map(|i| format!("  - {} {}", i.id(), i.question()))
                .collect::<Vec<_>>()
                .join("\n")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studydeck_lib::quiz::{ItemKind, NewItem};
    use tempfile::TempDir;

    fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let app = App::new(Some(&config_path), Some(temp_dir.path().join("data"))).unwrap();
        (app, temp_dir)
    }

    fn seeded_with(ids: &[&str]) -> Vec<StudyItem> {
        let blob: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "kind": "essay", "question": format!("q {id}"), "answer": "a"}))
            .collect();
        serde_json::from_value(serde_json::Value::Array(blob)).unwrap()
    }

    #[test]
    fn test_match_id_exact_and_prefix() {
        let items = seeded_with(&["abc1", "abd2", "abc"]);
        assert_eq!(match_id(&items, "abc").unwrap().as_str(), "abc");
        assert_eq!(match_id(&items, "abd").unwrap().as_str(), "abd2");
    }

    #[test]
    fn test_match_id_ambiguous_prefix() {
        let items = seeded_with(&["abc1", "abc2"]);
        let err = match_id(&items, "ab").unwrap_err().to_string();
        assert!(err.starts_with("Ambiguous item id 'ab'"));
        assert!(err.contains("abc1") && err.contains("abc2"));
    }

    #[test]
    fn test_match_id_empty_and_missing() {
        let items = seeded_with(&["only"]);
        assert_eq!(match_id(&items, "").unwrap_err().to_string(), "Item id is empty");
        assert_eq!(match_id(&items, "  ").unwrap_err().to_string(), "Item id is empty");
        assert_eq!(match_id(&items, "zz").unwrap_err().to_string(), "No item matches 'zz'");
    }

    #[test]
    fn test_visible_goes_through_deck_filter() {
        let (mut app, _temp_dir) = create_test_app();
        app.deck
            .store
            .add(NewItem::new(ItemKind::Essay, "Unstarred", "a"))
            .unwrap();
        assert_eq!(app.visible(false).len(), 4);

        assert_eq!(app.visible(true).len(), 1);
        assert!(app.deck.filter.only_favorites);
        assert_eq!(app.deck.visible().len(), 1);
    }
}
