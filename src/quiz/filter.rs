//! Read-only projection of the collection

use super::models::StudyItem;

/// Items to show, in collection order.
///
/// With `only_favorites` set, only favorited items are kept; otherwise every
/// item is returned.
pub fn view(items: &[StudyItem], only_favorites: bool) -> Vec<&StudyItem> {
    items
        .iter()
        .filter(|item| !only_favorites || item.is_favorite())
        .collect()
}

/// The favorites toggle a UI surface holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterView {
    pub only_favorites: bool,
}

impl FilterView {
    pub fn new(only_favorites: bool) -> Self {
        Self { only_favorites }
    }

    pub fn toggle(&mut self) {
        self.only_favorites = !self.only_favorites;
    }

    pub fn apply<'a>(&self, items: &'a [StudyItem]) -> Vec<&'a StudyItem> {
        view(items, self.only_favorites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::models::seed_items;

    #[test]
    fn test_unfiltered_view_is_whole_collection() {
        let items = seed_items();
        let visible = view(&items, false);
        assert_eq!(visible.len(), items.len());
        for (shown, item) in visible.iter().zip(&items) {
            assert_eq!(*shown, item);
        }
    }

    #[test]
    fn test_favorites_only() {
        let items = seed_items();
        let before = items.clone();

        let visible = view(&items, true);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].question(), "Innovation");
        assert_eq!(items, before);
    }

    #[test]
    fn test_filter_view_toggle() {
        let items = seed_items();
        let mut filter = FilterView::default();
        assert_eq!(filter.apply(&items).len(), 3);

        filter.toggle();
        assert!(filter.only_favorites);
        assert_eq!(filter.apply(&items).len(), 1);
    }

    #[test]
    fn test_empty_favorites_view() {
        let mut items = seed_items();
        items[0].toggle_favorite();
        assert!(view(&items, true).is_empty());
    }
}
