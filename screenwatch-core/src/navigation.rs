//! Drill-down navigation over the content grid
//!
//! The history stack is the only navigation state. Whether an overlay is open,
//! and which one, is read off the top of the stack, so the stack is empty
//! exactly when nothing is shown.

use crate::model::{ContentItem, ItemKind, Snapshot};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NavState<'a> {
    Closed,
    Viewing {
        item: &'a ContentItem,
        kind: ItemKind,
    },
}

impl NavState<'_> {
    pub fn is_closed(&self) -> bool {
        matches!(self, NavState::Closed)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NavigationController {
    history: Vec<ContentItem>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavState<'_> {
        match self.history.last() {
            Some(item) => NavState::Viewing {
                item,
                kind: item.kind(),
            },
            None => NavState::Closed,
        }
    }

    pub fn history(&self) -> &[ContentItem] {
        &self.history
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Show `item`. Reopening the item already on top leaves the stack as is.
    pub fn open(&mut self, item: ContentItem) {
        if self.history.last().map(|top| top.key()) == Some(item.key()) {
            tracing::debug!(name = item.name(), "item already open");
            return;
        }
        tracing::debug!(
            kind = item.kind().label(),
            name = item.name(),
            depth = self.history.len() + 1,
            "open overlay"
        );
        self.history.push(item);
    }

    pub fn close_all(&mut self) {
        if !self.history.is_empty() {
            tracing::debug!(depth = self.history.len(), "close all overlays");
        }
        self.history.clear();
    }

    /// Step out of the current overlay.
    ///
    /// Leaving an advert returns to its owning playlist, looked up by the
    /// advert's back-reference in `snapshot`; the resolved playlist replaces
    /// whatever sits below on the stack, merging with the entry under it when
    /// the two are the same playlist. Leaving a playlist, or an advert
    /// whose playlist cannot be found, closes everything.
    pub fn back(&mut self, snapshot: Option<&Snapshot>) {
        let Some(left) = self.history.pop() else {
            return;
        };
        if self.history.is_empty() {
            tracing::debug!(name = left.name(), "history consumed");
            return;
        }

        let parent = match &left {
            ContentItem::Advert(advert) => advert
                .playlist_id
                .as_ref()
                .and_then(|id| snapshot?.playlist(id)),
            ContentItem::Playlist(_) => None,
        };

        match parent {
            Some(playlist) => {
                tracing::debug!(playlist = %playlist.id, "back to owning playlist");
                let resolved = ContentItem::Playlist(playlist.clone());
                if let Some(top) = self.history.last_mut() {
                    *top = resolved;
                }
                // no two equal entries may sit next to each other
                let len = self.history.len();
                if len >= 2 && self.history[len - 1].key() == self.history[len - 2].key() {
                    self.history.pop();
                }
            }
            None => {
                tracing::debug!(name = left.name(), "no parent overlay, closing");
                self.close_all();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;
    use crate::model::{Ident, ItemKey};

    fn demo() -> Snapshot {
        snapshot(vec![
            ContentItem::Playlist(playlist(1, vec![nested(10, 10, 1), nested(11, 20, 1)])),
            ContentItem::Playlist(playlist(2, vec![nested(20, 5, 2)])),
            ContentItem::Advert(advert(30, 5)),
        ])
    }

    fn item(snap: &Snapshot, i: usize) -> ContentItem {
        snap.items()[i].clone()
    }

    fn viewing_key(nav: &NavigationController) -> Option<ItemKey> {
        match nav.state() {
            NavState::Viewing { item, .. } => Some(item.key()),
            NavState::Closed => None,
        }
    }

    #[test]
    fn test_starts_closed() {
        let nav = NavigationController::new();
        assert!(nav.state().is_closed());
        assert_eq!(nav.depth(), 0);
    }

    #[test]
    fn test_open_then_back_closes() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.open(item(&snap, 0));
        assert!(matches!(
            nav.state(),
            NavState::Viewing {
                kind: ItemKind::Playlist,
                ..
            }
        ));

        nav.back(Some(&snap));
        assert!(nav.state().is_closed());
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_back_from_nested_advert_returns_to_its_playlist() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.open(item(&snap, 0));
        nav.open(ContentItem::Advert(nested(10, 10, 1)));
        assert_eq!(nav.depth(), 2);

        nav.back(Some(&snap));
        assert_eq!(viewing_key(&nav), Some(ItemKey::Playlist(Ident::Num(1))));
        assert!(matches!(
            nav.state(),
            NavState::Viewing {
                kind: ItemKind::Playlist,
                ..
            }
        ));
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_back_resolves_parent_from_snapshot_not_stack() {
        let snap = demo();
        let mut nav = NavigationController::new();

        // advert of playlist 2 reached while playlist 1 is underneath
        nav.open(item(&snap, 0));
        nav.open(ContentItem::Advert(nested(20, 5, 2)));

        nav.back(Some(&snap));
        assert_eq!(viewing_key(&nav), Some(ItemKey::Playlist(Ident::Num(2))));
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_back_never_leaves_consecutive_duplicates() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.open(item(&snap, 1));
        nav.open(item(&snap, 0));
        nav.open(ContentItem::Advert(nested(20, 5, 2)));

        nav.back(Some(&snap));
        assert_eq!(viewing_key(&nav), Some(ItemKey::Playlist(Ident::Num(2))));
        assert_eq!(nav.depth(), 1);
        for pair in nav.history().windows(2) {
            assert_ne!(pair[0].key(), pair[1].key());
        }
    }

    #[test]
    fn test_back_with_unknown_parent_fails_open() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.open(item(&snap, 0));
        nav.open(ContentItem::Advert(nested(99, 5, 42)));

        nav.back(Some(&snap));
        assert!(nav.state().is_closed());
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_back_from_standalone_advert_over_another_item_closes() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.open(item(&snap, 0));
        nav.open(item(&snap, 2));

        nav.back(Some(&snap));
        assert!(nav.state().is_closed());
    }

    #[test]
    fn test_back_without_snapshot_closes() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.open(item(&snap, 0));
        nav.open(ContentItem::Advert(nested(10, 10, 1)));

        nav.back(None);
        assert!(nav.state().is_closed());
    }

    #[test]
    fn test_back_from_playlist_over_playlist_closes() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.open(item(&snap, 0));
        nav.open(item(&snap, 1));

        nav.back(Some(&snap));
        assert!(nav.state().is_closed());
    }

    #[test]
    fn test_back_when_closed_is_noop() {
        let mut nav = NavigationController::new();
        nav.back(None);
        assert!(nav.state().is_closed());
    }

    #[test]
    fn test_reopening_top_does_not_duplicate() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.open(item(&snap, 0));
        nav.open(item(&snap, 0));
        assert_eq!(nav.depth(), 1);

        nav.open(ContentItem::Advert(nested(10, 10, 1)));
        nav.open(item(&snap, 0));
        assert_eq!(nav.depth(), 3);
    }

    #[test]
    fn test_close_all_from_any_state() {
        let snap = demo();
        let mut nav = NavigationController::new();

        nav.close_all();
        assert!(nav.state().is_closed());

        nav.open(item(&snap, 0));
        nav.open(ContentItem::Advert(nested(11, 20, 1)));
        nav.close_all();
        assert!(nav.state().is_closed());
        assert!(nav.history().is_empty());

        nav.close_all();
        assert!(nav.state().is_closed());
    }
}
