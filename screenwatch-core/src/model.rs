use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Timestamp = DateTime<Utc>;

/// Identifier as it appears on the wire: players emit numbers, some exports
/// emit strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ident {
    Num(i64),
    Text(String),
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for Ident {
    fn from(n: i64) -> Self {
        Ident::Num(n)
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident::Text(s.to_string())
    }
}

/// Recurring weekly activation window of a single advert
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
    pub days: Vec<String>,
}

/// Content file attached to an advert
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRef {
    /// Name the file was uploaded with
    pub file_name: String,
    /// Name the player stores it under; this is what resolves to an image path
    pub unique_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Advert {
    pub id: Ident,
    pub name: String,
    pub asset: Option<AssetRef>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    /// Refresh duration in minutes; absent on the wire means 0
    pub refresh_minutes: u32,
    pub schedules: Vec<Schedule>,
    /// Back-reference to the owning playlist, present only for nested adverts
    pub playlist_id: Option<Ident>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Playlist {
    pub id: Ident,
    pub name: String,
    pub adverts: Vec<Advert>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Advert,
    Playlist,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Advert => "Advert",
            ItemKind::Playlist => "Playlist",
        }
    }
}

/// Identity of a content item, used to detect repeated opens of the same item
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Advert(Ident),
    Playlist(Ident),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContentItem {
    Advert(Advert),
    Playlist(Playlist),
}

impl ContentItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            ContentItem::Advert(_) => ItemKind::Advert,
            ContentItem::Playlist(_) => ItemKind::Playlist,
        }
    }

    pub fn key(&self) -> ItemKey {
        match self {
            ContentItem::Advert(a) => ItemKey::Advert(a.id.clone()),
            ContentItem::Playlist(p) => ItemKey::Playlist(p.id.clone()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ContentItem::Advert(a) => &a.name,
            ContentItem::Playlist(p) => &p.name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenInfo {
    pub user_id: Option<Ident>,
    pub mediaplayer_id: Option<Ident>,
    pub height_px: Option<u32>,
    pub width_px: Option<u32>,
    pub last_publish: Option<Timestamp>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileInfo {
    /// Raw 0/1 flag; only 1 means muted
    pub mute_audio: Option<i64>,
    pub audio_volume: Option<serde_json::Number>,
}

impl ProfileInfo {
    pub fn is_muted(&self) -> bool {
        self.mute_audio == Some(1)
    }
}

/// Where a content item lives inside a snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemRef {
    /// Position in the top-level grid
    TopLevel(usize),
    /// Position inside a playlist's advert list
    Nested { playlist: Ident, index: usize },
}

/// One complete fetch result for a screen. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    items: Vec<ContentItem>,
    screen: ScreenInfo,
    profile: ProfileInfo,
    playlist_index: HashMap<Ident, usize>,
}

impl Snapshot {
    pub fn new(items: Vec<ContentItem>, screen: ScreenInfo, profile: ProfileInfo) -> Self {
        let mut playlist_index = HashMap::new();
        for (pos, item) in items.iter().enumerate() {
            if let ContentItem::Playlist(p) = item {
                // first playlist in snapshot order wins on duplicate ids
                playlist_index.entry(p.id.clone()).or_insert(pos);
            }
        }

        Self {
            items,
            screen,
            profile,
            playlist_index,
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn screen(&self) -> &ScreenInfo {
        &self.screen
    }

    pub fn profile(&self) -> &ProfileInfo {
        &self.profile
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Top-level playlist with the given id
    pub fn playlist(&self, id: &Ident) -> Option<&Playlist> {
        let pos = *self.playlist_index.get(id)?;
        match self.items.get(pos) {
            Some(ContentItem::Playlist(p)) => Some(p),
            _ => None,
        }
    }

    /// Every advert reachable from the snapshot, standalone ones and those
    /// nested in playlists, in snapshot order.
    pub fn adverts(&self) -> impl Iterator<Item = &Advert> {
        self.items.iter().flat_map(|item| match item {
            ContentItem::Advert(a) => std::slice::from_ref(a).iter(),
            ContentItem::Playlist(p) => p.adverts.iter(),
        })
    }

    pub fn resolve(&self, at: &ItemRef) -> Option<ContentItem> {
        match at {
            ItemRef::TopLevel(index) => self.items.get(*index).cloned(),
            ItemRef::Nested { playlist, index } => self
                .playlist(playlist)?
                .adverts
                .get(*index)
                .cloned()
                .map(ContentItem::Advert),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_playlist_lookup_prefers_first_in_order() {
        let mut second = playlist(7, vec![nested(2, 5, 7)]);
        second.name = "second".into();
        let snap = snapshot(vec![
            ContentItem::Advert(advert(1, 1)),
            ContentItem::Playlist(playlist(7, vec![])),
            ContentItem::Playlist(second),
        ]);

        let found = snap.playlist(&Ident::Num(7)).unwrap();
        assert_eq!(found.name, "playlist-7");
        assert!(snap.playlist(&Ident::Num(8)).is_none());
    }

    #[test]
    fn test_adverts_walks_nested_items() {
        let snap = snapshot(vec![
            ContentItem::Playlist(playlist(1, vec![nested(10, 1, 1), nested(11, 1, 1)])),
            ContentItem::Advert(advert(12, 1)),
        ]);

        let ids: Vec<Ident> = snap.adverts().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec![Ident::Num(10), Ident::Num(11), Ident::Num(12)]);
    }

    #[test]
    fn test_resolve_item_refs() {
        let snap = snapshot(vec![
            ContentItem::Playlist(playlist(1, vec![nested(10, 1, 1)])),
            ContentItem::Advert(advert(12, 1)),
        ]);

        assert_eq!(
            snap.resolve(&ItemRef::TopLevel(1)).map(|i| i.key()),
            Some(ItemKey::Advert(Ident::Num(12)))
        );
        assert_eq!(
            snap.resolve(&ItemRef::Nested {
                playlist: Ident::Num(1),
                index: 0
            })
            .map(|i| i.key()),
            Some(ItemKey::Advert(Ident::Num(10)))
        );
        assert!(snap.resolve(&ItemRef::TopLevel(5)).is_none());
        assert!(
            snap.resolve(&ItemRef::Nested {
                playlist: Ident::Num(2),
                index: 0
            })
            .is_none()
        );
    }

    #[test]
    fn test_ident_display() {
        assert_eq!(Ident::Num(42).to_string(), "42");
        assert_eq!(Ident::from("mp-1").to_string(), "\"mp-1\"");
    }
}
