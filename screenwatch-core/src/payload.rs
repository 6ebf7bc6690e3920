//! Wire format of the player's `dataJson` endpoint
//!
//! The endpoint marks item variants by field presence. That is resolved here,
//! once, into [`ContentItem`]; nothing past this module probes fields.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::model::{
    Advert, AssetRef, ContentItem, Ident, Playlist, ProfileInfo, Schedule, ScreenInfo, Snapshot,
    Timestamp,
};

/// Position of an item in the payload, used in error reports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemPath {
    pub index: usize,
    pub child: Option<usize>,
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.child {
            Some(child) => write!(f, "item {} advert {}", self.index, child),
            None => write!(f, "item {}", self.index),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response carries no data")]
    MissingData,
    #[error("malformed content at {at}: {reason}")]
    MalformedItem { at: ItemPath, reason: &'static str },
}

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub error: bool,
    #[serde(default, rename = "errorMsg")]
    pub error_msg: String,
    #[serde(default)]
    data: Option<Outer>,
}

#[derive(Debug, Deserialize)]
struct Outer {
    data: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    data: Vec<RawItem>,
    #[serde(default)]
    screen: RawScreen,
    #[serde(default)]
    profile: RawProfile,
}

#[derive(Debug, Default, Deserialize)]
struct RawItem {
    adverts_id: Option<Ident>,
    adverts_name: Option<String>,
    playlist_name: Option<String>,
    advert_playlist_id: Option<Ident>,
    adverts_start_time: Option<String>,
    adverts_end_time: Option<String>,
    adverts_file_name: Option<String>,
    adverts_file_name_unique: Option<String>,
    adverts_refresh_time: Option<u32>,
    timeings: Option<Vec<RawSchedule>>,
    #[serde(rename = "Adverts")]
    adverts: Option<Vec<RawItem>>,
}

#[derive(Debug, Deserialize)]
struct RawSchedule {
    adverts_schedule_starthour: u8,
    adverts_schedule_startmin: u8,
    adverts_schedule_endhour: u8,
    adverts_schedule_endmin: u8,
    #[serde(default)]
    adverts_schedule_days: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawScreen {
    user_screens_user_id: Option<Ident>,
    user_screens_mediaplayer_id: Option<Ident>,
    screen_height: Option<u32>,
    screen_width: Option<u32>,
    user_screens_last_publish: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    mute_audio: Option<i64>,
    audio_volume: Option<serde_json::Number>,
}

impl Envelope {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Convert the envelope body into a snapshot, validating every item's
    /// discriminant. Remote errors (`error: true`) are the caller's concern.
    pub fn into_snapshot(self) -> Result<Snapshot, PayloadError> {
        let body = self.data.ok_or(PayloadError::MissingData)?.data;

        let items = body
            .data
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_item(index))
            .collect::<Result<Vec<_>, _>>()?;

        let screen = ScreenInfo {
            user_id: body.screen.user_screens_user_id,
            mediaplayer_id: body.screen.user_screens_mediaplayer_id,
            height_px: body.screen.screen_height,
            width_px: body.screen.screen_width,
            last_publish: body
                .screen
                .user_screens_last_publish
                .as_deref()
                .and_then(parse_timestamp),
        };
        let profile = ProfileInfo {
            mute_audio: body.profile.mute_audio,
            audio_volume: body.profile.audio_volume,
        };

        Ok(Snapshot::new(items, screen, profile))
    }
}

/// Decode a full response body straight into a snapshot
pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, PayloadError> {
    Envelope::from_slice(bytes)?.into_snapshot()
}

impl RawItem {
    fn into_item(self, index: usize) -> Result<ContentItem, PayloadError> {
        let at = ItemPath { index, child: None };

        if self.adverts_id.is_some() {
            return Ok(ContentItem::Advert(self.into_advert(at, None)?));
        }

        let Some(id) = self.advert_playlist_id else {
            return Err(PayloadError::MalformedItem {
                at,
                reason: "neither an advert id nor a playlist id",
            });
        };

        let adverts = self
            .adverts
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(child, raw)| {
                raw.into_advert(
                    ItemPath {
                        index,
                        child: Some(child),
                    },
                    Some(&id),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ContentItem::Playlist(Playlist {
            name: self.playlist_name.unwrap_or_default(),
            id,
            adverts,
        }))
    }

    fn into_advert(self, at: ItemPath, parent: Option<&Ident>) -> Result<Advert, PayloadError> {
        let Some(id) = self.adverts_id else {
            return Err(PayloadError::MalformedItem {
                at,
                reason: "playlist entry is not an advert",
            });
        };
        if self.adverts.is_some() {
            return Err(PayloadError::MalformedItem {
                at,
                reason: "advert carries a nested advert list",
            });
        }

        let asset = self.adverts_file_name.map(|file_name| AssetRef {
            file_name,
            unique_name: self.adverts_file_name_unique,
        });

        let schedules = self
            .timeings
            .unwrap_or_default()
            .into_iter()
            .map(|t| Schedule {
                start_hour: t.adverts_schedule_starthour,
                start_minute: t.adverts_schedule_startmin,
                end_hour: t.adverts_schedule_endhour,
                end_minute: t.adverts_schedule_endmin,
                days: t.adverts_schedule_days,
            })
            .collect();

        Ok(Advert {
            id,
            name: self.adverts_name.unwrap_or_default(),
            asset,
            start: self.adverts_start_time.as_deref().and_then(parse_timestamp),
            end: self.adverts_end_time.as_deref().and_then(parse_timestamp),
            refresh_minutes: self.adverts_refresh_time.unwrap_or(0),
            schedules,
            // nested adverts that omit the key still belong to their playlist
            playlist_id: self.advert_playlist_id.or_else(|| parent.cloned()),
        })
    }
}

/// Parse the timestamp shapes the player emits. Naive values are taken as UTC.
/// Empty strings are absent; anything unparseable is absent and logged.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }

    tracing::warn!(value = raw, "ignoring unparseable timestamp");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemKind, fixtures::ts};

    const SAMPLE: &str = r#"{
        "error": false,
        "errorMsg": "",
        "data": { "data": {
            "data": [
                {
                    "advert_playlist_id": 3,
                    "playlist_name": "Morning",
                    "Adverts": [
                        { "adverts_id": 30, "adverts_name": "Coffee", "adverts_refresh_time": 10,
                          "adverts_start_time": "2023-10-02T00:00:00.000Z",
                          "adverts_end_time": "2023-10-05T00:00:00.000Z" },
                        { "adverts_id": 31, "adverts_name": "Bagels", "adverts_refresh_time": 20,
                          "advert_playlist_id": 3 }
                    ]
                },
                {
                    "adverts_id": 40,
                    "adverts_name": "Sale",
                    "adverts_refresh_time": 5,
                    "adverts_file_name": "sale.png",
                    "adverts_file_name_unique": "a1b2-sale.png",
                    "adverts_start_time": "2023-10-01 08:00:00",
                    "adverts_end_time": "",
                    "timeings": [
                        { "adverts_schedule_starthour": 9, "adverts_schedule_startmin": 5,
                          "adverts_schedule_endhour": 17, "adverts_schedule_endmin": 30,
                          "adverts_schedule_days": ["Mon", "Tue"] }
                    ]
                }
            ],
            "screen": {
                "user_screens_user_id": 12,
                "user_screens_mediaplayer_id": "mp-77",
                "screen_height": 1080,
                "screen_width": 1920,
                "user_screens_last_publish": "2023-09-30"
            },
            "profile": { "mute_audio": 1, "audio_volume": 40 }
        } }
    }"#;

    #[test]
    fn test_decode_sample_payload() {
        let snap = decode_snapshot(SAMPLE.as_bytes()).unwrap();
        assert_eq!(snap.items().len(), 2);
        assert_eq!(snap.items()[0].kind(), ItemKind::Playlist);
        assert_eq!(snap.items()[1].kind(), ItemKind::Advert);

        let ContentItem::Playlist(p) = &snap.items()[0] else {
            panic!("expected playlist");
        };
        assert_eq!(p.name, "Morning");
        assert_eq!(p.adverts.len(), 2);
        // back-reference filled from the owning playlist when omitted
        assert_eq!(p.adverts[0].playlist_id, Some(Ident::Num(3)));
        assert_eq!(p.adverts[0].start, Some(ts(2023, 10, 2)));

        let ContentItem::Advert(a) = &snap.items()[1] else {
            panic!("expected advert");
        };
        assert_eq!(a.playlist_id, None);
        assert_eq!(a.end, None);
        assert_eq!(a.schedules.len(), 1);
        assert_eq!(a.schedules[0].days, vec!["Mon", "Tue"]);
        assert_eq!(
            a.asset.as_ref().and_then(|f| f.unique_name.as_deref()),
            Some("a1b2-sale.png")
        );

        assert_eq!(snap.screen().mediaplayer_id, Some(Ident::from("mp-77")));
        assert_eq!(snap.screen().width_px, Some(1920));
        assert_eq!(snap.screen().last_publish, Some(ts(2023, 9, 30)));
        assert!(snap.profile().is_muted());
    }

    #[test]
    fn test_item_without_discriminant_is_rejected() {
        let body = r#"{ "data": { "data": { "data": [
            { "adverts_id": 1 },
            { "playlist_name": "orphan" }
        ] } } }"#;

        let err = decode_snapshot(body.as_bytes()).unwrap_err();
        match err {
            PayloadError::MalformedItem { at, .. } => {
                assert_eq!(at, ItemPath { index: 1, child: None })
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_playlist_child_must_be_advert() {
        let body = r#"{ "data": { "data": { "data": [
            { "advert_playlist_id": 2, "Adverts": [ { "adverts_id": 1 }, { "advert_playlist_id": 9 } ] }
        ] } } }"#;

        let err = decode_snapshot(body.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::MalformedItem {
                at: ItemPath {
                    index: 0,
                    child: Some(1)
                },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_data_is_an_error() {
        let body = r#"{ "error": false, "errorMsg": "" }"#;
        assert!(matches!(
            decode_snapshot(body.as_bytes()),
            Err(PayloadError::MissingData)
        ));
    }

    #[test]
    fn test_remote_error_flag_is_preserved() {
        let body = r#"{ "error": true, "errorMsg": "screen not registered" }"#;
        let env = Envelope::from_slice(body.as_bytes()).unwrap();
        assert!(env.error);
        assert_eq!(env.error_msg, "screen not registered");
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        assert_eq!(parse_timestamp("2023-10-01"), Some(ts(2023, 10, 1)));
        assert_eq!(parse_timestamp("2023-10-01T00:00:00Z"), Some(ts(2023, 10, 1)));
        assert_eq!(parse_timestamp("2023-10-01 00:00:00"), Some(ts(2023, 10, 1)));
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("next tuesday"), None);
    }
}
