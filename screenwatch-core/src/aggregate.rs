//! Derived figures over a snapshot: run-time totals and active-window bounds

use chrono::NaiveDate;

use crate::model::{Advert, ContentItem, Snapshot, Timestamp};

/// Minutes an item occupies in the rotation. Widened so that summing any
/// number of `u32` refresh times cannot overflow.
pub fn run_time(item: &ContentItem) -> u64 {
    match item {
        ContentItem::Advert(a) => advert_run_time(a),
        ContentItem::Playlist(p) => p.adverts.iter().map(advert_run_time).sum(),
    }
}

fn advert_run_time(advert: &Advert) -> u64 {
    u64::from(advert.refresh_minutes)
}

/// Sum over top-level items; playlists already fold in their children
pub fn total_run_time(snapshot: &Snapshot) -> u64 {
    snapshot.items().iter().map(run_time).sum()
}

/// Earliest start and latest end across every advert in a snapshot.
/// Either bound is `None` when no advert carries that timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub earliest: Option<Timestamp>,
    pub latest: Option<Timestamp>,
}

impl TimeWindow {
    pub fn is_unbounded(&self) -> bool {
        self.earliest.is_none() && self.latest.is_none()
    }

    /// Date range for the calendar overview, falling back per bound
    pub fn calendar_range(&self, fallback: (NaiveDate, NaiveDate)) -> (NaiveDate, NaiveDate) {
        (
            self.earliest.map(|t| t.date_naive()).unwrap_or(fallback.0),
            self.latest.map(|t| t.date_naive()).unwrap_or(fallback.1),
        )
    }
}

pub fn time_window(snapshot: &Snapshot) -> TimeWindow {
    snapshot
        .adverts()
        .fold(TimeWindow::default(), |mut window, advert| {
            if let Some(start) = advert.start {
                window.earliest = Some(window.earliest.map_or(start, |e| e.min(start)));
            }
            if let Some(end) = advert.end {
                window.latest = Some(window.latest.map_or(end, |l| l.max(end)));
            }
            window
        })
}
