//! Display formatting shared by the TUI and the plain-text summary

use crate::model::{AssetRef, Timestamp};

/// `HH:MM`, hours unbounded
pub fn format_hhmm(minutes: u64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// `Oct 2, 2023`, or `N/A` when absent
pub fn format_date(at: Option<Timestamp>) -> String {
    match at {
        Some(t) => t.format("%b %-d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// `2023-10-01 16:00 UTC`, or `N/A` when absent
pub fn format_datetime(at: Option<Timestamp>) -> String {
    match at {
        Some(t) => t.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "N/A".to_string(),
    }
}

/// Schedule clock time: hour unpadded, minute padded (`9:05`)
pub fn format_clock(hour: u8, minute: u8) -> String {
    format!("{}:{:02}", hour, minute)
}

pub fn mute_label(muted: bool) -> &'static str {
    if muted { "Yes" } else { "No" }
}

/// Image path for an advert's content file, if it has a stored name
pub fn asset_path(prefix: &str, asset: &AssetRef) -> Option<String> {
    let unique = asset.unique_name.as_deref()?;
    if prefix.ends_with('/') {
        Some(format!("{}{}", prefix, unique))
    } else {
        Some(format!("{}/{}", prefix, unique))
    }
}
