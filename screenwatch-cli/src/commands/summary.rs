use std::fmt::Write as _;
use std::sync::Arc;

use screenwatch_core::aggregate::{run_time, time_window, total_run_time};
use screenwatch_core::config::DashboardConfig;
use screenwatch_core::format::{format_date, format_datetime, format_hhmm, mute_label};
use screenwatch_core::model::{ContentItem, Snapshot};
use screenwatch_core::source::SnapshotSource;
use screenwatch_core::store::FETCH_FAILED_MESSAGE;

/// Fetch once and print the dashboard figures as plain text
pub async fn run_summary(
    source: Arc<dyn SnapshotSource>,
    config: &DashboardConfig,
) -> Result<(), String> {
    match source.fetch().await {
        Ok(snapshot) => {
            print!("{}", render_summary(&snapshot, config));
            Ok(())
        }
        Err(e) => {
            tracing::warn!(source = %source.name(), error = %e, "summary fetch failed");
            Err(format!("{} ({})", FETCH_FAILED_MESSAGE, e))
        }
    }
}

fn render_summary(snapshot: &Snapshot, config: &DashboardConfig) -> String {
    let mut out = String::new();
    let screen = snapshot.screen();
    let na = |v: Option<String>| v.unwrap_or_else(|| "N/A".into());

    let _ = writeln!(out, "{}", config.team_label);
    let _ = writeln!(
        out,
        "  Client ID: {}   MP ID: {}",
        na(screen.user_id.as_ref().map(|i| i.to_string())),
        na(screen.mediaplayer_id.as_ref().map(|i| i.to_string())),
    );
    let _ = writeln!(
        out,
        "  Height: {}   Width: {}",
        na(screen.height_px.map(|h| format!("{}px", h))),
        na(screen.width_px.map(|w| format!("{}px", w))),
    );
    let _ = writeln!(out, "  Last Sync: {}", format_date(screen.last_publish));
    let _ = writeln!(out, "  Run Time: {}", format_hhmm(total_run_time(snapshot)));

    let profile = snapshot.profile();
    let _ = writeln!(
        out,
        "  Mute: {}   Audio Volume: {}",
        mute_label(profile.is_muted()),
        na(profile.audio_volume.as_ref().map(|v| v.to_string())),
    );

    let window = time_window(snapshot);
    let _ = writeln!(
        out,
        "  Active: {} to {}",
        format_datetime(window.earliest),
        format_datetime(window.latest)
    );

    let _ = writeln!(out);
    if snapshot.is_empty() {
        let _ = writeln!(out, "No data available");
        return out;
    }
    for item in snapshot.items() {
        let _ = writeln!(
            out,
            "  {:<8} {:<32} {}",
            item.kind().label(),
            item.name(),
            format_hhmm(run_time(item))
        );
        if let ContentItem::Playlist(p) = item {
            for advert in &p.adverts {
                let _ = writeln!(
                    out,
                    "    - {:<32} {}",
                    advert.name,
                    format_hhmm(u64::from(advert.refresh_minutes))
                );
            }
        }
    }
    out
}
