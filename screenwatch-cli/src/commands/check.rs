use std::path::Path;

use screenwatch_core::aggregate::{time_window, total_run_time};
use screenwatch_core::format::{format_datetime, format_hhmm};
use screenwatch_core::model::{ContentItem, Snapshot};
use screenwatch_core::source::snapshot_from_body;

#[derive(Debug)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl Check {
    fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            hint: None,
        }
    }

    fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Validate a saved payload without starting the dashboard
pub fn run_check(path: &Path) -> Result<(), String> {
    println!("Checking {}\n", path.display());

    let bytes = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let checks = check_payload(&bytes);
    for check in &checks {
        print_check(check);
    }
    println!();

    let failed = checks.iter().filter(|c| !c.passed).count();
    if failed == 0 {
        println!("Payload is valid.");
        Ok(())
    } else {
        Err(format!("{} check(s) failed", failed))
    }
}

fn check_payload(bytes: &[u8]) -> Vec<Check> {
    let snapshot = match snapshot_from_body(bytes) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            return vec![
                Check::fail("payload", e.to_string())
                    .with_hint("every item needs adverts_id or advert_playlist_id"),
            ];
        }
    };

    let mut checks = vec![Check::ok("payload", "decoded")];
    checks.push(content_check(&snapshot));
    checks.push(Check::ok(
        "run time",
        format!("{} total", format_hhmm(total_run_time(&snapshot))),
    ));

    let window = time_window(&snapshot);
    if window.is_unbounded() {
        checks.push(
            Check::ok("time window", "no advert carries a start or end date")
                .with_hint("the calendar will show the configured fallback range"),
        );
    } else {
        checks.push(Check::ok(
            "time window",
            format!(
                "{} to {}",
                format_datetime(window.earliest),
                format_datetime(window.latest)
            ),
        ));
    }

    checks
}

fn content_check(snapshot: &Snapshot) -> Check {
    if snapshot.is_empty() {
        return Check::ok("content", "no items").with_hint("the dashboard will show no data");
    }

    let (mut playlists, mut standalone) = (0, 0);
    for item in snapshot.items() {
        match item {
            ContentItem::Playlist(_) => playlists += 1,
            ContentItem::Advert(_) => standalone += 1,
        }
    }
    let nested = snapshot.adverts().count() - standalone;
    Check::ok(
        "content",
        format!(
            "{} playlist(s), {} standalone advert(s), {} nested advert(s)",
            playlists, standalone, nested
        ),
    )
}

fn print_check(check: &Check) {
    let icon = if check.passed { "✓" } else { "✗" };
    let color = if check.passed { "\x1b[32m" } else { "\x1b[31m" };
    let reset = "\x1b[0m";

    println!(
        "  {}{}{} {}: {}",
        color, icon, reset, check.name, check.message
    );

    if let Some(hint) = &check.hint {
        println!("    └─ {}", hint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "error": false,
        "data": { "data": { "data": [
            { "advert_playlist_id": 7, "playlist_name": "Morning",
              "Adverts": [ { "adverts_id": 1, "adverts_name": "a", "adverts_refresh_time": 10 } ] },
            { "adverts_id": 2, "adverts_name": "b", "adverts_refresh_time": 5,
              "adverts_start_time": "2023-10-01T00:00:00Z" }
        ] } }
    }"#;

    #[test]
    fn test_valid_payload_passes() {
        let checks = check_payload(VALID.as_bytes());
        assert!(checks.iter().all(|c| c.passed), "{checks:?}");

        let content = checks.iter().find(|c| c.name == "content").unwrap();
        assert_eq!(
            content.message,
            "1 playlist(s), 1 standalone advert(s), 1 nested advert(s)"
        );
        let run_time = checks.iter().find(|c| c.name == "run time").unwrap();
        assert_eq!(run_time.message, "00:15 total");
    }

    #[test]
    fn test_item_without_discriminant_fails() {
        let body = r#"{ "data": { "data": { "data": [ { "adverts_name": "x" } ] } } }"#;
        let checks = check_payload(body.as_bytes());
        assert_eq!(checks.len(), 1);
        assert!(!checks[0].passed);
        assert!(checks[0].hint.is_some());
    }
}
