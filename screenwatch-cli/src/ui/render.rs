use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use screenwatch_core::aggregate::run_time;
use screenwatch_core::format::{
    asset_path, format_clock, format_date, format_datetime, format_hhmm, mute_label,
};
use screenwatch_core::model::{Advert, Ident, Playlist, Snapshot};
use screenwatch_core::state::{Dialog, Overlay};
use screenwatch_core::store::LoadStatus;

use super::theme::styles;
use crate::app::App;

const CELL_WIDTH: u16 = 30;
const CELL_HEIGHT: u16 = 4;
const NO_DATA: &str = "No data available";

fn ident_or_na(id: Option<&Ident>) -> String {
    id.map(|i| i.to_string()).unwrap_or_else(|| "N/A".into())
}

fn field(label: &str, value: impl Into<String>) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{}: ", label), styles::label()),
        Span::styled(value.into(), styles::text()),
    ]
}

fn two_fields(a: Vec<Span<'static>>, b: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = a;
    spans.push(Span::raw("   "));
    spans.extend(b);
    Line::from(spans)
}

fn card_heading(icon: &str, title: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {} ", icon), styles::card_icon()),
        Span::raw(" "),
        Span::styled(title.to_string(), styles::title()),
    ])
}

fn card_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_subtle())
}

/// Centered popup of fixed height and proportional width
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Draw the whole dashboard and record the grid geometry on the cursor
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    draw_menu_bar(f, app, chunks[0]);

    match app.state.store.current() {
        Some(snapshot) => {
            draw_cards(f, app, snapshot, chunks[1]);
            let columns = draw_grid(f, app, snapshot, chunks[2]);
            app.cursor.grid_columns = columns;
        }
        None => {
            let body = Rect {
                height: chunks[1].height + chunks[2].height,
                ..chunks[1]
            };
            let text = if app.state.store.is_loading()
                && app.state.store.status() == &LoadStatus::NotLoaded
            {
                "Loading..."
            } else {
                NO_DATA
            };
            f.render_widget(
                Paragraph::new(text)
                    .style(styles::text_muted())
                    .alignment(Alignment::Center)
                    .block(card_block()),
                body,
            );
        }
    }

    draw_footer(f, app, chunks[3]);

    // overlays sit above the grid, dialogs above everything
    match app.state.overlay() {
        Overlay::None => {}
        Overlay::Playlist(p) => draw_playlist_overlay(f, app, p, area),
        Overlay::Advert(a) => draw_advert_overlay(f, app, a, area),
    }
    match app.state.dialog {
        Some(Dialog::Help) => draw_help(f, app, area),
        Some(Dialog::Calendar) => draw_calendar(f, app, area),
        None => {}
    }
}

fn draw_menu_bar(f: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(area);

    let mut spans = vec![Span::styled(" screenwatch ", styles::title())];
    for (key, action) in app.keymap.entries() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("[{}]", key), styles::key_hint()));
        spans.push(Span::styled(format!(" {}", action.label()), styles::text()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), cols[0]);

    f.render_widget(
        Paragraph::new(styles::connectivity_icon(app.state.online))
            .style(styles::connectivity(app.state.online))
            .alignment(Alignment::Right),
        cols[1],
    );
}

fn draw_cards(f: &mut Frame, app: &App, snapshot: &Snapshot, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(25),
            Constraint::Percentage(30),
        ])
        .split(area);

    let screen = snapshot.screen();
    let px = |v: Option<u32>| v.map(|n| format!("{}px", n)).unwrap_or_else(|| "N/A".into());
    let screen_lines = vec![
        card_heading("◆", &app.config.team_label),
        two_fields(
            field("Client ID", ident_or_na(screen.user_id.as_ref())),
            field("MP ID", ident_or_na(screen.mediaplayer_id.as_ref())),
        ),
        two_fields(field("Height", px(screen.height_px)), field("Width", px(screen.width_px))),
        two_fields(
            field("Last Sync", format_date(screen.last_publish)),
            field("Run Time", format_hhmm(app.state.total_run_time())),
        ),
    ];
    f.render_widget(Paragraph::new(screen_lines).block(card_block()), cols[0]);

    let storage_lines = vec![
        card_heading("▤", "Local Storage"),
        Line::from(Span::styled("Local Data Placeholder:", styles::label())),
    ];
    f.render_widget(Paragraph::new(storage_lines).block(card_block()), cols[1]);

    let profile = snapshot.profile();
    let volume = profile
        .audio_volume
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".into());
    let profile_lines = vec![
        card_heading("▣", "Profile Data"),
        Line::from(field("Mute", mute_label(profile.is_muted()))),
        Line::from(field("Audio Volume", volume)),
    ];
    f.render_widget(Paragraph::new(profile_lines).block(card_block()), cols[2]);
}

/// Returns the number of grid columns used
fn draw_grid(f: &mut Frame, app: &App, snapshot: &Snapshot, area: Rect) -> usize {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_subtle())
        .title(format!(" Content ({}) ", snapshot.items().len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if snapshot.is_empty() {
        f.render_widget(
            Paragraph::new(NO_DATA)
                .style(styles::text_muted())
                .alignment(Alignment::Center),
            inner,
        );
        return 1;
    }

    let columns = (inner.width / CELL_WIDTH).max(1) as usize;
    let visible_rows = (inner.height / CELL_HEIGHT).max(1) as usize;
    let cursor_row = app.cursor.grid / columns;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);
    let cell_width = inner.width / columns as u16;
    let grid_focused = matches!(app.state.overlay(), Overlay::None);

    for (index, item) in snapshot.items().iter().enumerate() {
        let row = index / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = index % columns;
        let cell = Rect {
            x: inner.x + col as u16 * cell_width,
            y: inner.y + (row - first_row) as u16 * CELL_HEIGHT,
            width: cell_width,
            height: CELL_HEIGHT.min(inner.height),
        };

        let selected = grid_focused && index == app.cursor.grid;
        let border = if selected {
            styles::border_focused()
        } else {
            styles::border_subtle()
        };
        let kind = item.kind();
        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {} ", kind.label()), styles::kind_tag(kind)),
                Span::raw(" "),
                Span::styled(item.name().to_string(), styles::title()),
            ]),
            Line::from(field("Run Time", format_hhmm(run_time(item)))),
        ];
        let mut para = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border),
        );
        if selected {
            para = para.style(styles::selection());
        }
        f.render_widget(para, cell);
    }

    columns
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let status = if app.state.store.is_loading() {
        Span::styled("Loading...", styles::warn())
    } else {
        match app.state.store.status() {
            LoadStatus::NotLoaded => Span::styled("Not loaded", styles::text_muted()),
            LoadStatus::Failed { message } => Span::styled(message.clone(), styles::error()),
            LoadStatus::Loaded => Span::styled(
                format!(
                    "{} items",
                    app.state.store.current().map(|s| s.items().len()).unwrap_or(0)
                ),
                styles::text(),
            ),
        }
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.source_name), styles::text_muted()),
        status,
        Span::raw("   "),
        Span::styled("[Enter]", styles::key_hint()),
        Span::raw(" open  "),
        Span::styled("[Esc]", styles::key_hint()),
        Span::raw(" close all  "),
        Span::styled("[←↑↓→]", styles::key_hint()),
        Span::raw(" move"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Bottom sheet covering 90% of the screen height
fn sheet_area(area: Rect) -> Rect {
    let top = area.height / 10;
    Rect {
        y: area.y + top,
        height: area.height - top,
        ..area
    }
}

fn sheet_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_focused())
        .title(title)
        .title_bottom(Line::from(" [b] back  [Esc] close ").alignment(Alignment::Right))
}

fn draw_playlist_overlay(f: &mut Frame, app: &App, playlist: &Playlist, area: Rect) {
    let sheet = sheet_area(area);
    f.render_widget(Clear, sheet);
    let block = sheet_block(format!(" Playlist: {} ", playlist.name));
    let inner = block.inner(sheet);
    f.render_widget(block, sheet);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let header = vec![
        Line::from(field("Advert Playlist ID", playlist.id.to_string())),
        Line::from(field("Playlist Name", playlist.name.clone())),
    ];
    f.render_widget(Paragraph::new(header), rows[0]);

    if playlist.adverts.is_empty() {
        f.render_widget(Paragraph::new(NO_DATA).style(styles::text_muted()), rows[1]);
        return;
    }

    let items: Vec<ListItem> = playlist
        .adverts
        .iter()
        .map(|a| {
            ListItem::new(vec![
                Line::from(Span::styled(a.name.clone(), styles::title())),
                Line::from(field("Start Time", format_date(a.start))),
                Line::from(field("End Time", format_date(a.end))),
            ])
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(app.cursor.playlist));
    let list = List::new(items)
        .highlight_style(styles::selection())
        .highlight_symbol("▸ ");
    f.render_stateful_widget(list, rows[1], &mut list_state);
}

fn advert_lines(advert: &Advert, asset_prefix: &str) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(field("Name", advert.name.clone()))];

    if let Some(asset) = &advert.asset {
        let path = asset_path(asset_prefix, asset).unwrap_or_else(|| asset.file_name.clone());
        lines.push(Line::from(field("Image", path)));
    }

    if advert.start.is_some() && advert.end.is_some() {
        lines.push(Line::from(field(
            "Active",
            format!("{} → {}", format_date(advert.start), format_date(advert.end)),
        )));
    }

    if !advert.schedules.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Timings:", styles::title())));
        for (i, s) in advert.schedules.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("Schedule {}:", i + 1),
                styles::label(),
            )));
            lines.push(Line::from(field(
                "  Start Time",
                format_clock(s.start_hour, s.start_minute),
            )));
            lines.push(Line::from(field(
                "  End Time",
                format_clock(s.end_hour, s.end_minute),
            )));
            lines.push(Line::from(field("  Days", s.days.join(", "))));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(field("Start Date", format_date(advert.start))));
    lines.push(Line::from(field("End Date", format_date(advert.end))));
    lines
}

fn draw_advert_overlay(f: &mut Frame, app: &App, advert: &Advert, area: Rect) {
    let sheet = sheet_area(area);
    f.render_widget(Clear, sheet);
    let block = sheet_block(format!(" Advert: {} ", advert.name));
    f.render_widget(
        Paragraph::new(advert_lines(advert, &app.config.asset_prefix))
            .block(block)
            .wrap(Wrap { trim: false }),
        sheet,
    );
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = app
        .keymap
        .entries()
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{}: ", key.to_ascii_uppercase()), styles::key_hint()),
                Span::styled(action.description(), styles::text()),
            ])
        })
        .collect();
    for (key, desc) in [
        ("Enter", "Open the selected item"),
        ("Backspace", "Back to the previous panel"),
        ("Esc", "Close all panels"),
        ("Arrows", "Move the selection"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", key), styles::key_hint()),
            Span::styled(desc, styles::text()),
        ]));
    }

    let popup = centered_rect(50, lines.len() as u16 + 2, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_focused())
                .title(" Keybinds "),
        ),
        popup,
    );
}

fn draw_calendar(f: &mut Frame, app: &App, area: Rect) {
    let window = app.state.store.time_window();
    let (from, to) = window.calendar_range(app.config.fallback_range());
    let bounds = if window.is_unbounded() {
        "no advert dates, showing the configured range"
    } else {
        "from advert dates"
    };

    let lines = vec![
        Line::from(field("Start Date", from.format("%b %-d, %Y").to_string())),
        Line::from(field("End Date", to.format("%b %-d, %Y").to_string())),
        Line::from(Span::styled(bounds, styles::text_muted())),
        Line::raw(""),
        Line::from(field("Earliest Start Time", format_datetime(window.earliest))),
        Line::from(field("Latest End Time", format_datetime(window.latest))),
    ];

    let popup = centered_rect(60, lines.len() as u16 + 2, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_focused())
                .title(" Calendar "),
        ),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenwatch_core::model::{AssetRef, Schedule};

    fn text_of(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_advert_lines_show_schedule_and_asset() {
        let advert = Advert {
            id: Ident::Num(1),
            name: "Sale".into(),
            asset: Some(AssetRef {
                file_name: "sale.png".into(),
                unique_name: Some("c3-sale.png".into()),
            }),
            start: None,
            end: None,
            refresh_minutes: 5,
            schedules: vec![Schedule {
                start_hour: 9,
                start_minute: 5,
                end_hour: 17,
                end_minute: 30,
                days: vec!["Mon".into(), "Tue".into()],
            }],
            playlist_id: None,
        };

        let text = text_of(&advert_lines(&advert, "/template/content/images/"));
        assert!(text.contains(&"Image: /template/content/images/c3-sale.png".to_string()));
        assert!(text.contains(&"  Start Time: 9:05".to_string()));
        assert!(text.contains(&"  Days: Mon, Tue".to_string()));
        assert!(text.contains(&"Start Date: N/A".to_string()));
        assert!(!text.iter().any(|l| l.starts_with("Active")));
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 100, 10);
        let r = centered_rect(50, 30, area);
        assert_eq!(r.width, 50);
        assert_eq!(r.height, 10);
        assert_eq!(r.x, 25);
    }

    #[test]
    fn test_centered_rect_on_wide_terminal() {
        let area = Rect::new(0, 0, 2000, 50);
        let r = centered_rect(60, 10, area);
        assert_eq!(r.width, 1200);
        assert_eq!(r.x, 400);
        assert_eq!(r.y, 20);
    }
}
