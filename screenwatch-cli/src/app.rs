use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use screenwatch_core::config::DashboardConfig;
use screenwatch_core::keymap::{Action, Keymap};
use screenwatch_core::model::ItemRef;
use screenwatch_core::reducer::{DashboardEvent, EventEnvelope, reduce};
use screenwatch_core::source::SnapshotSource;
use screenwatch_core::state::{DashboardState, Dialog, Overlay};

const EVENT_QUEUE_CAPACITY: usize = 64;

/// Selection positions; purely presentational
#[derive(Clone, Debug)]
pub struct Cursor {
    /// Index into the top-level grid
    pub grid: usize,
    /// Index into the open playlist's adverts
    pub playlist: usize,
    /// Grid columns at the last draw, for vertical movement
    pub grid_columns: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            grid: 0,
            playlist: 0,
            grid_columns: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The single owner of dashboard state. Background work (fetches,
/// connectivity) reports back through the event channel and is applied on
/// `drain`, one envelope at a time.
pub struct App {
    pub state: DashboardState,
    pub cursor: Cursor,
    pub config: DashboardConfig,
    pub keymap: Keymap,
    pub source_name: String,
    source: Arc<dyn SnapshotSource>,
    event_tx: mpsc::Sender<EventEnvelope>,
    event_rx: mpsc::Receiver<EventEnvelope>,
    next_id: Arc<AtomicU64>,
}

impl App {
    pub fn new(config: DashboardConfig, source: Arc<dyn SnapshotSource>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        Self {
            state: DashboardState::new(true),
            cursor: Cursor::default(),
            keymap: Keymap::from_config(&config.keys),
            config,
            source_name: source.name(),
            source,
            event_tx,
            event_rx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn event_sender(&self) -> mpsc::Sender<EventEnvelope> {
        self.event_tx.clone()
    }

    pub fn id_counter(&self) -> Arc<AtomicU64> {
        self.next_id.clone()
    }

    pub fn dispatch(&mut self, event: DashboardEvent) {
        let env = EventEnvelope::now(self.next_id.fetch_add(1, Ordering::SeqCst), event);
        self.apply(&env);
    }

    fn apply(&mut self, env: &EventEnvelope) {
        reduce(&mut self.state, env);
        self.clamp_cursor();
    }

    /// Apply everything background tasks have posted so far
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(env) = self.event_rx.try_recv() {
            self.apply(&env);
            applied += 1;
        }
        applied
    }

    /// Start one fetch. Overlapping fetches are allowed; the store keeps the
    /// most recently started one.
    pub fn refresh(&mut self) {
        let ticket = self.state.begin_load();
        tracing::info!(generation = ticket.generation(), source = %self.source_name, "loading snapshot");

        let source = self.source.clone();
        let tx = self.event_tx.clone();
        let next_id = self.next_id.clone();
        tokio::spawn(async move {
            let result = source.fetch().await.map_err(|e| e.to_string());
            let env = EventEnvelope::now(
                next_id.fetch_add(1, Ordering::SeqCst),
                DashboardEvent::LoadFinished { ticket, result },
            );
            let _ = tx.send(env).await;
        });
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Flow {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if let Some(dialog) = self.state.dialog {
            return self.handle_dialog_key(dialog, code);
        }

        match code {
            KeyCode::Char(c) => {
                if let Some(action) = self.keymap.action_for(c) {
                    return self.perform(action);
                }
            }
            KeyCode::Enter => self.open_selected(),
            KeyCode::Backspace => self.dispatch(DashboardEvent::Back),
            KeyCode::Esc => self.dispatch(DashboardEvent::CloseAll),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => self.move_cursor(code),
            _ => {}
        }
        Flow::Continue
    }

    fn handle_dialog_key(&mut self, dialog: Dialog, code: KeyCode) -> Flow {
        let dismiss = match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => true,
            KeyCode::Char(c) => match self.keymap.action_for(c) {
                Some(Action::Quit) => return Flow::Quit,
                Some(Action::Back) => true,
                Some(Action::Help) => dialog == Dialog::Help,
                Some(Action::Calendar) => dialog == Dialog::Calendar,
                _ => false,
            },
            _ => false,
        };
        if dismiss {
            self.dispatch(DashboardEvent::DismissDialog);
        }
        Flow::Continue
    }

    fn perform(&mut self, action: Action) -> Flow {
        match action {
            Action::Refresh => self.refresh(),
            Action::Help => self.dispatch(DashboardEvent::ShowDialog(Dialog::Help)),
            Action::Calendar => self.dispatch(DashboardEvent::ShowDialog(Dialog::Calendar)),
            Action::Back => self.dispatch(DashboardEvent::Back),
            Action::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn open_selected(&mut self) {
        let at = match self.state.overlay() {
            Overlay::None => {
                self.cursor.playlist = 0;
                ItemRef::TopLevel(self.cursor.grid)
            }
            Overlay::Playlist(p) => ItemRef::Nested {
                playlist: p.id.clone(),
                index: self.cursor.playlist,
            },
            Overlay::Advert(_) => return,
        };
        self.dispatch(DashboardEvent::Open { at });
    }

    fn move_cursor(&mut self, code: KeyCode) {
        match self.state.overlay() {
            Overlay::None => {
                let cols = self.cursor.grid_columns.max(1);
                let grid = self.cursor.grid;
                self.cursor.grid = match code {
                    KeyCode::Left => grid.saturating_sub(1),
                    KeyCode::Right => grid + 1,
                    KeyCode::Up => grid.saturating_sub(cols),
                    KeyCode::Down if grid + cols < self.grid_len() => grid + cols,
                    _ => grid,
                };
            }
            Overlay::Playlist(_) => {
                self.cursor.playlist = match code {
                    KeyCode::Up => self.cursor.playlist.saturating_sub(1),
                    KeyCode::Down => self.cursor.playlist + 1,
                    _ => self.cursor.playlist,
                };
            }
            Overlay::Advert(_) => {}
        }
        self.clamp_cursor();
    }

    fn grid_len(&self) -> usize {
        self.state.store.current().map(|s| s.items().len()).unwrap_or(0)
    }

    fn clamp_cursor(&mut self) {
        let grid_len = self.grid_len();
        self.cursor.grid = self.cursor.grid.min(grid_len.saturating_sub(1));

        if let Overlay::Playlist(p) = self.state.overlay() {
            let len = p.adverts.len();
            self.cursor.playlist = self.cursor.playlist.min(len.saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::sources::DemoSource;
    use screenwatch_core::model::Ident;
    use screenwatch_core::store::LoadStatus;

    fn demo_app() -> App {
        let source = DemoSource::new().with_latency(Duration::ZERO);
        App::new(DashboardConfig::default(), Arc::new(source))
    }

    async fn settle(app: &mut App) {
        let env = tokio::time::timeout(Duration::from_secs(2), app.event_rx.recv())
            .await
            .expect("load did not finish")
            .expect("channel closed");
        app.apply(&env);
    }

    async fn loaded_app() -> App {
        let mut app = demo_app();
        app.refresh();
        settle(&mut app).await;
        app
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        app.handle_key(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_refresh_loads_snapshot() {
        let app = loaded_app().await;
        assert_eq!(app.state.store.status(), &LoadStatus::Loaded);
        assert_eq!(app.state.total_run_time(), 52);
        assert_eq!(app.source_name, "demo");
    }

    #[tokio::test]
    async fn test_drill_down_and_back_with_keys() {
        let mut app = loaded_app().await;

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.state.overlay(), Overlay::Playlist(p) if p.id == Ident::Num(101)));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor.playlist, 1);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.state.overlay(), Overlay::Advert(a) if a.id == Ident::Num(2)));

        press(&mut app, KeyCode::Char('b'));
        assert!(matches!(app.state.overlay(), Overlay::Playlist(p) if p.id == Ident::Num(101)));
        assert_eq!(app.cursor.playlist, 1);

        press(&mut app, KeyCode::Char('B'));
        assert_eq!(app.state.overlay(), Overlay::None);
    }

    #[tokio::test]
    async fn test_escape_closes_everything() {
        let mut app = loaded_app().await;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.nav.depth(), 2);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.overlay(), Overlay::None);
        assert_eq!(app.state.nav.depth(), 0);
    }

    #[tokio::test]
    async fn test_grid_cursor_stays_in_bounds() {
        let mut app = loaded_app().await;
        app.cursor.grid_columns = 3;

        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.cursor.grid, 3);

        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor.grid, 0);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor.grid, 3);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor.grid, 3);
    }

    #[tokio::test]
    async fn test_dialogs_capture_keys() {
        let mut app = loaded_app().await;

        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.state.dialog, Some(Dialog::Help));

        // grid keys do nothing while a dialog is up
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.dialog, None);
        assert_eq!(app.state.overlay(), Overlay::None);

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.state.dialog, Some(Dialog::Calendar));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.state.dialog, Some(Dialog::Calendar));
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.state.dialog, None);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = demo_app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
        assert_eq!(
            app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Flow::Quit
        );
    }

    #[tokio::test]
    async fn test_refresh_key_resets_navigation() {
        let mut app = loaded_app().await;
        press(&mut app, KeyCode::Enter);
        assert_ne!(app.state.overlay(), Overlay::None);

        press(&mut app, KeyCode::Char('r'));
        assert!(app.state.store.is_loading());
        settle(&mut app).await;

        assert_eq!(app.state.overlay(), Overlay::None);
        assert!(!app.state.store.is_loading());
    }
}
