use crate::aggregate::total_run_time;
use crate::model::{Advert, ContentItem, Playlist};
use crate::navigation::{NavState, NavigationController};
use crate::store::{LoadTicket, SnapshotStore};

/// Modal panels layered above the grid and overlays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialog {
    Help,
    Calendar,
}

/// Which detail overlay is visible, derived from the navigation state
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlay<'a> {
    None,
    Playlist(&'a Playlist),
    Advert(&'a Advert),
}

/// Everything the event loop owns. Visibility of every panel is derived from
/// `nav` and `dialog`; nothing else tracks it.
#[derive(Debug)]
pub struct DashboardState {
    pub store: SnapshotStore,
    pub nav: NavigationController,
    pub online: bool,
    pub dialog: Option<Dialog>,
    pub last_event_id: u64,
}

impl DashboardState {
    pub fn new(online: bool) -> Self {
        Self {
            store: SnapshotStore::new(),
            nav: NavigationController::new(),
            online,
            dialog: None,
            last_event_id: 0,
        }
    }

    /// Issue a ticket for a new fetch; the result comes back as
    /// `DashboardEvent::LoadFinished`
    pub fn begin_load(&mut self) -> LoadTicket {
        self.store.begin_load()
    }

    pub fn overlay(&self) -> Overlay<'_> {
        match self.nav.state() {
            NavState::Closed => Overlay::None,
            NavState::Viewing {
                item: ContentItem::Playlist(p),
                ..
            } => Overlay::Playlist(p),
            NavState::Viewing {
                item: ContentItem::Advert(a),
                ..
            } => Overlay::Advert(a),
        }
    }

    /// Total run time of the current snapshot, 0 when nothing is loaded
    pub fn total_run_time(&self) -> u64 {
        self.store.current().map(total_run_time).unwrap_or(0)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(true)
    }
}
