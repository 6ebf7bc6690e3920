use crate::aggregate::{TimeWindow, time_window};
use crate::model::Snapshot;

/// Message shown for any failed load; details go to the log
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching data";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    NotLoaded,
    Loaded,
    Failed { message: String },
}

/// Handle for one load attempt. Tickets are ordered by issue time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load already settled; this result was dropped
    Stale,
}

/// Holds the single current snapshot. Each completed load replaces the whole
/// store content; overlapping loads resolve to the most recently issued one.
#[derive(Debug)]
pub struct SnapshotStore {
    status: LoadStatus,
    snapshot: Option<Snapshot>,
    window: TimeWindow,
    issued: u64,
    settled: u64,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            status: LoadStatus::NotLoaded,
            snapshot: None,
            window: TimeWindow::default(),
            issued: 0,
            settled: 0,
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// True while the most recently issued load has not settled
    pub fn is_loading(&self) -> bool {
        self.issued > self.settled
    }

    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Snapshot, String>) -> LoadOutcome {
        if ticket.0 <= self.settled {
            tracing::debug!(
                generation = ticket.0,
                settled = self.settled,
                "dropping stale load result"
            );
            return LoadOutcome::Stale;
        }
        self.settled = ticket.0;

        match result {
            Ok(snapshot) => {
                self.window = time_window(&snapshot);
                tracing::info!(
                    generation = ticket.0,
                    items = snapshot.items().len(),
                    "snapshot loaded"
                );
                self.snapshot = Some(snapshot);
                self.status = LoadStatus::Loaded;
            }
            Err(detail) => {
                tracing::warn!(generation = ticket.0, error = %detail, "snapshot load failed");
                self.snapshot = None;
                self.window = TimeWindow::default();
                self.status = LoadStatus::Failed {
                    message: FETCH_FAILED_MESSAGE.to_string(),
                };
            }
        }
        LoadOutcome::Applied
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Active window cached when the current snapshot was stored
    pub fn time_window(&self) -> TimeWindow {
        self.window
    }
}
