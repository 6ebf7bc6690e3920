use std::time::SystemTime;

use crate::model::{ItemRef, Snapshot};
use crate::state::{DashboardState, Dialog};
use crate::store::{LoadOutcome, LoadTicket};

#[derive(Clone, Debug)]
pub enum DashboardEvent {
    LoadFinished {
        ticket: LoadTicket,
        result: Result<Snapshot, String>,
    },
    ConnectivityChanged {
        online: bool,
    },
    Open {
        at: ItemRef,
    },
    Back,
    CloseAll,
    ShowDialog(Dialog),
    DismissDialog,
}

#[derive(Clone, Debug)]
pub struct EventEnvelope {
    pub id: u64,
    pub at: SystemTime,
    pub event: DashboardEvent,
}

impl EventEnvelope {
    pub fn now(id: u64, event: DashboardEvent) -> Self {
        Self {
            id,
            at: SystemTime::now(),
            event,
        }
    }
}

pub fn reduce(state: &mut DashboardState, env: &EventEnvelope) {
    state.last_event_id = env.id;

    match &env.event {
        DashboardEvent::LoadFinished { ticket, result } => {
            if state.store.complete(*ticket, result.clone()) == LoadOutcome::Applied {
                // a reload replaces everything the old snapshot fed
                state.nav.close_all();
                state.dialog = None;
            }
        }
        DashboardEvent::ConnectivityChanged { online } => {
            if state.online != *online {
                tracing::info!(online = *online, "connectivity changed");
            }
            state.online = *online;
        }
        DashboardEvent::Open { at } => {
            match state.store.current().and_then(|snap| snap.resolve(at)) {
                Some(item) => state.nav.open(item),
                None => tracing::debug!(?at, "open ignored, item not in snapshot"),
            }
        }
        DashboardEvent::Back => {
            let snapshot = state.store.current();
            state.nav.back(snapshot);
        }
        DashboardEvent::CloseAll => state.nav.close_all(),
        DashboardEvent::ShowDialog(dialog) => state.dialog = Some(*dialog),
        DashboardEvent::DismissDialog => state.dialog = None,
    }
}
