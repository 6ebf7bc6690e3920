use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc;

use screenwatch_core::reducer::{DashboardEvent, EventEnvelope};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Background probe that reports whether the endpoint host is reachable.
/// It only reports; reloading stays a manual action.
pub struct ConnectivityProbe {
    addr: String,
    interval: Duration,
    next_id: Arc<AtomicU64>,
}

impl ConnectivityProbe {
    pub fn new(addr: String, interval: Duration, next_id: Arc<AtomicU64>) -> Self {
        Self {
            addr,
            interval,
            next_id,
        }
    }

    /// Probe in a loop, emitting only on changes. Returns when the receiver
    /// is gone.
    pub async fn run(self, event_tx: mpsc::Sender<EventEnvelope>) {
        let mut ticker = tokio::time::interval(self.interval);
        let mut last: Option<bool> = None;

        loop {
            ticker.tick().await;

            let online = self.check_tcp().await;
            if last == Some(online) {
                continue;
            }
            last = Some(online);

            let env = EventEnvelope::now(
                self.next_id.fetch_add(1, Ordering::SeqCst),
                DashboardEvent::ConnectivityChanged { online },
            );
            if event_tx.send(env).await.is_err() {
                return;
            }
        }
    }

    async fn check_tcp(&self) -> bool {
        match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!(addr = %self.addr, error = %e, "endpoint unreachable");
                false
            }
            Err(_) => {
                tracing::debug!(addr = %self.addr, "endpoint probe timed out");
                false
            }
        }
    }
}

/// `host:port` to probe for an HTTP(S) endpoint URL
#[cfg(feature = "http")]
pub fn probe_addr(endpoint: &str) -> Option<String> {
    let url = reqwest::Url::parse(endpoint).ok()?;
    let host = url.host_str()?;
    let port = url.port_or_known_default()?;
    Some(format!("{}:{}", host, port))
}

/// Without an HTTP client there is no endpoint to probe
#[cfg(not(feature = "http"))]
pub fn probe_addr(_endpoint: &str) -> Option<String> {
    None
}

/// Spawn the probe for `endpoint` if it resolves to an address
pub fn spawn_probe(
    endpoint: &str,
    interval: Duration,
    event_tx: mpsc::Sender<EventEnvelope>,
    next_id: Arc<AtomicU64>,
) {
    let Some(addr) = probe_addr(endpoint) else {
        tracing::warn!(endpoint, "no probe address for endpoint, connectivity not monitored");
        return;
    };
    let probe = ConnectivityProbe::new(addr, interval, next_id);
    tokio::spawn(async move {
        probe.run(event_tx).await;
    });
}
