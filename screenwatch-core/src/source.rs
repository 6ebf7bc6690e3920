use async_trait::async_trait;

use crate::model::Snapshot;
use crate::payload::{Envelope, PayloadError};

/// Why a single fetch attempt produced no snapshot
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("endpoint answered HTTP {code}")]
    Status { code: u16 },
    #[error("endpoint reported an error: {0}")]
    Remote(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Turn a response body into a snapshot, honoring the envelope's error flag
pub fn snapshot_from_body(bytes: &[u8]) -> Result<Snapshot, FetchError> {
    let envelope = Envelope::from_slice(bytes)?;
    if envelope.error {
        return Err(FetchError::Remote(envelope.error_msg));
    }
    Ok(envelope.into_snapshot()?)
}

/// Where snapshots come from.
///
/// Each call is one attempt: no retry, no partial result. Callers own
/// ordering between overlapping attempts (see `store::LoadTicket`).
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, FetchError>;

    /// Short description shown in the status bar
    fn name(&self) -> String;
}
