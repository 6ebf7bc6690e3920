use async_trait::async_trait;

use screenwatch_core::model::Snapshot;
use screenwatch_core::source::{FetchError, SnapshotSource, snapshot_from_body};

/// Single GET against the player's data endpoint
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        tracing::debug!(url = %self.url, "fetching snapshot");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        snapshot_from_body(&body)
    }

    fn name(&self) -> String {
        self.url.clone()
    }
}
