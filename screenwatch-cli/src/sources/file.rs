use std::path::PathBuf;

use async_trait::async_trait;

use screenwatch_core::model::Snapshot;
use screenwatch_core::source::{FetchError, SnapshotSource, snapshot_from_body};

/// Reads a saved `dataJson` response from disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let bytes = tokio::fs::read(&self.path).await?;
        snapshot_from_body(&bytes)
    }

    fn name(&self) -> String {
        format!("file {}", self.path.display())
    }
}
