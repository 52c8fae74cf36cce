//! Local filesystem snapshot sink.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::Snapshot;
use crate::storage::{SnapshotDump, SnapshotSink};

/// Writes the latest snapshot to a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalSink {
    path: PathBuf,
}

impl LocalSink {
    /// Create a sink writing to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotSink for LocalSink {
    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let dump = SnapshotDump::new(snapshot);
        let bytes = serde_json::to_vec_pretty(&dump)?;
        self.write_bytes(&bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;

    fn make_snapshot(ids: &[&str]) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for id in ids {
            snapshot.insert(Listing {
                id: id.to_string(),
                ..Listing::default()
            });
        }
        snapshot
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let sink = LocalSink::new(&path);

        sink.write_snapshot(&make_snapshot(&["b", "a"])).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let dump: SnapshotDump = serde_json::from_str(&contents).unwrap();
        assert_eq!(dump.count, 2);
        // Page order, not ID order.
        assert_eq!(dump.listings[0].id, "b");
        assert_eq!(dump.listings[1].id, "a");
    }

    #[tokio::test]
    async fn test_rewrite_replaces_previous_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let sink = LocalSink::new(&path);

        sink.write_snapshot(&make_snapshot(&["a", "b", "c"])).await.unwrap();
        sink.write_snapshot(&make_snapshot(&["d"])).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let dump: SnapshotDump = serde_json::from_str(&contents).unwrap();
        assert_eq!(dump.count, 1);
        assert_eq!(dump.listings[0].id, "d");
    }
}
