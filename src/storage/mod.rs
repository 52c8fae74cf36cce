//! Snapshot persistence.
//!
//! The watcher can dump the latest scraped snapshot to disk after each
//! cycle so selector drift can be diagnosed offline. The dump is purely
//! observational: diffing always runs against the in-memory previous
//! snapshot, which is reset whenever the session restarts.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Listing, Snapshot};

// Re-export for convenience
pub use local::LocalSink;

/// Serialized form of one snapshot, listings in page order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDump {
    /// When the snapshot was captured
    pub captured_at: DateTime<Utc>,
    /// Total listing count
    pub count: usize,
    /// The listings, sorted by position
    pub listings: Vec<Listing>,
}

impl SnapshotDump {
    pub fn new(snapshot: &Snapshot) -> Self {
        let listings: Vec<Listing> = snapshot
            .sorted_by_position()
            .into_iter()
            .cloned()
            .collect();
        Self {
            captured_at: Utc::now(),
            count: listings.len(),
            listings,
        }
    }
}

/// Sink for snapshot dumps.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Persist the latest snapshot, replacing any previous dump.
    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()>;
}
