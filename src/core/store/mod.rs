pub mod jsonl;
pub mod memory;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::models::credits::{CreditSnapshot, NewSnapshot};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access snapshot store: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed snapshot on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(serde_json::Error),
    #[error("Snapshot store lock poisoned")]
    Poisoned,
}

/// Read side of the snapshot log.
///
/// Implementations must return every snapshot with `from <= timestamp <= to`
/// in ascending timestamp order; callers never reorder.
pub trait SnapshotReader: Send + Sync {
    fn query_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CreditSnapshot>, StoreError>;
}

/// Write side of the snapshot log.
pub trait SnapshotWriter: Send + Sync {
    /// Append a snapshot, returning it with its assigned id.
    fn append(&self, snapshot: NewSnapshot) -> Result<CreditSnapshot, StoreError>;

    /// Remove every snapshot strictly older than `cutoff`. Returns the count removed.
    fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Stable ascending sort by timestamp, keeping insertion order for ties.
pub(crate) fn sort_ascending(snapshots: &mut [CreditSnapshot]) {
    snapshots.sort_by_key(|s| s.timestamp);
}
