use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::core::models::credits::{CreditSnapshot, NewSnapshot};
use crate::core::store::{sort_ascending, SnapshotReader, SnapshotWriter, StoreError};

/// In-process snapshot log with the same ordering contract as the file store.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<Vec<CreditSnapshot>>,
    next_id: Mutex<u64>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-identified snapshots in any order.
    pub fn with_snapshots(mut snapshots: Vec<CreditSnapshot>) -> Self {
        sort_ascending(&mut snapshots);
        let next_id = snapshots.len() as u64;
        Self {
            snapshots: Mutex::new(snapshots),
            next_id: Mutex::new(next_id),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotReader for MemorySnapshotStore {
    fn query_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CreditSnapshot>, StoreError> {
        let snapshots = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(snapshots
            .iter()
            .filter(|s| s.timestamp >= from && s.timestamp <= to)
            .cloned()
            .collect())
    }
}

impl SnapshotWriter for MemorySnapshotStore {
    fn append(&self, snapshot: NewSnapshot) -> Result<CreditSnapshot, StoreError> {
        let mut next_id = self.next_id.lock().map_err(|_| StoreError::Poisoned)?;
        let mut snapshots = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;

        let stored = snapshot.into_snapshot(format!("mem-{}", *next_id));
        *next_id += 1;

        // Insert after any equal timestamps so ties keep append order
        let pos = snapshots.partition_point(|s| s.timestamp <= stored.timestamp);
        snapshots.insert(pos, stored.clone());
        Ok(stored)
    }

    fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut snapshots = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;
        let before = snapshots.len();
        snapshots.retain(|s| s.timestamp >= cutoff);
        Ok(before - snapshots.len())
    }
}
