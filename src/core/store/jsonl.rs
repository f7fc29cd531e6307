use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::models::credits::{CreditSnapshot, NewSnapshot};
use crate::core::store::{sort_ascending, SnapshotReader, SnapshotWriter, StoreError};

/// Append-only JSON-lines snapshot log, one `CreditSnapshot` per line.
pub struct JsonlSnapshotStore {
    path: PathBuf,
    // Guards the file within this process; holds the id sequence
    write_lock: Mutex<u64>,
}

impl JsonlSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every snapshot in file order. A missing file is an empty log.
    fn read_all(&self) -> Result<Vec<CreditSnapshot>, StoreError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        let mut snapshots = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let snapshot: CreditSnapshot =
                serde_json::from_str(line).map_err(|source| StoreError::Malformed {
                    line: index + 1,
                    source,
                })?;
            snapshots.push(snapshot);
        }
        Ok(snapshots)
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl SnapshotReader for JsonlSnapshotStore {
    fn query_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CreditSnapshot>, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut snapshots: Vec<CreditSnapshot> = self
            .read_all()?
            .into_iter()
            .filter(|s| s.timestamp >= from && s.timestamp <= to)
            .collect();
        sort_ascending(&mut snapshots);
        debug!(
            "Loaded {} snapshots between {} and {} from {}",
            snapshots.len(),
            from,
            to,
            self.path.display()
        );
        Ok(snapshots)
    }
}

impl SnapshotWriter for JsonlSnapshotStore {
    fn append(&self, snapshot: NewSnapshot) -> Result<CreditSnapshot, StoreError> {
        let mut sequence = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.ensure_parent()?;

        let id = format!("{}-{}", snapshot.timestamp.timestamp_millis(), *sequence);
        *sequence += 1;
        let stored = snapshot.into_snapshot(id);

        let mut line = serde_json::to_string(&stored).map_err(StoreError::Serialize)?;
        line.push('\n');

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        debug!("Appended snapshot {} to {}", stored.id, self.path.display());
        Ok(stored)
    }

    fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let snapshots = self.read_all()?;
        let before = snapshots.len();
        let kept: Vec<&CreditSnapshot> =
            snapshots.iter().filter(|s| s.timestamp >= cutoff).collect();
        let removed = before - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        let mut content = String::new();
        for snapshot in kept {
            content.push_str(&serde_json::to_string(snapshot).map_err(StoreError::Serialize)?);
            content.push('\n');
        }

        let tmp_path = self.path.with_extension("jsonl.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;

        debug!("Pruned {} snapshots older than {}", removed, cutoff);
        Ok(removed)
    }
}
