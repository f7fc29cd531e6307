use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::exaroton::{BalanceSource, ExarotonError, ServerSource};
use crate::core::models::credits::{CreditSnapshot, NewSnapshot};
use crate::core::store::{SnapshotWriter, StoreError};

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read credit balance: {0}")]
    Balance(#[from] ExarotonError),
    #[error("Failed to store snapshot: {0}")]
    Store(#[from] StoreError),
    #[error("Snapshot write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Everything the recorder needs, shared between the CLI and the server loop.
#[derive(Clone)]
pub struct Recorder {
    pub balance: Arc<dyn BalanceSource>,
    pub servers: Arc<dyn ServerSource>,
    pub writer: Arc<dyn SnapshotWriter>,
    /// Snapshots older than this many days are pruned after each recording; 0 keeps all
    pub retention_days: u32,
}

impl Recorder {
    /// Take one snapshot of the live balance and server list.
    ///
    /// A failed server listing still records the balance with no server
    /// states; a failed balance read records nothing.
    pub async fn record(
        &self,
        snapshot_type: &str,
        now: DateTime<Utc>,
    ) -> Result<CreditSnapshot, RecordError> {
        let credits = self.balance.current_credits().await?;

        let server_states: Vec<Value> = match self.servers.server_states().await {
            Ok(states) => states
                .iter()
                .filter_map(|s| serde_json::to_value(s).ok())
                .collect(),
            Err(e) => {
                warn!("Recording snapshot without server states: {}", e);
                Vec::new()
            }
        };

        let new_snapshot = NewSnapshot {
            credits,
            timestamp: now,
            snapshot_type: snapshot_type.to_string(),
            server_states,
        };

        let writer = self.writer.clone();
        let stored = tokio::task::spawn_blocking(move || writer.append(new_snapshot)).await??;
        info!(
            "Recorded {} snapshot {}: {:.2} credits",
            stored.snapshot_type, stored.id, stored.credits
        );

        if let Err(e) = self.prune(now).await {
            warn!("Failed to prune old snapshots: {}", e);
        }

        Ok(stored)
    }

    /// Apply the retention policy relative to `now`.
    pub async fn prune(&self, now: DateTime<Utc>) -> Result<usize, RecordError> {
        let Some(cutoff) = retention_cutoff(self.retention_days, now) else {
            return Ok(0);
        };
        let writer = self.writer.clone();
        let removed = tokio::task::spawn_blocking(move || writer.prune_before(cutoff)).await??;
        if removed > 0 {
            debug!("Pruned {} snapshots older than {}", removed, cutoff);
        }
        Ok(removed)
    }

    /// Record a `snapshot_type` snapshot every `interval`, forever.
    pub async fn run(&self, interval: std::time::Duration, snapshot_type: &str) {
        info!(
            "Recording credit snapshots every {} minutes",
            interval.as_secs() / 60
        );
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.record(snapshot_type, Utc::now()).await {
                tracing::error!("Snapshot recording failed: {}", e);
            }
        }
    }
}

/// Oldest timestamp kept under `retention_days`, or `None` to keep everything.
pub fn retention_cutoff(retention_days: u32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if retention_days == 0 {
        return None;
    }
    Some(now - Duration::days(retention_days as i64))
}
