use anyhow::{Context, Result};
use chrono::Utc;

use creditwatch::core::config::AppConfig;
use creditwatch::core::recorder::retention_cutoff;
use creditwatch::core::store::jsonl::JsonlSnapshotStore;
use creditwatch::core::store::SnapshotWriter;

/// Remove snapshots older than `days` (default: the configured retention).
pub async fn run(config: &AppConfig, days: Option<u32>) -> Result<()> {
    let days = days.unwrap_or(config.store.retention_days);
    let Some(cutoff) = retention_cutoff(days, Utc::now()) else {
        eprintln!("Retention is 0 days; nothing to prune.");
        return Ok(());
    };

    let path = config.store.resolved_path();
    let store = JsonlSnapshotStore::new(path.clone());
    let removed = tokio::task::spawn_blocking(move || store.prune_before(cutoff))
        .await?
        .with_context(|| format!("Failed to prune {}", path.display()))?;

    println!(
        "Removed {} snapshot{} older than {} days",
        removed,
        if removed == 1 { "" } else { "s" },
        days
    );
    Ok(())
}
