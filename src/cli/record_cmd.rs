use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::cli::output::{OutputFormat, OutputOptions};
use creditwatch::core::config::AppConfig;
use creditwatch::core::exaroton::ExarotonClient;
use creditwatch::core::formatter::format_credits;
use creditwatch::core::models::credits::SNAPSHOT_TYPE_MANUAL;
use creditwatch::core::recorder::Recorder;
use creditwatch::core::store::jsonl::JsonlSnapshotStore;

/// Build a recorder from config: Exaroton for balance and servers, `store` for writes.
pub fn build_recorder(config: &AppConfig, store: Arc<JsonlSnapshotStore>) -> Result<Recorder> {
    let api_key = config.exaroton.resolved_api_key();
    let client = Arc::new(
        ExarotonClient::new(&config.exaroton.endpoint, api_key.as_deref())
            .context("Failed to set up Exaroton client")?,
    );

    Ok(Recorder {
        balance: client.clone(),
        servers: client,
        writer: store,
        retention_days: config.store.retention_days,
    })
}

pub async fn run(config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let store = Arc::new(JsonlSnapshotStore::new(config.store.resolved_path()));
    let recorder = build_recorder(config, store)?;
    let snapshot = recorder
        .record(SNAPSHOT_TYPE_MANUAL, Utc::now())
        .await
        .context("Failed to record snapshot")?;

    match opts.format {
        OutputFormat::Text => {
            println!(
                "Recorded {} ({} servers)",
                format_credits(snapshot.credits),
                snapshot.server_states.len()
            );
        }
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}
