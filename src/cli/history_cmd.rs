use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use creditwatch::core::config::AppConfig;
use creditwatch::core::exaroton::ExarotonClient;
use creditwatch::core::spending::report::build_history;
use creditwatch::core::store::jsonl::JsonlSnapshotStore;

pub async fn run(config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let store_path = config.store.resolved_path();
    debug!("Reading snapshots from {}", store_path.display());
    let store = Arc::new(JsonlSnapshotStore::new(store_path));

    let api_key = config.exaroton.resolved_api_key();
    let client = ExarotonClient::new(&config.exaroton.endpoint, api_key.as_deref())
        .context("Failed to set up Exaroton client")?;

    let now = Utc::now();
    let history = build_history(store, &client, now)
        .await
        .context("Failed to build credit history")?;

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_history(&history, &now, opts.use_color));
        }
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(&history)?
            } else {
                serde_json::to_string(&history)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}
