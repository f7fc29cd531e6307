use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::record_cmd::build_recorder;
use creditwatch::core::auth::Authenticator;
use creditwatch::core::config::AppConfig;
use creditwatch::core::models::credits::SNAPSHOT_TYPE_SCHEDULED;
use creditwatch::core::store::jsonl::JsonlSnapshotStore;
use creditwatch::server;
use creditwatch::server::state::AppState;

pub async fn run(config: &AppConfig, bind: Option<String>) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        warn!("Config issue: {}", issue);
    }

    let store = Arc::new(JsonlSnapshotStore::new(config.store.resolved_path()));
    let recorder = build_recorder(config, store.clone())?;
    let auth = Authenticator::new(&config.users);
    if auth.user_count() == 0 {
        warn!("No users configured; every API request will be rejected");
    }

    info!("Snapshot store: {}", store.path().display());
    let state = Arc::new(AppState {
        store,
        balance: recorder.balance.clone(),
        auth,
    });

    if config.server.record_interval_minutes > 0 {
        let interval = Duration::from_secs(config.server.record_interval_minutes * 60);
        tokio::spawn(async move {
            recorder.run(interval, SNAPSHOT_TYPE_SCHEDULED).await;
        });
    } else {
        info!("Background snapshot recording disabled");
    }

    let addr = bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, server::router(state))
        .await
        .context("Server error")?;
    Ok(())
}
