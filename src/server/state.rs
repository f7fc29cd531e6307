use std::sync::Arc;

use crate::core::auth::Authenticator;
use crate::core::exaroton::BalanceSource;
use crate::core::store::SnapshotReader;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Snapshot log read once per history request.
    pub store: Arc<dyn SnapshotReader>,

    /// Live account balance, read once per history request.
    pub balance: Arc<dyn BalanceSource>,

    /// Bearer token resolution for the configured users.
    pub auth: Authenticator,
}
