use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::core::exaroton::{BalanceSource, ExarotonError};
use crate::core::models::credits::CreditSnapshot;
use crate::core::models::spending::{CreditHistory, SpendingPeriod, SpendingSummary};
use crate::core::spending::daily::daily_breakdown;
use crate::core::spending::window::calculate_spending;
use crate::core::store::{SnapshotReader, StoreError};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("{0}")]
    Balance(#[from] ExarotonError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Snapshot read task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Assemble the credit history from one balance read and one store read.
///
/// Either read failing fails the whole report.
pub async fn build_history(
    reader: Arc<dyn SnapshotReader>,
    balance: &dyn BalanceSource,
    now: DateTime<Utc>,
) -> Result<CreditHistory, ReportError> {
    let current_credits = balance.current_credits().await?;

    let from = SpendingPeriod::Month.window(now).start;
    let snapshots =
        tokio::task::spawn_blocking(move || reader.query_range(from, now)).await??;
    debug!("Building credit history from {} snapshots", snapshots.len());

    Ok(summarize(snapshots, current_credits, now))
}

/// Pure part of [`build_history`]: `snapshots` must cover the month window.
pub fn summarize(
    mut snapshots: Vec<CreditSnapshot>,
    current_credits: f64,
    now: DateTime<Utc>,
) -> CreditHistory {
    let spending_for =
        |period: SpendingPeriod| calculate_spending(&snapshots, current_credits, &period.window(now));

    let spending = SpendingSummary {
        day: spending_for(SpendingPeriod::Day),
        three_days: spending_for(SpendingPeriod::ThreeDays),
        week: spending_for(SpendingPeriod::Week),
        month: spending_for(SpendingPeriod::Month),
    };
    let daily = daily_breakdown(&snapshots, current_credits, now);

    let total_snapshots = snapshots.len();
    CreditHistory {
        current_credits,
        spending,
        daily_breakdown: daily,
        total_snapshots,
        last_snapshot: snapshots.pop(),
    }
}
