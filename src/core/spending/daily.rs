use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::models::credits::CreditSnapshot;
use crate::core::models::spending::DailySpending;

/// Number of most recent days returned by [`daily_breakdown`].
pub const DAILY_BREAKDOWN_DAYS: usize = 7;

/// Per-day spending for the most recent days that have snapshots, oldest first.
///
/// A past day ends at the first snapshot of the next bucket so consecutive
/// entries tile the timeline. Today ends at the live balance.
pub fn daily_breakdown(
    snapshots: &[CreditSnapshot],
    current_credits: f64,
    now: DateTime<Utc>,
) -> Vec<DailySpending> {
    let buckets = bucket_by_day(snapshots);
    let today = now.date_naive();

    let days: Vec<(&NaiveDate, &Vec<&CreditSnapshot>)> = buckets.iter().collect();
    let mut daily: Vec<DailySpending> = Vec::with_capacity(days.len());

    for (i, (date, day_snapshots)) in days.iter().enumerate() {
        // Buckets are never empty
        let (Some(first), Some(last)) = (day_snapshots.first(), day_snapshots.last()) else {
            continue;
        };

        let start_credits = first.credits;
        let end_credits = if **date == today {
            current_credits
        } else if let Some(next_first) = days.get(i + 1).and_then(|(_, next)| next.first()) {
            next_first.credits
        } else {
            last.credits
        };

        daily.push(DailySpending {
            date: **date,
            start_credits,
            end_credits,
            spent: (start_credits - end_credits).max(0.0),
        });
    }

    let skip = daily.len().saturating_sub(DAILY_BREAKDOWN_DAYS);
    daily.split_off(skip)
}

/// Group snapshots by UTC calendar day, preserving input order within a day.
fn bucket_by_day(snapshots: &[CreditSnapshot]) -> BTreeMap<NaiveDate, Vec<&CreditSnapshot>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&CreditSnapshot>> = BTreeMap::new();
    for snapshot in snapshots {
        buckets
            .entry(snapshot.timestamp.date_naive())
            .or_default()
            .push(snapshot);
    }
    buckets
}
