use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::models::credits::CreditSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpendingPeriod {
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "3days")]
    ThreeDays,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
}

impl SpendingPeriod {
    pub fn all() -> &'static [SpendingPeriod] {
        &[
            SpendingPeriod::Day,
            SpendingPeriod::ThreeDays,
            SpendingPeriod::Week,
            SpendingPeriod::Month,
        ]
    }

    /// Look-back length in days.
    pub fn days(&self) -> i64 {
        match self {
            Self::Day => 1,
            Self::ThreeDays => 3,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::ThreeDays => "3 Days",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }

    /// Window ending at `now` and starting at midnight UTC of `now - days()`.
    pub fn window(&self, now: DateTime<Utc>) -> SpendingWindow {
        let start_day = (now - Duration::days(self.days())).date_naive();
        SpendingWindow {
            period: *self,
            start: start_day.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: now,
        }
    }
}

/// The boundaries a `CreditSpending` was computed over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendingWindow {
    pub period: SpendingPeriod,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditSpending {
    pub period: SpendingPeriod,
    pub start_credits: f64,
    pub end_credits: f64,
    /// Never negative; top-ups count as zero spend
    pub spent: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub average_per_day: f64,
    pub average_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySpending {
    pub date: NaiveDate,
    pub start_credits: f64,
    pub end_credits: f64,
    pub spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub day: CreditSpending,
    pub three_days: CreditSpending,
    pub week: CreditSpending,
    pub month: CreditSpending,
}

/// Payload of `GET /api/credits/history` and `cw history --json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditHistory {
    pub current_credits: f64,
    pub spending: SpendingSummary,
    /// At most seven entries, oldest first
    pub daily_breakdown: Vec<DailySpending>,
    pub total_snapshots: usize,
    pub last_snapshot: Option<CreditSnapshot>,
}
