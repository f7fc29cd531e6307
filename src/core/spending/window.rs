use crate::core::models::credits::CreditSnapshot;
use crate::core::models::spending::{CreditSpending, SpendingWindow};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Compute spending over `window` from ascending `snapshots`.
///
/// The start balance is the earliest snapshot inside the window; the end
/// balance is always the live `current_credits`. A window without snapshots
/// reports zero spend with both balances equal to `current_credits`.
pub fn calculate_spending(
    snapshots: &[CreditSnapshot],
    current_credits: f64,
    window: &SpendingWindow,
) -> CreditSpending {
    let first_in_window = snapshots
        .iter()
        .find(|s| s.timestamp >= window.start && s.timestamp <= window.end);

    let Some(first) = first_in_window else {
        return CreditSpending {
            period: window.period,
            start_credits: current_credits,
            end_credits: current_credits,
            spent: 0.0,
            start_date: window.start,
            end_date: window.end,
            average_per_day: 0.0,
            average_per_hour: 0.0,
        };
    };

    let start_credits = first.credits;
    let end_credits = current_credits;
    let spent = (start_credits - end_credits).max(0.0);

    let days = window_days(window);
    let hours = days * 24.0;

    CreditSpending {
        period: window.period,
        start_credits,
        end_credits,
        spent,
        start_date: window.start,
        end_date: window.end,
        average_per_day: spent / days,
        average_per_hour: spent / hours,
    }
}

/// Window length in fractional days, never below one.
pub fn window_days(window: &SpendingWindow) -> f64 {
    let seconds = (window.end - window.start).num_milliseconds() as f64 / 1000.0;
    (seconds / SECONDS_PER_DAY).max(1.0)
}
