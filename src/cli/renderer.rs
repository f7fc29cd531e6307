use chrono::{DateTime, Utc};
use colored::{control, ColoredString, Colorize};

use creditwatch::core::formatter::{format_age, format_credits, format_rate};
use creditwatch::core::models::spending::{CreditHistory, CreditSpending};

/// Render a credit history report as a colored (or plain) string.
///
/// Layout:
/// ```text
///  Credits   1,234.56 credits
///   Day       12.40 spent   12.40/day  0.52/h
///   3 Days    30.10 spent   10.03/day  0.42/h
///   Week      70.00 spent   10.00/day  0.42/h
///   Month    301.25 spent    9.72/day  0.40/h
///   Recent Days:
///     Oct 14    10.20
///     Oct 15    11.00
///   Snapshots 42 (last 3h ago)
/// ```
pub fn render_history(history: &CreditHistory, now: &DateTime<Utc>, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        " {}   {}",
        "Credits".bold(),
        format_credits(history.current_credits)
    ));

    for spending in [
        &history.spending.day,
        &history.spending.three_days,
        &history.spending.week,
        &history.spending.month,
    ] {
        lines.push(render_spending(spending));
    }

    if !history.daily_breakdown.is_empty() {
        lines.push(format!("  {}:", "Recent Days".cyan()));
        for day in &history.daily_breakdown {
            let spent = format!("{:>9.2}", day.spent);
            lines.push(format!(
                "    {:<8} {}",
                day.date.format("%b %d").to_string(),
                color_by_spend(day.spent, &spent)
            ));
        }
    }

    let last = history
        .last_snapshot
        .as_ref()
        .map(|s| format!(" (last {})", format_age(&s.timestamp, now)))
        .unwrap_or_default();
    lines.push(format!(
        "  {} {}{}",
        "Snapshots".cyan(),
        history.total_snapshots,
        last.dimmed()
    ));

    lines.join("\n")
}

fn render_spending(spending: &CreditSpending) -> String {
    let label = format!("{:<7}", spending.period.label());
    let spent = format!("{:>9.2} spent", spending.spent);
    format!(
        "  {}  {}  {:>10}  {:>8}",
        label.cyan(),
        color_by_spend(spending.spent, &spent),
        format_rate(spending.average_per_day, "day"),
        format_rate(spending.average_per_hour, "h")
    )
}

/// Zero spend is dimmed so days with activity stand out.
fn color_by_spend(spent: f64, text: &str) -> ColoredString {
    if spent > 0.0 {
        text.yellow()
    } else {
        text.dimmed()
    }
}
