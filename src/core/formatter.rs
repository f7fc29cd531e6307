use chrono::{DateTime, Utc};

/// Returns "1,234.56 credits".
pub fn format_credits(credits: f64) -> String {
    format!("{} credits", group_thousands(credits))
}

/// Returns "12.34/day" style rate strings with a fixed two-decimal precision.
pub fn format_rate(value: f64, unit: &str) -> String {
    format!("{:.2}/{}", value, unit)
}

/// Returns "3h ago", "2d ago" or "just now" relative to `now`.
pub fn format_age(at: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = (*now - *at).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else {
        format!("{}m ago", minutes)
    }
}

/// Two-decimal number with comma thousands separators.
fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn format_credits_two_decimals() {
        assert_eq!(format_credits(123.45), "123.45 credits");
        assert_eq!(format_credits(0.0), "0.00 credits");
        assert_eq!(format_credits(5.0), "5.00 credits");
    }

    #[test]
    fn format_credits_groups_thousands() {
        assert_eq!(format_credits(1234.5), "1,234.50 credits");
        assert_eq!(format_credits(1_234_567.891), "1,234,567.89 credits");
        assert_eq!(format_credits(-1500.0), "-1,500.00 credits");
    }

    #[test]
    fn format_rate_units() {
        assert_eq!(format_rate(12.345, "day"), "12.35/day");
        assert_eq!(format_rate(0.5, "h"), "0.50/h");
    }

    #[test]
    fn format_age_buckets() {
        let now = Utc::now();
        assert_eq!(format_age(&now, &now), "just now");
        assert_eq!(format_age(&(now - Duration::minutes(5)), &now), "5m ago");
        assert_eq!(format_age(&(now - Duration::hours(3)), &now), "3h ago");
        assert_eq!(format_age(&(now - Duration::hours(50)), &now), "2d ago");
    }
}
