use crate::domain::account::Timestamp;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const INVALID_DATE: &str = "Invalid Date";
const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

fn format_in(timestamp: Timestamp, tz: Tz, pattern: &str) -> String {
    match timestamp.value() {
        Some(instant) => instant.with_timezone(&tz).format(pattern).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// `3/13/2024, 3:45:00 PM`
pub fn format_locale_timestamp(timestamp: Timestamp, tz: Tz) -> String {
    format_in(timestamp, tz, "%-m/%-d/%Y, %-I:%M:%S %p")
}

/// `Mar 13, 3:45 PM`
pub fn format_trade_timestamp(timestamp: Timestamp, tz: Tz) -> String {
    format_in(timestamp, tz, "%b %-d, %-I:%M %p")
}

/// `3:45 PM`
pub fn format_time_of_day(timestamp: Timestamp, tz: Tz) -> String {
    format_in(timestamp, tz, "%-I:%M %p")
}

/// Time held since `since`: `Nh` under a day, `Nd Mh` after.
/// Future instants count as zero elapsed.
pub fn format_elapsed(since: Timestamp, now: DateTime<Utc>) -> String {
    let Some(since) = since.millis() else {
        return INVALID_DATE.to_string();
    };
    let hours = (now.timestamp_millis() - since).max(0) / MILLIS_PER_HOUR;
    if hours < 24 { format!("{}h", hours) } else { format!("{}d {}h", hours / 24, hours % 24) }
}

/// Remaining time until `target` as `Nh Nm Ns`, floored and clamped at zero.
pub fn format_countdown(target: Timestamp, now: DateTime<Utc>) -> String {
    let Some(target) = target.millis() else {
        return INVALID_DATE.to_string();
    };
    let remaining = target - now.timestamp_millis();
    if remaining <= 0 {
        return "0h 0m 0s".to_string();
    }
    let seconds = remaining / 1000;
    format!("{}h {}m {}s", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}
