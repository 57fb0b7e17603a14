use chrono::{DateTime, Utc};

#[derive(Clone, Copy)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
}

impl Unit {
    fn name(self) -> &'static str {
        match self {
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
        }
    }

    /// Phrases used instead of a number for small offsets.
    fn idiom(self, value: i64) -> Option<&'static str> {
        match (self, value) {
            (Unit::Second, 0) => Some("now"),
            (Unit::Minute, 0) => Some("this minute"),
            (Unit::Hour, 0) => Some("this hour"),
            (Unit::Day, 0) => Some("today"),
            (Unit::Day, -1) => Some("yesterday"),
            (Unit::Day, 1) => Some("tomorrow"),
            _ => None,
        }
    }
}

fn phrase(value: f64, unit: Unit) -> String {
    let value = value.ceil() as i64;
    if let Some(idiom) = unit.idiom(value) {
        return idiom.to_string();
    }

    let count = value.unsigned_abs();
    let plural = if count == 1 { "" } else { "s" };
    if value < 0 {
        format!("{count} {}{plural} ago", unit.name())
    } else {
        format!("in {count} {}{plural}", unit.name())
    }
}

/// Human description of `time_ms` relative to `now_ms`.
///
/// Anything older than a week is shown as a calendar date.
pub fn relative_time(time_ms: i64, now_ms: i64) -> String {
    let Some(delta_ms) = time_ms.checked_sub(now_ms) else {
        return calendar_date(time_ms);
    };
    let seconds = delta_ms as f64 / 1000.0;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    if seconds > -60.0 {
        phrase(seconds, Unit::Second)
    } else if minutes > -60.0 {
        phrase(minutes, Unit::Minute)
    } else if hours > -24.0 {
        phrase(hours, Unit::Hour)
    } else if days > -7.0 {
        phrase(days, Unit::Day)
    } else {
        calendar_date(time_ms)
    }
}

fn calendar_date(time_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(time_ms)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "a while back".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_792_152_000_000; // 2026-10-16T12:00:00Z
    const SECOND: i64 = 1000;
    const MINUTE: i64 = 60 * SECOND;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    #[test]
    fn just_now() {
        assert_eq!(relative_time(NOW, NOW), "now");
        assert_eq!(relative_time(NOW - 400, NOW), "now");
    }

    #[test]
    fn seconds_and_minutes() {
        assert_eq!(relative_time(NOW - 5 * SECOND, NOW), "5 seconds ago");
        assert_eq!(relative_time(NOW - SECOND, NOW), "1 second ago");
        assert_eq!(relative_time(NOW - 90 * SECOND, NOW), "1 minute ago");
        assert_eq!(relative_time(NOW - 59 * MINUTE, NOW), "59 minutes ago");
    }

    #[test]
    fn hours_and_days() {
        assert_eq!(relative_time(NOW - 3 * HOUR, NOW), "3 hours ago");
        assert_eq!(relative_time(NOW - DAY - HOUR, NOW), "yesterday");
        assert_eq!(relative_time(NOW - 3 * DAY - HOUR, NOW), "3 days ago");
    }

    #[test]
    fn future_times() {
        assert_eq!(relative_time(NOW + 10 * SECOND, NOW), "in 10 seconds");
    }

    #[test]
    fn older_than_a_week_is_a_date() {
        assert_eq!(relative_time(NOW - 30 * DAY, NOW), "September 16, 2026");
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        assert_eq!(relative_time(i64::MIN, NOW), "a while back");
        assert_eq!(relative_time(i64::MIN, i64::MAX), "a while back");
        assert_eq!(relative_time(0, NOW), "January 1, 1970");
    }
}
