// Date utility functions
// Day boundaries are computed in a caller-chosen zone; instants stay in UTC.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::interval::{Instant, Interval};

pub const ONE_DAY_MS: i64 = 1000 * 60 * 60 * 24;
pub const ONE_HOUR_MS: i64 = 1000 * 60 * 60;
pub const ONE_MIN_MS: i64 = 1000 * 60;

/// Calendar day containing `instant` in `tz`.
pub fn day_key(tz: &Tz, instant: Instant) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

pub fn is_same_day(tz: &Tz, a: Instant, b: Instant) -> bool {
    day_key(tz, a) == day_key(tz, b)
}

/// First instant of `date` in `tz`.
///
/// When local midnight falls in a DST gap the first existing local time of
/// the day is used.
pub fn start_of_day(tz: &Tz, date: NaiveDate) -> Instant {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut probe = midnight;
    // Gaps never exceed a day.
    while probe - midnight < Duration::milliseconds(ONE_DAY_MS) {
        if let Some(local) = tz.from_local_datetime(&probe).earliest() {
            return local.with_timezone(&Utc);
        }
        probe += Duration::minutes(30);
    }
    Utc.from_utc_datetime(&midnight)
}

/// Every day the interval intersects, in order.
///
/// The day on which `end` falls is excluded when `end` is exactly its midnight.
pub fn days_touched(tz: &Tz, interval: &Interval) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = day_key(tz, interval.start);
    while start_of_day(tz, day) < interval.end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// Time elapsed since the local midnight of the instant's day.
pub fn day_time(tz: &Tz, instant: Instant) -> Duration {
    instant - start_of_day(tz, day_key(tz, instant))
}

/// Format a time-of-day offset as `HH:MM`, or `HH` without minutes.
pub fn format_day_time(elapsed: Duration, with_minutes: bool) -> String {
    let total_ms = elapsed.num_milliseconds();
    let hours = total_ms / ONE_HOUR_MS;
    if !with_minutes {
        return format!("{:02}", hours);
    }
    let minutes = (total_ms % ONE_HOUR_MS) / ONE_MIN_MS;
    format!("{:02}:{:02}", hours, minutes)
}

/// ISO 8601 week number.
pub fn week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}
