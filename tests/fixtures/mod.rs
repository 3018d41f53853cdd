// Test fixtures - reusable test data
// Provides consistent instants and records across all test files

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use interval_engine::models::event::{EventId, EventRecord, UserId};
use interval_engine::models::interval::{Instant, Interval};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday Mar 10, 2025, the day most scenarios run on
    pub fn scenario_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    /// Time of day on the scenario day, in UTC
    pub fn at(hour: u32, minute: u32) -> Instant {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    /// Midnight of the scenario day plus `minutes`
    pub fn minutes_into_day(minutes: i64) -> Instant {
        at(0, 0) + Duration::minutes(minutes)
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub const OWNER: UserId = UserId(1);

    pub fn interval(start: Instant, end: Instant) -> Interval {
        Interval::new(start, end).unwrap()
    }

    /// Record with a caller-chosen id on the scenario day
    pub fn meeting(id: u64, from: (u32, u32), to: (u32, u32)) -> EventRecord {
        EventRecord::new(
            OWNER,
            interval(dates::at(from.0, from.1), dates::at(to.0, to.1)),
            format!("Meeting {}", id),
        )
        .with_id(EventId(id))
        .with_source("work")
    }
}
