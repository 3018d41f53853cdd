// Interval module
// Half-open time range shared by events and selections

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Point in time handled by the engine. Callers resolve their own zones.
pub type Instant = DateTime<Utc>;

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: Instant,
    pub end: Instant,
}

impl Interval {
    /// Create a validated interval.
    ///
    /// # Examples
    /// ```
    /// use interval_engine::models::interval::Interval;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let interval = Interval::new(start, start + Duration::hours(1)).unwrap();
    /// assert_eq!(interval.duration(), Duration::hours(1));
    /// assert!(Interval::new(start, start).is_err());
    /// ```
    pub fn new(start: Instant, end: Instant) -> Result<Self, ValidationError> {
        let interval = Self { start, end };
        interval.validate()?;
        Ok(interval)
    }

    /// Build an interval from two bounds given in either order.
    pub fn ordered(a: Instant, b: Instant) -> Result<Self, ValidationError> {
        if b < a {
            Self::new(b, a)
        } else {
            Self::new(a, b)
        }
    }

    /// Reject zero-length and reversed intervals.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end <= self.start {
            return Err(ValidationError::EmptyInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Half-open overlap test.
    pub fn collides_with(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn contains_instant(&self, instant: Instant) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
