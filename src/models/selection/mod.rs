// Selection module
// User-staged time range with the bounds it was created with

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::models::interval::{Instant, Interval};

/// Selection identifier, minted by the selection set and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectionId(pub u64);

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selection#{}", self.0)
    }
}

/// A staged time range.
///
/// `anchor_start`/`anchor_end` keep the bounds from creation; their span is
/// the duration restored when a handle is dragged past the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: SelectionId,
    pub start: Instant,
    pub end: Instant,
    pub anchor_start: Instant,
    pub anchor_end: Instant,
}

impl Selection {
    pub fn new(id: SelectionId, interval: Interval) -> Self {
        Self {
            id,
            start: interval.start,
            end: interval.end,
            anchor_start: interval.start,
            anchor_end: interval.end,
        }
    }

    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    pub fn anchor_duration(&self) -> Duration {
        self.anchor_end - self.anchor_start
    }

    pub fn collides_with(&self, other: &Selection) -> bool {
        self.interval().collides_with(&other.interval())
    }
}
