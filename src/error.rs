//! Error types for the interval engine.

use thiserror::Error;

use crate::models::event::EventId;
use crate::models::interval::Instant;
use crate::models::selection::SelectionId;

/// Main error type returned by engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input rejected at the call site. The engine state is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Interval end {end} must be after start {start}")]
    EmptyInterval { start: Instant, end: Instant },

    #[error("Unknown selection: {0}")]
    UnknownSelection(SelectionId),

    #[error("Unknown event: {0}")]
    UnknownEvent(EventId),

    #[error("Event {0} is already registered")]
    DuplicateEvent(EventId),
}

/// Internal defect. Never returned; raised through [`InvariantViolation::raise`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Bounds resolution for selection {selection} did not settle within {steps} steps")]
    UnboundedCascade { selection: SelectionId, steps: usize },

    #[error("Event {event} was assigned cluster widths {first} and {second}")]
    InconsistentClusterWidth {
        event: EventId,
        first: u32,
        second: u32,
    },
}

impl InvariantViolation {
    /// Log the violation and abort the current operation.
    pub fn raise(self) -> ! {
        log::error!("Invariant violation: {}", self);
        panic!("interval engine invariant violated: {}", self);
    }
}
