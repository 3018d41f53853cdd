// Event module
// Caller-supplied event record indexed by the layout engine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::interval::{Instant, Interval};

/// Event identifier. Caller-assigned, or minted by the layout index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// Identifier of the user owning an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Calendar event as handed to the engine.
///
/// Records are never mutated once registered; a change of interval or owner
/// is a remove followed by a new registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Option<EventId>,
    pub owner: UserId,
    pub interval: Interval,
    pub title: String,
    pub source: String,
}

impl EventRecord {
    /// Create a record without an id; the layout index mints one on registration.
    pub fn new(owner: UserId, interval: Interval, title: impl Into<String>) -> Self {
        Self {
            id: None,
            owner,
            interval,
            title: title.into(),
            source: String::new(),
        }
    }

    /// Create a builder for constructing records with optional fields
    pub fn builder() -> EventRecordBuilder {
        EventRecordBuilder::new()
    }

    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn start(&self) -> Instant {
        self.interval.start
    }

    pub fn end(&self) -> Instant {
        self.interval.end
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.interval.validate()
    }
}

/// Builder for event records
#[derive(Debug, Default)]
pub struct EventRecordBuilder {
    id: Option<EventId>,
    owner: Option<UserId>,
    start: Option<Instant>,
    end: Option<Instant>,
    title: Option<String>,
    source: Option<String>,
}

impl EventRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn start(mut self, start: Instant) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: Instant) -> Self {
        self.end = Some(end);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Build the record. Missing owner defaults to user 0 and missing title to empty;
    /// missing bounds are an error.
    pub fn build(self) -> Result<EventRecord, String> {
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;
        let interval = Interval::new(start, end).map_err(|e| e.to_string())?;

        Ok(EventRecord {
            id: self.id,
            owner: self.owner.unwrap_or(UserId(0)),
            interval,
            title: self.title.unwrap_or_default(),
            source: self.source.unwrap_or_default(),
        })
    }
}
