//! Event layout index.
//! Files events under every calendar day they touch and packs each day into
//! non-overlapping columns on demand.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::error::{EngineError, ValidationError};
use crate::models::event::{EventId, EventRecord, UserId};
use crate::models::interval::Instant;
use crate::models::settings::CalendarSettings;
use crate::services::notification::{NotificationChannel, Topic};
use crate::utils::date::{day_key, days_touched};

mod day_bucket;
mod owners;
pub mod packer;

pub use day_bucket::DayBucket;
pub use packer::{OverlapPacker, PackedEvent};

use owners::OwnerEvents;

// Minted ids stay within 2^53 so browser renderers can hold them as numbers.
const MAX_MINTED_ID: u64 = (1 << 53) - 1;

/// Notifications published by [`EventLayoutIndex`]. Payload is the event id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutTopic {
    Add,
    Remove,
}

impl Topic for LayoutTopic {
    fn name(&self) -> &'static str {
        match self {
            LayoutTopic::Add => "add",
            LayoutTopic::Remove => "remove",
        }
    }
}

/// Subscribers receive the index itself, already updated, and the event id.
pub type LayoutChannel = NotificationChannel<LayoutTopic, EventLayoutIndex, EventId>;

/// Events of one calendar, indexed by day and by owner.
#[derive(Debug)]
pub struct EventLayoutIndex {
    timezone: Tz,
    events: HashMap<EventId, EventRecord>,
    days: BTreeMap<NaiveDate, DayBucket>,
    owners: HashMap<UserId, OwnerEvents>,
    notifications: LayoutChannel,
}

impl EventLayoutIndex {
    /// Create an empty index whose days begin at midnight in `timezone`.
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            events: HashMap::new(),
            days: BTreeMap::new(),
            owners: HashMap::new(),
            notifications: NotificationChannel::new(),
        }
    }

    pub fn with_settings(settings: &CalendarSettings) -> Self {
        Self::new(settings.timezone)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn notifications(&self) -> &LayoutChannel {
        &self.notifications
    }

    /// Register an event and file it under every day it touches.
    ///
    /// A record without an id receives a fresh one, unique among the
    /// currently registered events.
    ///
    /// # Errors
    /// `EmptyInterval` for a zero-length or reversed interval, `DuplicateEvent`
    /// when the caller's id is already registered. Nothing is stored on error.
    pub fn register_event(&mut self, mut record: EventRecord) -> Result<EventId, EngineError> {
        if let Err(e) = record.validate() {
            log::warn!("Rejected event '{}': {}", record.title, e);
            return Err(e.into());
        }

        let id = match record.id {
            Some(id) if self.events.contains_key(&id) => {
                log::warn!("Rejected event '{}': {} already registered", record.title, id);
                return Err(ValidationError::DuplicateEvent(id).into());
            }
            Some(id) => id,
            None => self.mint_event_id(),
        };
        record.id = Some(id);

        let days = days_touched(&self.timezone, &record.interval);
        for day in &days {
            self.days.entry(*day).or_default().insert(id);
        }
        self.owners
            .entry(record.owner)
            .or_default()
            .register(&record.source, id);

        log::debug!(
            "Registered {} '{}' across {} day(s)",
            id,
            record.title,
            days.len()
        );
        self.events.insert(id, record);
        self.notifications.publish(LayoutTopic::Add, &*self, &id);
        Ok(id)
    }

    /// Remove an event from every index. Unknown ids are ignored.
    pub fn remove_event(&mut self, id: EventId) -> Option<EventRecord> {
        let record = self.events.remove(&id)?;

        for day in days_touched(&self.timezone, &record.interval) {
            if let Some(bucket) = self.days.get_mut(&day) {
                bucket.remove(id);
                if bucket.is_empty() {
                    self.days.remove(&day);
                }
            }
        }

        if let Some(owner) = self.owners.get_mut(&record.owner) {
            owner.remove(&record.source, id);
            if owner.is_empty() {
                self.owners.remove(&record.owner);
            }
        }

        log::debug!("Removed {} '{}'", id, record.title);
        self.notifications.publish(LayoutTopic::Remove, &*self, &id);
        Some(record)
    }

    pub fn get_event(&self, id: EventId) -> Option<&EventRecord> {
        self.events.get(&id)
    }

    /// Like [`get_event`](Self::get_event), for callers that need the event to exist.
    pub fn require_event(&self, id: EventId) -> Result<&EventRecord, ValidationError> {
        self.events.get(&id).ok_or(ValidationError::UnknownEvent(id))
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Packed layout of the day containing `instant`.
    pub fn get_day_events(&self, instant: Instant) -> Vec<PackedEvent> {
        self.get_day_events_on(day_key(&self.timezone, instant))
    }

    /// Packed layout of `date`, ordered by column then start.
    pub fn get_day_events_on(&self, date: NaiveDate) -> Vec<PackedEvent> {
        let Some(bucket) = self.days.get(&date) else {
            return Vec::new();
        };

        let entries = bucket
            .ids()
            .iter()
            .filter_map(|id| self.events.get(id).map(|record| (*id, record.interval)));
        let packed = OverlapPacker::new(entries).pack();
        log::trace!("Packed {} event(s) for {}", packed.len(), date);
        packed
    }

    /// Raw bucket contents for `date`, in registration order.
    pub fn day_event_ids(&self, date: NaiveDate) -> &[EventId] {
        self.days.get(&date).map(DayBucket::ids).unwrap_or(&[])
    }

    /// Days that currently hold at least one event, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn get_events_from_source(&self, owner: UserId, source: &str) -> &[EventId] {
        self.owners
            .get(&owner)
            .map(|events| events.from_source(source))
            .unwrap_or(&[])
    }

    pub fn events_for_owner(&self, owner: UserId) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self
            .owners
            .get(&owner)
            .map(|events| events.all().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    // Rejection sampling against the live id set.
    fn mint_event_id(&self) -> EventId {
        loop {
            let candidate = EventId(rand::random::<u64>() & MAX_MINTED_ID);
            if candidate.0 != 0 && !self.events.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for EventLayoutIndex {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}
