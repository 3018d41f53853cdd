use crate::models::event::EventId;

/// Events touching one calendar day, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBucket {
    events: Vec<EventId>,
}

impl DayBucket {
    pub fn insert(&mut self, id: EventId) {
        if !self.contains(id) {
            self.events.push(id);
        }
    }

    pub fn remove(&mut self, id: EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|event| *event != id);
        self.events.len() != before
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains(&id)
    }

    pub fn ids(&self) -> &[EventId] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
