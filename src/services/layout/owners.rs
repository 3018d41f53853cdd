use std::collections::HashMap;

use crate::models::event::EventId;

/// Per-owner lookup of event ids by calendar source.
#[derive(Debug, Clone, Default)]
pub struct OwnerEvents {
    sources: HashMap<String, Vec<EventId>>,
}

impl OwnerEvents {
    pub fn register(&mut self, source: &str, id: EventId) {
        self.sources.entry(source.to_string()).or_default().push(id);
    }

    pub fn remove(&mut self, source: &str, id: EventId) {
        if let Some(ids) = self.sources.get_mut(source) {
            ids.retain(|event| *event != id);
            if ids.is_empty() {
                self.sources.remove(source);
            }
        }
    }

    pub fn from_source(&self, source: &str) -> &[EventId] {
        self.sources.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all(&self) -> impl Iterator<Item = EventId> + '_ {
        self.sources.values().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
