//! Picked-event toggle set, kept beside the selections but independent of them.

use std::collections::BTreeSet;

use super::{SelectionNotice, SelectionSet, SelectionTopic};
use crate::models::event::EventId;

impl SelectionSet {
    /// Toggle `id` as the single picked event.
    ///
    /// Everything picked is dropped first; picking the event that was already
    /// picked therefore leaves nothing picked.
    pub fn select_event(&mut self, id: EventId) {
        let was_selected = self.selected_events.contains(&id);
        self.clear_selected_inner();
        if !was_selected {
            self.selected_events.insert(id);
            log::debug!("Picked {}", id);
            self.queue(SelectionTopic::SelectEvent, SelectionNotice::Event(id));
        }
        self.flush();
    }

    pub fn deselect_event(&mut self, id: EventId) {
        self.deselect_inner(id);
        self.flush();
    }

    pub fn is_event_selected(&self, id: EventId) -> bool {
        self.selected_events.contains(&id)
    }

    pub fn clear_selected_events(&mut self) {
        self.clear_selected_inner();
        self.flush();
    }

    pub fn get_selected_events(&self) -> &BTreeSet<EventId> {
        &self.selected_events
    }

    fn deselect_inner(&mut self, id: EventId) {
        if self.selected_events.remove(&id) {
            self.queue(SelectionTopic::DeselectEvent, SelectionNotice::Event(id));
        }
    }

    fn clear_selected_inner(&mut self) {
        let picked: Vec<EventId> = self.selected_events.iter().copied().collect();
        for id in picked {
            self.deselect_inner(id);
        }
    }
}
