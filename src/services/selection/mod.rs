//! Selection interval set.
//! Holds the time ranges a user is staging, keeps them from overlapping while
//! they are edited, and tracks which existing event is picked.
//!
//! Notifications raised while an operation runs are queued and dispatched in
//! order once the operation, including any cascade, has settled. Subscribers
//! get the settled set by shared reference, so they can read it but not edit it
//! from inside a handler.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{EngineError, ValidationError};
use crate::models::event::EventId;
use crate::models::interval::{Instant, Interval};
use crate::models::selection::{Selection, SelectionId};
use crate::models::settings::SelectionSettings;
use crate::services::notification::{NotificationChannel, Topic};

mod bounds;
mod picked;

/// Notifications published by [`SelectionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionTopic {
    Create,
    Update,
    Remove,
    SelectEvent,
    DeselectEvent,
}

impl Topic for SelectionTopic {
    fn name(&self) -> &'static str {
        match self {
            SelectionTopic::Create => "create",
            SelectionTopic::Update => "update",
            SelectionTopic::Remove => "remove",
            SelectionTopic::SelectEvent => "select-event",
            SelectionTopic::DeselectEvent => "deselect-event",
        }
    }
}

/// Payload of a selection notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionNotice {
    Selection(SelectionId),
    Event(EventId),
}

pub type SelectionChannel = NotificationChannel<SelectionTopic, SelectionSet, SelectionNotice>;

#[derive(Debug)]
pub struct SelectionSet {
    selections: BTreeMap<SelectionId, Selection>,
    next_id: u64,
    editing: Option<SelectionId>,
    current: Option<SelectionId>,
    selected_events: BTreeSet<EventId>,
    max_cascade_steps: usize,
    outbox: Vec<(SelectionTopic, SelectionNotice)>,
    notifications: SelectionChannel,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::with_settings(&SelectionSettings::default())
    }

    pub fn with_settings(settings: &SelectionSettings) -> Self {
        Self {
            selections: BTreeMap::new(),
            next_id: 0,
            editing: None,
            current: None,
            selected_events: BTreeSet::new(),
            max_cascade_steps: settings.max_cascade_steps,
            outbox: Vec::new(),
            notifications: NotificationChannel::new(),
        }
    }

    pub fn notifications(&self) -> &SelectionChannel {
        &self.notifications
    }

    /// Start a new selection, making it both current and editing.
    ///
    /// Unless `additive`, every existing selection is removed first. Bounds
    /// given in reverse order are swapped.
    pub fn begin_selection(
        &mut self,
        start: Instant,
        end: Instant,
        additive: bool,
    ) -> Result<SelectionId, EngineError> {
        let interval = Interval::ordered(start, end).map_err(|e| {
            log::warn!("Rejected selection: {}", e);
            e
        })?;

        if !additive {
            for id in self.list_ids() {
                self.remove_inner(id);
            }
        }

        self.next_id += 1;
        let id = SelectionId(self.next_id);
        self.selections.insert(id, Selection::new(id, interval));
        self.editing = Some(id);
        self.current = Some(id);
        log::debug!(
            "Began {} [{} - {}) additive={}",
            id,
            interval.start,
            interval.end,
            additive
        );

        self.queue(SelectionTopic::Create, SelectionNotice::Selection(id));
        self.queue(SelectionTopic::Update, SelectionNotice::Selection(id));
        self.flush();
        Ok(id)
    }

    /// Replace both bounds of a selection and reset its anchor to them.
    ///
    /// This is a full reset: later handle drags that cross over flip by the
    /// new duration, not by the one the selection was begun with.
    pub fn update_selection(
        &mut self,
        id: SelectionId,
        start: Instant,
        end: Instant,
    ) -> Result<(), EngineError> {
        let selection = self.existing(id)?;
        let interval = Interval::ordered(start, end)?;
        if selection.interval() == interval {
            return Ok(());
        }

        if let Some(selection) = self.selections.get_mut(&id) {
            *selection = Selection::new(id, interval);
        }
        self.editing = Some(id);
        self.queue(SelectionTopic::Update, SelectionNotice::Selection(id));
        self.settle(id);
        self.flush();
        Ok(())
    }

    /// Drag the start handle. Crossing the end flips the selection forward,
    /// keeping its anchor duration.
    pub fn update_selection_start(
        &mut self,
        id: SelectionId,
        start: Instant,
    ) -> Result<(), EngineError> {
        if self.existing(id)?.start == start {
            return Ok(());
        }

        self.set_start(id, start);
        self.editing = Some(id);
        self.queue(SelectionTopic::Update, SelectionNotice::Selection(id));
        self.settle(id);
        self.flush();
        Ok(())
    }

    /// Drag the end handle. Crossing the start flips the selection backward,
    /// keeping its anchor duration.
    pub fn update_selection_end(&mut self, id: SelectionId, end: Instant) -> Result<(), EngineError> {
        if self.existing(id)?.end == end {
            return Ok(());
        }

        self.set_end(id, end);
        self.editing = Some(id);
        self.queue(SelectionTopic::Update, SelectionNotice::Selection(id));
        self.settle(id);
        self.flush();
        Ok(())
    }

    /// Delete a selection. Unknown ids are ignored.
    pub fn remove_selection(&mut self, id: SelectionId) -> bool {
        let removed = self.remove_inner(id);
        self.flush();
        removed
    }

    /// Delete every selection.
    pub fn clear(&mut self) {
        for id in self.list_ids() {
            self.remove_inner(id);
        }
        self.flush();
    }

    pub fn get(&self, id: SelectionId) -> Option<&Selection> {
        self.selections.get(&id)
    }

    /// Selection ids in creation order.
    pub fn list_ids(&self) -> Vec<SelectionId> {
        self.selections.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.selections.values()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn editing_selection(&self) -> Option<SelectionId> {
        self.editing
    }

    pub fn current_selection(&self) -> Option<SelectionId> {
        self.current
    }

    /// Forget the current selection without deleting it.
    pub fn release_selection(&mut self) {
        self.current = None;
    }

    fn existing(&self, id: SelectionId) -> Result<Selection, ValidationError> {
        self.selections
            .get(&id)
            .copied()
            .ok_or(ValidationError::UnknownSelection(id))
    }

    /// Move the start edge, flipping past the end when needed. Returns whether anything changed.
    fn set_start(&mut self, id: SelectionId, start: Instant) -> bool {
        let Some(selection) = self.selections.get_mut(&id) else {
            return false;
        };
        if selection.start == start {
            return false;
        }
        if start < selection.end {
            selection.start = start;
        } else {
            selection.start = start;
            selection.end = start + selection.anchor_duration();
        }
        log::debug!("{} start -> [{} - {})", id, selection.start, selection.end);
        true
    }

    /// Move the end edge, flipping before the start when needed. Returns whether anything changed.
    fn set_end(&mut self, id: SelectionId, end: Instant) -> bool {
        let Some(selection) = self.selections.get_mut(&id) else {
            return false;
        };
        if selection.end == end {
            return false;
        }
        if end > selection.start {
            selection.end = end;
        } else {
            selection.end = end;
            selection.start = end - selection.anchor_duration();
        }
        log::debug!("{} end -> [{} - {})", id, selection.start, selection.end);
        true
    }

    fn remove_inner(&mut self, id: SelectionId) -> bool {
        if self.selections.remove(&id).is_none() {
            return false;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.current == Some(id) {
            self.current = None;
        }
        log::debug!("Removed {}", id);
        self.queue(SelectionTopic::Remove, SelectionNotice::Selection(id));
        true
    }

    fn queue(&mut self, topic: SelectionTopic, notice: SelectionNotice) {
        self.outbox.push((topic, notice));
    }

    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.outbox);
        let settled: &Self = self;
        for (topic, notice) in pending {
            settled.notifications.publish(topic, settled, &notice);
        }
    }
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new()
    }
}
