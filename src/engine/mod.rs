//! Engine facade owning one calendar's layout index and selection set.
//!
//! Every mutation takes `&mut self` and runs to completion, cascade included,
//! before anything is delivered to engine subscribers. Those subscribers get
//! the whole engine by shared reference, so a renderer reacting to `update`
//! can ask for `get_day_events` directly. A handler that wants to change
//! something calls [`IntervalEngine::defer`]; deferred commands run one by
//! one after the triggering operation has settled and its notifications have
//! gone out. Two mutations are never interleaved.
//!
//! The engine is `Send`; a multi-threaded host guards it with a single mutex.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::EngineError;
use crate::models::event::{EventId, EventRecord};
use crate::models::interval::Instant;
use crate::models::selection::SelectionId;
use crate::models::settings::EngineSettings;
use crate::services::layout::{EventLayoutIndex, LayoutTopic};
use crate::services::notification::{NotificationChannel, Topic};
use crate::services::selection::{SelectionNotice, SelectionSet, SelectionTopic};
use crate::services::settings::SettingsService;

mod command;

pub use command::EngineCommand;

/// Topics delivered by [`IntervalEngine::notifications`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineTopic {
    Layout(LayoutTopic),
    Selection(SelectionTopic),
}

impl Topic for EngineTopic {
    fn name(&self) -> &'static str {
        match self {
            EngineTopic::Layout(topic) => topic.name(),
            EngineTopic::Selection(topic) => topic.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineNotice {
    Event(EventId),
    Selection(SelectionId),
}

impl From<SelectionNotice> for EngineNotice {
    fn from(notice: SelectionNotice) -> Self {
        match notice {
            SelectionNotice::Selection(id) => EngineNotice::Selection(id),
            SelectionNotice::Event(id) => EngineNotice::Event(id),
        }
    }
}

pub type EngineChannel = NotificationChannel<EngineTopic, IntervalEngine, EngineNotice>;

// Component notifications waiting to be delivered at engine level.
type Relay = Arc<Mutex<Vec<(EngineTopic, EngineNotice)>>>;

const SELECTION_TOPICS: [SelectionTopic; 5] = [
    SelectionTopic::Create,
    SelectionTopic::Update,
    SelectionTopic::Remove,
    SelectionTopic::SelectEvent,
    SelectionTopic::DeselectEvent,
];

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct IntervalEngine {
    settings: EngineSettings,
    layout: EventLayoutIndex,
    selections: SelectionSet,
    relayed: Relay,
    deferred: Mutex<VecDeque<EngineCommand>>,
    notifications: EngineChannel,
}

impl IntervalEngine {
    pub fn new(settings: EngineSettings) -> Self {
        log::info!(
            "Starting interval engine (day boundaries in {})",
            settings.calendar.timezone
        );
        let layout = EventLayoutIndex::with_settings(&settings.calendar);
        let selections = SelectionSet::with_settings(&settings.selection);
        let relayed = Relay::default();

        for topic in [LayoutTopic::Add, LayoutTopic::Remove] {
            let relayed = Arc::clone(&relayed);
            layout.notifications().subscribe(topic, move |_, id| {
                lock(&relayed).push((EngineTopic::Layout(topic), EngineNotice::Event(*id)))
            });
        }
        for topic in SELECTION_TOPICS {
            let relayed = Arc::clone(&relayed);
            selections.notifications().subscribe(topic, move |_, notice| {
                lock(&relayed).push((EngineTopic::Selection(topic), (*notice).into()))
            });
        }

        Self {
            settings,
            layout,
            selections,
            relayed,
            deferred: Mutex::new(VecDeque::new()),
            notifications: NotificationChannel::new(),
        }
    }

    /// Build from the settings file at the platform default location.
    pub fn from_default_settings() -> anyhow::Result<Self> {
        let settings = SettingsService::with_default_path()?.load()?;
        Ok(Self::new(settings))
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn layout(&self) -> &EventLayoutIndex {
        &self.layout
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    /// Engine-level notifications, delivered with the settled engine.
    ///
    /// Subscribers of the component channels are called first, from inside
    /// the component operation; these run once it has returned.
    pub fn notifications(&self) -> &EngineChannel {
        &self.notifications
    }

    /// Queue `command` to run after the operation in progress has settled.
    ///
    /// Outside of any operation the command waits for the next one.
    pub fn defer(&self, command: EngineCommand) {
        log::debug!("Deferring {:?}", command);
        lock(&self.deferred).push_back(command);
    }

    /// Number of commands waiting to run.
    pub fn deferred_len(&self) -> usize {
        lock(&self.deferred).len()
    }

    /// Run `command` now, then everything it causes handlers to defer.
    ///
    /// Only the command's own error is returned; failures of deferred
    /// commands are logged.
    pub fn apply(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        let result = self.execute(command);
        self.settle();
        result
    }

    pub fn register_event(&mut self, record: EventRecord) -> Result<EventId, EngineError> {
        let result = self.layout.register_event(record);
        self.settle();
        result
    }

    pub fn remove_event(&mut self, id: EventId) -> Option<EventRecord> {
        let removed = self.layout.remove_event(id);
        self.settle();
        removed
    }

    pub fn begin_selection(
        &mut self,
        start: Instant,
        end: Instant,
        additive: bool,
    ) -> Result<SelectionId, EngineError> {
        let result = self.selections.begin_selection(start, end, additive);
        self.settle();
        result
    }

    pub fn update_selection(
        &mut self,
        id: SelectionId,
        start: Instant,
        end: Instant,
    ) -> Result<(), EngineError> {
        self.apply(EngineCommand::UpdateSelection { id, start, end })
    }

    pub fn update_selection_start(
        &mut self,
        id: SelectionId,
        start: Instant,
    ) -> Result<(), EngineError> {
        self.apply(EngineCommand::UpdateSelectionStart { id, start })
    }

    pub fn update_selection_end(&mut self, id: SelectionId, end: Instant) -> Result<(), EngineError> {
        self.apply(EngineCommand::UpdateSelectionEnd { id, end })
    }

    pub fn remove_selection(&mut self, id: SelectionId) -> bool {
        let removed = self.selections.remove_selection(id);
        self.settle();
        removed
    }

    pub fn clear_selections(&mut self) {
        self.selections.clear();
        self.settle();
    }

    pub fn release_selection(&mut self) {
        self.selections.release_selection();
        self.settle();
    }

    /// Toggle the pick on a registered event.
    ///
    /// # Errors
    /// `UnknownEvent` when the layout holds no event with this id.
    pub fn select_event(&mut self, id: EventId) -> Result<(), EngineError> {
        self.apply(EngineCommand::SelectEvent(id))
    }

    pub fn deselect_event(&mut self, id: EventId) {
        self.selections.deselect_event(id);
        self.settle();
    }

    pub fn clear_selected_events(&mut self) {
        self.selections.clear_selected_events();
        self.settle();
    }

    // Deliver what the last operation raised, then drain deferred commands,
    // delivering after each one.
    fn settle(&mut self) {
        self.deliver();
        while let Some(command) = self.next_deferred() {
            log::debug!("Running deferred {:?}", command);
            if let Err(e) = self.execute(command) {
                log::warn!("Deferred command failed: {}", e);
            }
            self.deliver();
        }
    }

    fn next_deferred(&self) -> Option<EngineCommand> {
        lock(&self.deferred).pop_front()
    }

    fn deliver(&self) {
        let pending = std::mem::take(&mut *lock(&self.relayed));
        for (topic, notice) in pending {
            self.notifications.publish(topic, self, &notice);
        }
    }
}

impl Default for IntervalEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::models::event::UserId;
    use crate::models::interval::Interval;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> Instant {
        Utc.with_ymd_and_hms(2025, 5, 12, hour, minute, 0).unwrap()
    }

    fn assert_send<T: Send>() {}

    type Seen = Arc<Mutex<Vec<(&'static str, EngineNotice)>>>;

    fn watch(engine: &IntervalEngine, topics: &[EngineTopic]) -> Seen {
        let seen: Seen = Arc::default();
        for &topic in topics {
            let seen = Arc::clone(&seen);
            engine
                .notifications()
                .subscribe(topic, move |_, notice| seen.lock().unwrap().push((topic.name(), *notice)));
        }
        seen
    }

    #[test]
    fn test_engine_is_send() {
        assert_send::<IntervalEngine>();
    }

    #[test]
    fn test_settings_flow_into_components() {
        let mut settings = EngineSettings::default();
        settings.calendar.timezone = chrono_tz::Europe::Berlin;
        let engine = IntervalEngine::new(settings);

        assert_eq!(engine.layout().timezone(), chrono_tz::Europe::Berlin);
        assert!(engine.selections().is_empty());
    }

    #[test]
    fn test_component_notifications_reach_engine_subscribers() {
        let mut engine = IntervalEngine::default();
        let seen = watch(
            &engine,
            &[
                EngineTopic::Layout(LayoutTopic::Add),
                EngineTopic::Selection(SelectionTopic::Create),
            ],
        );

        let event = engine
            .register_event(EventRecord::new(
                UserId(1),
                Interval::new(at(9, 0), at(10, 0)).unwrap(),
                "Standup".to_string(),
            ))
            .unwrap();
        let selection = engine.begin_selection(at(11, 0), at(12, 0), false).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("add", EngineNotice::Event(event)),
                ("create", EngineNotice::Selection(selection)),
            ]
        );
    }

    #[test]
    fn test_deferred_command_runs_after_cascade() {
        let mut engine = IntervalEngine::default();
        let first = engine.begin_selection(at(9, 0), at(10, 0), false).unwrap();
        let second = engine.begin_selection(at(10, 30), at(12, 0), true).unwrap();
        let seen = watch(
            &engine,
            &[
                EngineTopic::Selection(SelectionTopic::Update),
                EngineTopic::Selection(SelectionTopic::Remove),
            ],
        );
        // The trimmed neighbour is dropped as soon as it is reported.
        engine.notifications().subscribe(
            EngineTopic::Selection(SelectionTopic::Update),
            move |engine, notice| {
                let still_there = engine.selections().get(second).is_some();
                if *notice == EngineNotice::Selection(second) && still_there {
                    engine.defer(EngineCommand::RemoveSelection(second));
                }
            },
        );

        engine.update_selection_end(first, at(11, 0)).unwrap();

        assert!(engine.selections().get(second).is_none());
        assert_eq!(engine.deferred_len(), 0);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("update", EngineNotice::Selection(first)),
                ("update", EngineNotice::Selection(second)),
                ("remove", EngineNotice::Selection(second)),
            ]
        );
    }

    #[test]
    fn test_failed_deferred_command_is_dropped() {
        let mut engine = IntervalEngine::default();
        engine.notifications().subscribe(
            EngineTopic::Selection(SelectionTopic::Create),
            |engine, _| engine.defer(EngineCommand::RemoveEvent(EventId(404))),
        );
        engine.notifications().subscribe(
            EngineTopic::Selection(SelectionTopic::Create),
            |engine, _| engine.defer(EngineCommand::SelectEvent(EventId(404))),
        );

        assert!(engine.begin_selection(at(9, 0), at(10, 0), false).is_ok());
        assert_eq!(engine.deferred_len(), 0);
        assert!(engine.selections().get_selected_events().is_empty());
    }

    #[test]
    fn test_select_event_requires_registered_event() {
        let mut engine = IntervalEngine::default();
        assert_eq!(
            engine.select_event(EventId(5)),
            Err(EngineError::Validation(ValidationError::UnknownEvent(EventId(5))))
        );
        assert!(!engine.selections().is_event_selected(EventId(5)));
    }
}
