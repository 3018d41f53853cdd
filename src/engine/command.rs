use crate::error::EngineError;
use crate::models::event::{EventId, EventRecord};
use crate::models::interval::Instant;
use crate::models::selection::SelectionId;

use super::IntervalEngine;

/// A mutation a notification handler asks the engine to run later.
///
/// Handlers only see the engine by shared reference. They hand commands to
/// [`IntervalEngine::defer`], and the engine runs them once the operation that
/// raised the notification has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    RegisterEvent(EventRecord),
    RemoveEvent(EventId),
    BeginSelection {
        start: Instant,
        end: Instant,
        additive: bool,
    },
    UpdateSelection {
        id: SelectionId,
        start: Instant,
        end: Instant,
    },
    UpdateSelectionStart {
        id: SelectionId,
        start: Instant,
    },
    UpdateSelectionEnd {
        id: SelectionId,
        end: Instant,
    },
    RemoveSelection(SelectionId),
    ClearSelections,
    ReleaseSelection,
    SelectEvent(EventId),
    DeselectEvent(EventId),
    ClearSelectedEvents,
}

impl IntervalEngine {
    /// Run one command against the components without delivering
    /// engine-level notifications.
    pub(super) fn execute(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        match command {
            EngineCommand::RegisterEvent(record) => {
                self.layout.register_event(record)?;
            }
            EngineCommand::RemoveEvent(id) => {
                self.layout.remove_event(id);
            }
            EngineCommand::BeginSelection {
                start,
                end,
                additive,
            } => {
                self.selections.begin_selection(start, end, additive)?;
            }
            EngineCommand::UpdateSelection { id, start, end } => {
                self.selections.update_selection(id, start, end)?;
            }
            EngineCommand::UpdateSelectionStart { id, start } => {
                self.selections.update_selection_start(id, start)?;
            }
            EngineCommand::UpdateSelectionEnd { id, end } => {
                self.selections.update_selection_end(id, end)?;
            }
            EngineCommand::RemoveSelection(id) => {
                self.selections.remove_selection(id);
            }
            EngineCommand::ClearSelections => self.selections.clear(),
            EngineCommand::ReleaseSelection => self.selections.release_selection(),
            EngineCommand::SelectEvent(id) => {
                self.layout.require_event(id)?;
                self.selections.select_event(id);
            }
            EngineCommand::DeselectEvent(id) => self.selections.deselect_event(id),
            EngineCommand::ClearSelectedEvents => self.selections.clear_selected_events(),
        }
        Ok(())
    }
}
