#![forbid(unsafe_code)]

//! Per-workbook editing context.
//!
//! An [`EditSession`] owns everything one workbook's history needs: the
//! action log, the macro catalog, the id allocator, and the configuration.
//! Hosts create one per open workbook and route edits, undo/redo, and macro
//! commands through it. The workbook itself is passed into each call, so
//! the session never holds a borrow of the document.
//!
//! ```rust,ignore
//! let mut session = EditSession::new("alice", SessionConfig::default());
//! session.apply_edit(&mut wb, &EditOp::SetValue { cell, value: 1.into() })?;
//! session.toggle_selected(id);
//! let macro_id = session.record_macro("Fill", None);
//! session.play_macro(macro_id.unwrap(), &mut wb)?;
//! ```

use gridlog_core::{DocResult, Workbook};

use crate::config::SessionConfig;
use crate::history::{
    Action, ActionLog, EditOp, Origin, SheetOp, capture_cursor, perform_edit, perform_sheet_op,
};
use crate::ids::{ActionId, IdAllocator, MacroId};
use crate::macros::{MacroPlayer, MacroRecorder, MacroStore, PlaybackReport, ReferenceMode};

/// A macro id that is not in the session's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no macro with id {0}")]
pub struct UnknownMacro(pub MacroId);

/// History, macros, and id allocation for one workbook.
#[derive(Debug)]
pub struct EditSession {
    log: ActionLog,
    macros: MacroStore,
    ids: IdAllocator,
    owner: String,
    config: SessionConfig,
}

impl EditSession {
    #[must_use]
    pub fn new(owner: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            log: ActionLog::new(config.history.clone()),
            macros: MacroStore::new(),
            ids: IdAllocator::new(),
            owner: owner.into(),
            config,
        }
    }

    #[must_use]
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Mutable log access, for installing a listener.
    pub fn log_mut(&mut self) -> &mut ActionLog {
        &mut self.log
    }

    #[must_use]
    pub fn macros(&self) -> &MacroStore {
        &self.macros
    }

    pub fn macros_mut(&mut self) -> &mut MacroStore {
        &mut self.macros
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn origin(&self) -> Origin {
        Origin::user(self.owner.clone())
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Apply a cell-level edit and log it.
    pub fn apply_edit(&mut self, host: &mut dyn Workbook, op: &EditOp) -> DocResult<ActionId> {
        let origin = self.origin();
        let action = perform_edit(host, &mut self.ids, &origin, op)?;
        let id = action.meta().id;
        self.log.add(action.into());
        Ok(id)
    }

    /// Apply a sheet lifecycle operation and log it.
    pub fn apply_sheet_op(&mut self, host: &mut dyn Workbook, op: &SheetOp) -> DocResult<ActionId> {
        let origin = self.origin();
        let action = perform_sheet_op(host, &mut self.ids, &origin, op)?;
        let id = action.meta().id;
        self.log.add(action.into());
        Ok(id)
    }

    /// Log the host's cursor as a hidden action.
    ///
    /// Nothing is logged when the cursor matches the last visible edit in
    /// the active view, or the hidden cursor entry already on top of the
    /// log. Returns the new action's id when one was added.
    pub fn note_cursor(&mut self, host: &dyn Workbook) -> DocResult<Option<ActionId>> {
        let cursor = host.cursor();
        let sheet = host.active_sheet();
        if let Some(view) = host.active_view() {
            let after_edit = self
                .log
                .get_last_grid_unhidden_action(sheet, view.id)
                .is_some_and(|a| a.context().cursor == cursor);
            let already_noted = self
                .log
                .last_hidden_action()
                .and_then(Action::as_document)
                .is_some_and(|a| {
                    let ctx = a.context();
                    ctx.sheet_id == sheet && ctx.view.id == view.id && ctx.cursor == cursor
                });
            if after_edit || already_noted {
                return Ok(None);
            }
        }
        let origin = self.origin();
        let action = capture_cursor(host, &mut self.ids, &origin)?;
        let id = action.meta().id;
        self.log.add(action.into());
        Ok(Some(id))
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    pub fn undo(&mut self, host: &mut dyn Workbook) -> DocResult<Option<ActionId>> {
        self.log.undo(host, true)
    }

    pub fn redo(&mut self, host: &mut dyn Workbook) -> DocResult<Option<ActionId>> {
        self.log.redo(host, true)
    }

    /// Undo through `id`. Returns how many visible actions were undone.
    pub fn undo_to(&mut self, id: ActionId, host: &mut dyn Workbook) -> DocResult<usize> {
        self.log.undo_to_action_id(id, host, true)
    }

    /// Redo through `id`. Returns how many visible actions were redone.
    pub fn redo_to(&mut self, id: ActionId, host: &mut dyn Workbook) -> DocResult<usize> {
        self.log.redo_to_action_id(id, host, true)
    }

    pub fn toggle_selected(&mut self, id: ActionId) -> bool {
        self.log.toggle_selected(id)
    }

    // ========================================================================
    // Macros
    // ========================================================================

    /// Record the selected actions as a macro and store it.
    ///
    /// `mode` falls back to the configured default. Returns `None` when the
    /// selection yields no steps.
    pub fn record_macro(&mut self, name: &str, mode: Option<ReferenceMode>) -> Option<MacroId> {
        let mode = mode.unwrap_or(self.config.macros.default_mode);
        let item = MacroRecorder::record(
            &mut self.log,
            &self.macros,
            &mut self.ids,
            name,
            &self.owner,
            mode,
        )?;
        self.macros.add(item).ok()
    }

    /// Replay a stored macro against `host`.
    pub fn play_macro(
        &mut self,
        id: MacroId,
        host: &mut dyn Workbook,
    ) -> Result<PlaybackReport, UnknownMacro> {
        let item = self.macros.get_by_id(id).ok_or(UnknownMacro(id))?;
        let player = MacroPlayer::new(self.config.macros.tag_replayed_actions);
        Ok(player.play_with_report(item, host, &mut self.log, &mut self.ids, &self.owner))
    }
}
