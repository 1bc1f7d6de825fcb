#![forbid(unsafe_code)]

//! Undo/redo log with hidden-action carrying and a selection set.
//!
//! The [`ActionLog`] keeps two stacks of [`Action`]s. Hidden actions (cursor
//! moves) never form an undo step of their own: they ride along with the
//! nearest visible action.
//!
//! ```text
//! add(A) add(h1) add(B) add(h2)
//! ┌──────────────────────────────────────────┐
//! │ Undo: [A, h1, B, h2]      Redo: []       │
//! └──────────────────────────────────────────┘
//!
//! undo()   h2 carried, B undone, h1 carried
//! ┌──────────────────────────────────────────┐
//! │ Undo: [A]                 Redo: [h2, B, h1]  (top at right)
//! └──────────────────────────────────────────┘
//!
//! redo()   h1 carried, B redone, h2 carried
//! ┌──────────────────────────────────────────┐
//! │ Undo: [A, h1, B, h2]      Redo: []       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. An action id appears in at most one stack.
//! 2. `add` clears the redo stack and drops its ids from the selection.
//! 3. One `undo`/`redo` call reverses or re-applies exactly one visible
//!    action (none if the stack holds only hidden ones).
//! 4. With `max_depth > 0`, the undo stack never exceeds `max_depth` after
//!    `add`; evicted ids leave the selection.
//! 5. Mutual exclusion of undo and redo is enforced by `&mut self`.
//!
//! # Failure Modes
//!
//! - **Undo/redo fails in the document**: the error is returned unchanged
//!   and every entry moved by the failing step is put back, so the log is
//!   exactly as before the step.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use gridlog_core::{DocResult, SheetId, ViewId, Workbook};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::action::{Action, DocumentAction};
use crate::ids::ActionId;

/// Limits for the history log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HistoryConfig {
    /// Maximum number of undo entries (0 = unlimited).
    pub max_depth: usize,
}

impl HistoryConfig {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    #[must_use]
    pub fn unlimited() -> Self {
        Self { max_depth: 0 }
    }
}

// ============================================================================
// Change notification
// ============================================================================

/// What mutated the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryChange {
    Added(ActionId),
    /// Oldest entries dropped to honor `max_depth`.
    Evicted(usize),
    Undone(Option<ActionId>),
    Redone(Option<ActionId>),
    /// A batch jump moved this many visible actions.
    Jumped(usize),
    Selection(ActionId),
    SelectionCleared,
    Cleared,
}

/// One row of a history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: ActionId,
    pub description: String,
    pub hidden: bool,
    pub selected: bool,
    /// Topmost visible entry of the undo stack.
    pub active: bool,
    /// The entry sits on the redo stack.
    pub undone: bool,
}

/// Read-only view of the log handed to the change listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub change: HistoryChange,
    pub undo_depth: usize,
    pub redo_depth: usize,
    /// Entries in chronological order.
    pub entries: Vec<HistoryEntry>,
}

type Listener = Box<dyn FnMut(&HistorySnapshot)>;

// ============================================================================
// ActionLog
// ============================================================================

/// Undo/redo stacks plus a selection set of action ids.
pub struct ActionLog {
    /// Newest at back.
    undo_stack: VecDeque<Action>,
    /// Next to redo at back.
    redo_stack: VecDeque<Action>,
    selected: BTreeSet<ActionId>,
    config: HistoryConfig,
    listener: Option<Listener>,
}

impl fmt::Debug for ActionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionLog")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("selected", &self.selected.len())
            .field("config", &self.config)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

/// Move hidden entries from the top of `from` to `to`; returns the count.
fn carry_hidden(from: &mut VecDeque<Action>, to: &mut VecDeque<Action>) -> usize {
    let mut carried = 0;
    while from.back().is_some_and(Action::is_hidden) {
        if let Some(action) = from.pop_back() {
            tracing::trace!(
                target: "gridlog.history",
                action = action.id().raw(),
                "carrying hidden action"
            );
            to.push_back(action);
            carried += 1;
        }
    }
    carried
}

/// Move `count` entries from the top of `from` back onto `to`.
fn move_back(from: &mut VecDeque<Action>, to: &mut VecDeque<Action>, count: usize) {
    for _ in 0..count {
        if let Some(action) = from.pop_back() {
            to.push_back(action);
        }
    }
}

/// Number of entries, counted from the top, that one step would move.
fn step_span(stack: &VecDeque<Action>) -> usize {
    let mut span = 0;
    let mut seen_visible = false;
    for action in stack.iter().rev() {
        if action.is_hidden() {
            span += 1;
        } else if seen_visible {
            break;
        } else {
            seen_visible = true;
            span += 1;
        }
    }
    span
}

#[derive(Clone, Copy)]
enum Direction {
    Undo,
    Redo,
}

impl ActionLog {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            selected: BTreeSet::new(),
            config,
            listener: None,
        }
    }

    /// Install a listener invoked after every mutation.
    pub fn set_listener(&mut self, listener: impl FnMut(&HistorySnapshot) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Push a new action; discards the redo branch.
    pub fn add(&mut self, action: Action) {
        let id = action.id();
        for undone in &self.redo_stack {
            self.selected.remove(&undone.id());
        }
        self.redo_stack.clear();
        self.undo_stack.push_back(action);

        tracing::debug!(
            target: "gridlog.history",
            history_event = "add",
            action = id.raw(),
            undo_depth = self.undo_stack.len(),
        );
        self.notify(HistoryChange::Added(id));

        let evicted = self.enforce_depth();
        if evicted > 0 {
            self.notify(HistoryChange::Evicted(evicted));
        }
    }

    fn enforce_depth(&mut self) -> usize {
        if self.config.max_depth == 0 {
            return 0;
        }
        let mut evicted = 0;
        while self.undo_stack.len() > self.config.max_depth {
            if let Some(old) = self.undo_stack.pop_front() {
                self.selected.remove(&old.id());
                evicted += 1;
            }
        }
        if evicted > 0 {
            tracing::debug!(
                target: "gridlog.history",
                history_event = "evict",
                evicted,
                max_depth = self.config.max_depth,
            );
        }
        evicted
    }

    /// Reverse the most recent visible action, carrying hidden neighbors.
    ///
    /// Returns the id of the undone action (`None` if nothing visible was
    /// on the stack).
    pub fn undo(&mut self, host: &mut dyn Workbook, refresh: bool) -> DocResult<Option<ActionId>> {
        let undone = self.step(Direction::Undo, host, refresh)?;
        self.notify(HistoryChange::Undone(undone));
        Ok(undone)
    }

    /// Re-apply the most recently undone visible action.
    pub fn redo(&mut self, host: &mut dyn Workbook, refresh: bool) -> DocResult<Option<ActionId>> {
        let redone = self.step(Direction::Redo, host, refresh)?;
        self.notify(HistoryChange::Redone(redone));
        Ok(redone)
    }

    fn step(
        &mut self,
        direction: Direction,
        host: &mut dyn Workbook,
        refresh: bool,
    ) -> DocResult<Option<ActionId>> {
        let (from, to) = match direction {
            Direction::Undo => (&mut self.undo_stack, &mut self.redo_stack),
            Direction::Redo => (&mut self.redo_stack, &mut self.undo_stack),
        };

        let leading = carry_hidden(from, to);
        let Some(action) = from.pop_back() else {
            return Ok(None);
        };

        let result = match direction {
            Direction::Undo => action.undo(host, refresh),
            Direction::Redo => action.redo(host, refresh),
        };
        if let Err(err) = result {
            tracing::debug!(
                target: "gridlog.history",
                action = action.id().raw(),
                error = %err,
                "history step failed; log unchanged"
            );
            from.push_back(action);
            move_back(to, from, leading);
            return Err(err);
        }

        let id = action.id();
        to.push_back(action);
        carry_hidden(from, to);

        tracing::debug!(
            target: "gridlog.history",
            history_event = match direction {
                Direction::Undo => "undo",
                Direction::Redo => "redo",
            },
            action = id.raw(),
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
        );
        Ok(Some(id))
    }

    /// Undo repeatedly until the step that moves `id` has run.
    ///
    /// Refresh is requested only by that final step. Unknown ids are a
    /// no-op. Returns the number of visible actions undone.
    pub fn undo_to_action_id(
        &mut self,
        id: ActionId,
        host: &mut dyn Workbook,
        refresh: bool,
    ) -> DocResult<usize> {
        self.jump(Direction::Undo, id, host, refresh)
    }

    /// Redo repeatedly until the step that moves `id` has run.
    pub fn redo_to_action_id(
        &mut self,
        id: ActionId,
        host: &mut dyn Workbook,
        refresh: bool,
    ) -> DocResult<usize> {
        self.jump(Direction::Redo, id, host, refresh)
    }

    fn jump(
        &mut self,
        direction: Direction,
        id: ActionId,
        host: &mut dyn Workbook,
        refresh: bool,
    ) -> DocResult<usize> {
        let stack = match direction {
            Direction::Undo => &self.undo_stack,
            Direction::Redo => &self.redo_stack,
        };
        if !stack.iter().any(|a| a.id() == id) {
            return Ok(0);
        }

        let mut moved = 0;
        loop {
            let stack = match direction {
                Direction::Undo => &self.undo_stack,
                Direction::Redo => &self.redo_stack,
            };
            let span = step_span(stack);
            if span == 0 {
                break;
            }
            let reaches_target = stack.iter().rev().take(span).any(|a| a.id() == id);

            match self.step(direction, host, refresh && reaches_target) {
                Ok(Some(_)) => moved += 1,
                Ok(None) => {}
                Err(err) => {
                    if refresh && moved > 0 {
                        host.request_refresh();
                    }
                    if moved > 0 {
                        self.notify(HistoryChange::Jumped(moved));
                    }
                    return Err(err);
                }
            }
            if reaches_target {
                break;
            }
        }
        self.notify(HistoryChange::Jumped(moved));
        Ok(moved)
    }

    /// Drop every entry and the selection.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.selected.clear();
        tracing::debug!(target: "gridlog.history", history_event = "clear");
        self.notify(HistoryChange::Cleared);
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Flip the selection state of `id`; returns the new state.
    ///
    /// Ids not held by either stack are never selected.
    pub fn toggle_selected(&mut self, id: ActionId) -> bool {
        let selected = if self.selected.remove(&id) {
            false
        } else if self.contains(id) {
            self.selected.insert(id);
            true
        } else {
            return false;
        };
        self.notify(HistoryChange::Selection(id));
        selected
    }

    #[must_use]
    pub fn is_selected(&self, id: ActionId) -> bool {
        self.selected.contains(&id)
    }

    pub fn clear_selection(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        self.selected.clear();
        tracing::trace!(target: "gridlog.history", "selection cleared");
        self.notify(HistoryChange::SelectionCleared);
    }

    /// Selected actions in chronological order: undo stack bottom to top,
    /// then redo stack top to bottom.
    #[must_use]
    pub fn get_selected_actions(&self) -> Vec<&Action> {
        self.chronological()
            .filter(|a| self.selected.contains(&a.id()))
            .collect()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// True when the undo stack holds at least one visible action.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_stack.iter().any(|a| !a.is_hidden())
    }

    /// True when the redo stack holds at least one visible action.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.redo_stack.iter().any(|a| !a.is_hidden())
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty() && self.redo_stack.is_empty()
    }

    /// True if either stack holds `id` at the top level.
    #[must_use]
    pub fn contains(&self, id: ActionId) -> bool {
        self.find(id).is_some()
    }

    #[must_use]
    pub fn find(&self, id: ActionId) -> Option<&Action> {
        self.chronological().find(|a| a.id() == id)
    }

    /// Topmost visible entry of the undo stack.
    #[must_use]
    pub fn get_last_unhidden_action(&self) -> Option<&Action> {
        self.undo_stack.iter().rev().find(|a| !a.is_hidden())
    }

    /// Most recent visible cell edit made in `view` of `sheet`, looking
    /// inside composites.
    #[must_use]
    pub fn get_last_grid_unhidden_action(
        &self,
        sheet: SheetId,
        view: ViewId,
    ) -> Option<&DocumentAction> {
        self.undo_stack
            .iter()
            .rev()
            .filter(|a| !a.is_hidden())
            .find_map(|entry| {
                let mut found = None;
                entry.for_each_leaf(&mut |leaf| {
                    if let Some(doc) = leaf.as_document()
                        && !leaf.is_hidden()
                        && doc.context().sheet_id == sheet
                        && doc.context().view.id == view
                    {
                        found = Some(doc);
                    }
                });
                found
            })
    }

    /// Most recent hidden entry on top of the undo stack, if any.
    #[must_use]
    pub fn last_hidden_action(&self) -> Option<&Action> {
        self.undo_stack.back().filter(|a| a.is_hidden())
    }

    /// True if `id` is the topmost visible entry of the undo stack.
    #[must_use]
    pub fn is_active(&self, id: ActionId) -> bool {
        self.get_last_unhidden_action().is_some_and(|a| a.id() == id)
    }

    /// Undo stack, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &Action> {
        self.undo_stack.iter()
    }

    /// Redo stack, next to redo first.
    pub fn redo_entries(&self) -> impl Iterator<Item = &Action> {
        self.redo_stack.iter().rev()
    }

    /// Every entry in chronological order.
    pub fn chronological(&self) -> impl Iterator<Item = &Action> {
        self.undo_stack.iter().chain(self.redo_stack.iter().rev())
    }

    /// Descriptions of visible undo entries, most recent first.
    #[must_use]
    pub fn undo_descriptions(&self, limit: usize) -> Vec<String> {
        self.undo_stack
            .iter()
            .rev()
            .filter(|a| !a.is_hidden())
            .take(limit)
            .map(Action::description)
            .collect()
    }

    /// Descriptions of visible redo entries, next to redo first.
    #[must_use]
    pub fn redo_descriptions(&self, limit: usize) -> Vec<String> {
        self.redo_stack
            .iter()
            .rev()
            .filter(|a| !a.is_hidden())
            .take(limit)
            .map(Action::description)
            .collect()
    }

    #[must_use]
    pub fn next_undo_description(&self) -> Option<String> {
        self.get_last_unhidden_action().map(Action::description)
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<String> {
        self.redo_stack
            .iter()
            .rev()
            .find(|a| !a.is_hidden())
            .map(Action::description)
    }

    /// Rows for a history panel, in chronological order.
    #[must_use]
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let active = self.get_last_unhidden_action().map(Action::id);
        let undone_from = self.undo_stack.len();
        self.chronological()
            .enumerate()
            .map(|(i, a)| HistoryEntry {
                id: a.id(),
                description: a.description(),
                hidden: a.is_hidden(),
                selected: self.selected.contains(&a.id()),
                active: Some(a.id()) == active,
                undone: i >= undone_from,
            })
            .collect()
    }

    fn notify(&mut self, change: HistoryChange) {
        if self.listener.is_none() {
            return;
        }
        let snapshot = HistorySnapshot {
            change,
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
            entries: self.entries(),
        };
        if let Some(listener) = self.listener.as_mut() {
            listener(&snapshot);
        }
    }
}
