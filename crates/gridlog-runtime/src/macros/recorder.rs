#![forbid(unsafe_code)]

//! Turn history entries into a portable macro.
//!
//! The recorder walks actions in chronological order and tracks, per view,
//! the last active cell it has seen. In relative mode each document step is
//! stored as offsets from that baseline, so replay reproduces the same
//! cursor walk from wherever the user stands.
//!
//! # Invariants
//!
//! 1. A view's baseline is seeded with its first action's own active cell,
//!    so the first step in a view always has a zero active-cell offset.
//! 2. A sheet created inside the macro gets its primary view seeded at `A1`.
//! 3. Composites are flattened. A hidden cursor move becomes a
//!    [`CellEffect::Select`] step and moves its view's baseline.
//! 4. Sheets created inside the macro are referenced by creation order,
//!    every other sheet by the name it had at that point of the recording.

use std::collections::HashMap;

use gridlog_core::{CellCoord, SheetId, ViewId};

use super::macro_action::{
    CellEffect, DocumentStep, MacroAction, MacroItem, MacroStep, SheetStep, SheetTarget,
};
use super::offset::{ActiveCellOffset, ReferenceMode, SelectionOffset};
use super::store::MacroStore;
use crate::history::{Action, ActionLog, DocumentAction, SheetChange, StructuralAction};
use crate::ids::IdAllocator;

/// Builds macro steps from a chronological run of actions.
#[derive(Debug, Clone)]
pub struct MacroRecorder {
    mode: ReferenceMode,
    baselines: HashMap<ViewId, CellCoord>,
    created: Vec<SheetId>,
    steps: Vec<MacroAction>,
}

impl MacroRecorder {
    #[must_use]
    pub fn new(mode: ReferenceMode) -> Self {
        Self {
            mode,
            baselines: HashMap::new(),
            created: Vec::new(),
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> ReferenceMode {
        self.mode
    }

    /// Steps recorded so far.
    #[must_use]
    pub fn steps(&self) -> &[MacroAction] {
        &self.steps
    }

    /// Append the steps for one history entry.
    pub fn observe(&mut self, action: &Action, ids: &mut IdAllocator) {
        match action {
            Action::Composite(group) => {
                for child in group.children() {
                    self.observe(child, ids);
                }
            }
            Action::Document(doc) => self.observe_document(doc, ids),
            Action::Structural(sheet) => self.observe_structural(sheet, ids),
        }
    }

    fn observe_document(&mut self, action: &DocumentAction, ids: &mut IdAllocator) {
        let context = action.context();
        let active = context.active_cell();
        let selection = context.primary_selection();

        let base = match self.mode {
            ReferenceMode::Absolute => CellCoord::ORIGIN,
            ReferenceMode::Relative => self
                .baselines
                .get(&context.view.id)
                .copied()
                .unwrap_or(active),
        };
        self.baselines.insert(context.view.id, active);

        let step = DocumentStep {
            view_name: context.view.name.clone(),
            selection: SelectionOffset::between(selection, base),
            active_cell: ActiveCellOffset::between(active, base),
            effect: action
                .op()
                .map_or(CellEffect::Select, CellEffect::from_op),
        };
        self.push(MacroStep::Document(step), ids);
    }

    fn target(&self, id: SheetId, name: &str) -> SheetTarget {
        match self.created.iter().position(|created| *created == id) {
            Some(index) => SheetTarget::Created(index),
            None => SheetTarget::Named(name.to_string()),
        }
    }

    fn observe_structural(&mut self, action: &StructuralAction, ids: &mut IdAllocator) {
        let step = match action.change() {
            SheetChange::Created { sheet, after } => {
                let after = after.as_ref().map(|l| self.target(l.id, &l.name));
                self.created.push(sheet.info.id);
                self.baselines
                    .insert(sheet.info.primary_view.id, CellCoord::ORIGIN);
                SheetStep::Create { after }
            }
            SheetChange::Deleted { sheet, .. } => SheetStep::Delete {
                sheet: self.target(sheet.info.id, &sheet.info.name),
            },
            SheetChange::Duplicated { source, copy } => {
                let sheet = self.target(source.id, &source.name);
                self.created.push(copy.info.id);
                for view in &copy.views {
                    self.baselines.insert(view.id, CellCoord::ORIGIN);
                }
                SheetStep::Duplicate { sheet }
            }
            SheetChange::Renamed { sheet, from, to } => SheetStep::Rename {
                sheet: self.target(*sheet, from),
                name: to.clone(),
            },
            SheetChange::Reordered { from, to, .. } => SheetStep::Reorder {
                from: *from,
                to: *to,
            },
            SheetChange::Activated { to, .. } => SheetStep::Activate {
                sheet: self.target(to.id, &to.name),
            },
        };
        self.push(MacroStep::Structural(step), ids);
    }

    fn push(&mut self, state: MacroStep, ids: &mut IdAllocator) {
        self.steps.push(MacroAction {
            id: ids.next_macro_action_id(),
            state,
        });
    }

    #[must_use]
    pub fn finish(self) -> Vec<MacroAction> {
        self.steps
    }

    /// Record the log's selected actions as a macro and clear the selection.
    ///
    /// `name` is made unique against `store`. Returns `None` when nothing is
    /// selected or the selection yields no steps. The macro is not added to
    /// the store.
    pub fn record(
        log: &mut ActionLog,
        store: &MacroStore,
        ids: &mut IdAllocator,
        name: &str,
        owner: &str,
        mode: ReferenceMode,
    ) -> Option<MacroItem> {
        let selected = log.get_selected_actions();
        if selected.is_empty() {
            return None;
        }
        let mut recorder = Self::new(mode);
        for action in selected {
            recorder.observe(action, ids);
        }
        log.clear_selection();

        let actions = recorder.finish();
        if actions.is_empty() {
            return None;
        }
        let name = store.get_valid_name(name);
        tracing::info!(
            target: "gridlog.macros",
            macro_event = "record",
            name = %name,
            steps = actions.len(),
            mode = ?mode,
        );
        Some(MacroItem::new(
            ids.next_macro_id(),
            name,
            owner.to_string(),
            mode,
            actions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{
        ActionKind, ActionMeta, CellChange, CompositeAction, DocumentContext, EditOp,
    };
    use crate::ids::ActionId;
    use gridlog_core::{CellRange, CursorState, RangeSnapshot, SheetId, ViewId, ViewRef};

    fn view(id: u64) -> ViewRef {
        ViewRef::new(ViewId(id), SheetId(1), format!("view{id}"))
    }

    fn set_value(id: u64, view: &ViewRef, a1: &str) -> Action {
        let cell = CellCoord::parse_a1(a1).unwrap();
        let range = CellRange::single(cell);
        DocumentAction::edit(
            ActionMeta::new(ActionId(id), ActionKind::Document, "t"),
            DocumentContext {
                sheet_id: view.sheet_id,
                view: view.clone(),
                cursor: CursorState::at(cell),
            },
            CellChange {
                op: EditOp::SetValue {
                    cell,
                    value: 1.into(),
                },
                before: RangeSnapshot::blank(range),
                after: RangeSnapshot::blank(range),
                cursor_before: CursorState::default(),
            },
        )
        .into()
    }

    fn active_offsets(steps: &[MacroAction]) -> Vec<(i64, i64)> {
        steps
            .iter()
            .filter_map(|s| match &s.state {
                MacroStep::Document(d) => Some((d.active_cell.offset_row, d.active_cell.offset_column)),
                MacroStep::Structural(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_relative_offsets_chain_per_view() {
        let (v1, v2) = (view(1), view(2));
        let mut ids = IdAllocator::new();
        let mut rec = MacroRecorder::new(ReferenceMode::Relative);
        rec.observe(&set_value(1, &v1, "B2"), &mut ids);
        rec.observe(&set_value(2, &v2, "D9"), &mut ids);
        rec.observe(&set_value(3, &v1, "C4"), &mut ids);
        rec.observe(&set_value(4, &v2, "D8"), &mut ids);
        assert_eq!(
            active_offsets(rec.steps()),
            vec![(0, 0), (0, 0), (2, 1), (-1, 0)]
        );
    }

    #[test]
    fn test_absolute_offsets_are_literal() {
        let v1 = view(1);
        let mut ids = IdAllocator::new();
        let mut rec = MacroRecorder::new(ReferenceMode::Absolute);
        rec.observe(&set_value(1, &v1, "B2"), &mut ids);
        rec.observe(&set_value(2, &v1, "C4"), &mut ids);
        assert_eq!(active_offsets(rec.steps()), vec![(1, 1), (3, 2)]);
    }

    #[test]
    fn test_composites_flatten_and_cursor_moves_become_select_steps() {
        let v1 = view(1);
        let mut ids = IdAllocator::new();
        let hidden = DocumentAction::cursor_move(
            ActionMeta::new(ActionId(9), ActionKind::Document, "t"),
            DocumentContext {
                sheet_id: SheetId(1),
                view: v1.clone(),
                cursor: CursorState::at(CellCoord::new(50, 50)),
            },
        );
        let group = CompositeAction::new(
            ActionMeta::new(ActionId(10), ActionKind::Base, "t"),
            "group",
            vec![
                set_value(1, &v1, "A1"),
                hidden.into(),
                set_value(2, &v1, "A2"),
            ],
        )
        .unwrap();
        let mut rec = MacroRecorder::new(ReferenceMode::Relative);
        rec.observe(&group.into(), &mut ids);
        assert_eq!(
            active_offsets(rec.steps()),
            vec![(0, 0), (50, 50), (-49, -50)]
        );
        let effects: Vec<_> = rec
            .steps()
            .iter()
            .filter_map(|s| match &s.state {
                MacroStep::Document(d) => Some(d.effect.clone()),
                MacroStep::Structural(_) => None,
            })
            .collect();
        assert_eq!(effects[1], CellEffect::Select);
        assert!(matches!(effects[2], CellEffect::SetValue { .. }));
    }

    #[test]
    fn test_record_with_empty_selection_is_none() {
        let mut log = ActionLog::default();
        let store = MacroStore::new();
        let mut ids = IdAllocator::new();
        log.add(set_value(1, &view(1), "A1"));
        assert!(
            MacroRecorder::record(&mut log, &store, &mut ids, "m", "t", ReferenceMode::Relative)
                .is_none()
        );
    }

    #[test]
    fn test_record_clears_selection_and_names_uniquely() {
        let mut log = ActionLog::default();
        let mut store = MacroStore::new();
        let mut ids = IdAllocator::new();
        log.add(set_value(1, &view(1), "A1"));
        log.toggle_selected(ActionId(1));

        let first =
            MacroRecorder::record(&mut log, &store, &mut ids, "Fill", "t", ReferenceMode::Relative)
                .unwrap();
        assert!(!log.is_selected(ActionId(1)));
        assert_eq!(first.name(), "Fill");
        store.add(first).unwrap();

        log.toggle_selected(ActionId(1));
        let second =
            MacroRecorder::record(&mut log, &store, &mut ids, "Fill", "t", ReferenceMode::Relative)
                .unwrap();
        assert_eq!(second.name(), "Fill 0");
        assert_eq!(second.len(), 1);
    }
}
