#![forbid(unsafe_code)]

//! Reversible document edits.
//!
//! An [`Action`] is one entry of the history log. Leaf actions hold complete
//! before/after snapshots, so undo and redo restore state through the
//! document API without re-deriving anything from the live document:
//!
//! - [`DocumentAction`]: a cell-level edit on one view, or (hidden) a cursor
//!   move whose undo and redo do nothing.
//! - [`StructuralAction`]: a sheet lifecycle change.
//! - [`CompositeAction`]: an ordered, non-empty group undone and redone as a
//!   single step.
//!
//! # Invariants
//!
//! 1. Actions are never mutated after construction.
//! 2. A composite has at least one child; [`CompositeAction::new`] rejects an
//!    empty list.
//! 3. Undo/redo of a leaf first makes its sheet (and, for document actions,
//!    its view) active, waiting for readiness.
//! 4. A composite requests a refresh at most once per undo/redo: on its last
//!    child, and only if the caller asked for one.
//!
//! # Failure Modes
//!
//! - **Document call fails**: the `DocumentError` is returned unchanged.
//!   A composite rolls back the children it already processed before
//!   returning, so the document is not left half-undone. A rollback that
//!   fails too is logged as a `warn` on `gridlog.history`.

use std::fmt;

use gridlog_core::{
    BorderEdges, BorderSpec, CellCoord, CellRange, CellStyle, CellValue, ClearMode, CursorState,
    DocResult, DocumentApi, DocumentError, MergeDirection, RangeSnapshot, SheetId, SheetSnapshot,
    ViewRef, Workbook, ensure_sheet_active, ensure_view_active,
};
use web_time::SystemTime;

use crate::ids::ActionId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Metadata
// ============================================================================

/// Broad category of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Groups other actions.
    Base,
    /// Cell content, formatting, merges, or cursor.
    Document,
    /// Sheet lifecycle.
    Structural,
}

/// Who produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionSource {
    /// Direct user edit.
    #[default]
    User,
    /// Macro playback.
    Macro,
}

/// Fields shared by every action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMeta {
    pub id: ActionId,
    /// Hidden actions are carried along with the nearest visible one.
    pub hidden: bool,
    pub kind: ActionKind,
    pub created_at: SystemTime,
    pub owner: String,
    pub source: ActionSource,
    pub tags: Vec<String>,
}

impl ActionMeta {
    #[must_use]
    pub fn new(id: ActionId, kind: ActionKind, owner: impl Into<String>) -> Self {
        Self {
            id,
            hidden: false,
            kind,
            created_at: SystemTime::now(),
            owner: owner.into(),
            source: ActionSource::User,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: ActionSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

// ============================================================================
// Cell-level edits
// ============================================================================

/// A cell-level edit, as applied through the document API.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum EditOp {
    SetValue {
        cell: CellCoord,
        value: CellValue,
    },
    Clear {
        range: CellRange,
        #[cfg_attr(feature = "serde", serde(default))]
        mode: ClearMode,
    },
    Style {
        range: CellRange,
        style: CellStyle,
    },
    Borders {
        range: CellRange,
        borders: BorderSpec,
    },
    Merge {
        range: CellRange,
        #[cfg_attr(feature = "serde", serde(default))]
        direction: MergeDirection,
    },
    Unmerge {
        range: CellRange,
    },
}

impl EditOp {
    /// The cells the edit targets.
    #[must_use]
    pub fn range(&self) -> CellRange {
        match self {
            Self::SetValue { cell, .. } => CellRange::single(*cell),
            Self::Clear { range, .. }
            | Self::Style { range, .. }
            | Self::Borders { range, .. }
            | Self::Merge { range, .. }
            | Self::Unmerge { range } => *range,
        }
    }

    /// Apply the edit to the active sheet.
    pub fn apply<D: DocumentApi + ?Sized>(&self, doc: &mut D) -> DocResult<()> {
        match self {
            Self::SetValue { cell, value } => doc.set_cell_value(*cell, value),
            Self::Clear { range, mode } => doc.clear_cells(*range, *mode),
            Self::Style { range, style } => doc.apply_style(*range, style),
            Self::Borders { range, borders } => doc.apply_borders(*range, borders),
            Self::Merge { range, direction } => doc.merge_cells(*range, *direction),
            Self::Unmerge { range } => doc.unmerge_cells(*range),
        }
    }

    /// Cursor that an edit of this kind leaves behind, given the cursor the
    /// user had before.
    ///
    /// A value edit makes its cell the active cell; a range edit makes its
    /// range the primary selection. Whatever the existing cursor already
    /// agrees with is kept.
    #[must_use]
    pub fn cursor_after(&self, current: &CursorState) -> CursorState {
        match self {
            Self::SetValue { cell, .. } => {
                let selections = if current.selections.iter().any(|s| s.contains(*cell)) {
                    current.selections.clone()
                } else {
                    vec![CellRange::single(*cell)]
                };
                CursorState {
                    selections,
                    active_cell: *cell,
                }
            }
            _ => {
                let range = self.range();
                let mut selections = vec![range];
                selections.extend(current.selections.iter().filter(|s| **s != range).copied());
                let active_cell = if range.contains(current.active_cell) {
                    current.active_cell
                } else {
                    range.start
                };
                CursorState {
                    selections,
                    active_cell,
                }
            }
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::SetValue { cell, value } if value.is_empty() => format!("Clear {cell}"),
            Self::SetValue { cell, value } => format!("Set {cell} to {value}"),
            Self::Clear {
                range,
                mode: ClearMode::Content,
            } => format!("Clear contents of {range}"),
            Self::Clear {
                range,
                mode: ClearMode::Format,
            } => format!("Clear formatting of {range}"),
            Self::Style { range, style } => format!("Format {range} ({})", style.summary()),
            Self::Borders { range, borders } => {
                let edges = match borders.edges {
                    BorderEdges::All => "all",
                    BorderEdges::Outer => "outer",
                    BorderEdges::Inner => "inner",
                    BorderEdges::Top => "top",
                    BorderEdges::Bottom => "bottom",
                    BorderEdges::Left => "left",
                    BorderEdges::Right => "right",
                };
                format!("Set {edges} borders of {range}")
            }
            Self::Merge {
                range,
                direction: MergeDirection::All,
            } => format!("Merge {range}"),
            Self::Merge {
                range,
                direction: MergeDirection::Horizontal,
            } => format!("Merge {range} across"),
            Self::Merge {
                range,
                direction: MergeDirection::Vertical,
            } => format!("Merge {range} down"),
            Self::Unmerge { range } => format!("Unmerge {range}"),
        }
    }
}

/// Where a document action happened: sheet, view, and cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub sheet_id: SheetId,
    pub view: ViewRef,
    pub cursor: CursorState,
}

impl DocumentContext {
    #[must_use]
    pub fn active_cell(&self) -> CellCoord {
        self.cursor.active_cell
    }

    /// Primary selection (falls back to the active cell).
    #[must_use]
    pub fn primary_selection(&self) -> CellRange {
        self.cursor
            .selections
            .first()
            .copied()
            .unwrap_or_else(|| CellRange::single(self.cursor.active_cell))
    }
}

/// Before/after state of a cell-level edit.
///
/// The cursor after the edit lives in the action's [`DocumentContext`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub op: EditOp,
    pub before: RangeSnapshot,
    pub after: RangeSnapshot,
    pub cursor_before: CursorState,
}

/// A cell-level edit, or a hidden cursor move.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAction {
    meta: ActionMeta,
    context: DocumentContext,
    change: Option<CellChange>,
}

impl DocumentAction {
    /// A visible edit.
    #[must_use]
    pub fn edit(meta: ActionMeta, context: DocumentContext, change: CellChange) -> Self {
        Self {
            meta,
            context,
            change: Some(change),
        }
    }

    /// A hidden action recording where the cursor went.
    #[must_use]
    pub fn cursor_move(mut meta: ActionMeta, context: DocumentContext) -> Self {
        meta.hidden = true;
        Self {
            meta,
            context,
            change: None,
        }
    }

    #[must_use]
    pub fn meta(&self) -> &ActionMeta {
        &self.meta
    }

    #[must_use]
    pub fn context(&self) -> &DocumentContext {
        &self.context
    }

    #[must_use]
    pub fn change(&self) -> Option<&CellChange> {
        self.change.as_ref()
    }

    #[must_use]
    pub fn op(&self) -> Option<&EditOp> {
        self.change.as_ref().map(|c| &c.op)
    }

    fn restore(
        &self,
        host: &mut dyn Workbook,
        snapshot: &RangeSnapshot,
        cursor: &CursorState,
        refresh: bool,
    ) -> DocResult<()> {
        ensure_view_active(host, &self.context.view)?;
        host.restore_range(snapshot)?;
        host.set_cursor(cursor)?;
        if refresh {
            host.request_refresh();
        }
        Ok(())
    }

    /// Restore the range and the cursor as they were before the edit.
    ///
    /// A cursor move changes nothing; it still honors `refresh` so a
    /// composite ending on one refreshes once.
    pub fn undo(&self, host: &mut dyn Workbook, refresh: bool) -> DocResult<()> {
        match &self.change {
            Some(change) => self.restore(host, &change.before, &change.cursor_before, refresh),
            None => {
                if refresh {
                    host.request_refresh();
                }
                Ok(())
            }
        }
    }

    pub fn redo(&self, host: &mut dyn Workbook, refresh: bool) -> DocResult<()> {
        match &self.change {
            Some(change) => self.restore(host, &change.after, &self.context.cursor, refresh),
            None => {
                if refresh {
                    host.request_refresh();
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn description(&self) -> String {
        match &self.change {
            Some(change) => change.op.describe(),
            None => format!("Select {}", self.context.primary_selection()),
        }
    }
}

// ============================================================================
// Sheet lifecycle
// ============================================================================

/// A sheet lifecycle request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum SheetOp {
    Create { after: Option<SheetId> },
    Delete { sheet: SheetId },
    Duplicate { sheet: SheetId },
    Rename { sheet: SheetId, name: String },
    Reorder { from: usize, to: usize },
    Activate { sheet: SheetId },
}

/// A sheet as it was known when an action ran: id plus name at that time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetLabel {
    pub id: SheetId,
    pub name: String,
}

/// What a structural action changed, with enough state to reverse it.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetChange {
    /// `sheet` is the freshly created sheet.
    Created {
        sheet: SheetSnapshot,
        after: Option<SheetLabel>,
    },
    Deleted {
        sheet: SheetSnapshot,
        was_active: bool,
    },
    Duplicated {
        source: SheetLabel,
        copy: SheetSnapshot,
    },
    Renamed {
        sheet: SheetId,
        from: String,
        to: String,
    },
    Reordered {
        sheet: SheetId,
        from: usize,
        to: usize,
    },
    Activated {
        from: SheetId,
        to: SheetLabel,
    },
}

impl SheetChange {
    /// The sheet the change is about.
    #[must_use]
    pub fn sheet_id(&self) -> SheetId {
        match self {
            Self::Created { sheet, .. } | Self::Deleted { sheet, .. } => sheet.info.id,
            Self::Duplicated { copy, .. } => copy.info.id,
            Self::Renamed { sheet, .. } | Self::Reordered { sheet, .. } => *sheet,
            Self::Activated { to, .. } => to.id,
        }
    }
}

/// A sheet lifecycle change.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralAction {
    meta: ActionMeta,
    change: SheetChange,
}

impl StructuralAction {
    #[must_use]
    pub fn new(meta: ActionMeta, change: SheetChange) -> Self {
        Self { meta, change }
    }

    #[must_use]
    pub fn meta(&self) -> &ActionMeta {
        &self.meta
    }

    #[must_use]
    pub fn change(&self) -> &SheetChange {
        &self.change
    }

    #[must_use]
    pub fn sheet_id(&self) -> SheetId {
        self.change.sheet_id()
    }

    /// Activate the target sheet if it currently exists.
    fn focus(&self, host: &mut dyn Workbook) -> DocResult<()> {
        let target = self.sheet_id();
        if host.sheet(target).is_some() {
            ensure_sheet_active(host, target)?;
        }
        Ok(())
    }

    pub fn undo(&self, host: &mut dyn Workbook, refresh: bool) -> DocResult<()> {
        if !matches!(self.change, SheetChange::Activated { .. }) {
            self.focus(host)?;
        }
        match &self.change {
            SheetChange::Created { sheet, .. } => host.delete_sheet(sheet.info.id)?,
            SheetChange::Deleted { sheet, was_active } => {
                host.restore_sheet(sheet)?;
                if *was_active {
                    ensure_sheet_active(host, sheet.info.id)?;
                }
            }
            SheetChange::Duplicated { copy, .. } => host.delete_sheet(copy.info.id)?,
            SheetChange::Renamed { sheet, from, .. } => host.rename_sheet(*sheet, from)?,
            SheetChange::Reordered { from, to, .. } => host.reorder_sheet(*to, *from)?,
            SheetChange::Activated { from, .. } => {
                ensure_sheet_active(host, *from)?;
            }
        }
        if refresh {
            host.request_refresh();
        }
        Ok(())
    }

    pub fn redo(&self, host: &mut dyn Workbook, refresh: bool) -> DocResult<()> {
        self.focus(host)?;
        match &self.change {
            SheetChange::Created { sheet, .. } => host.restore_sheet(sheet)?,
            SheetChange::Deleted { sheet, .. } => host.delete_sheet(sheet.info.id)?,
            SheetChange::Duplicated { copy, .. } => host.restore_sheet(copy)?,
            SheetChange::Renamed { sheet, to, .. } => host.rename_sheet(*sheet, to)?,
            SheetChange::Reordered { from, to, .. } => host.reorder_sheet(*from, *to)?,
            SheetChange::Activated { .. } => {}
        }
        if refresh {
            host.request_refresh();
        }
        Ok(())
    }

    #[must_use]
    pub fn description(&self) -> String {
        match &self.change {
            SheetChange::Created { sheet, .. } => format!("Insert sheet '{}'", sheet.info.name),
            SheetChange::Deleted { sheet, .. } => format!("Delete sheet '{}'", sheet.info.name),
            SheetChange::Duplicated { source, copy } => {
                format!("Duplicate sheet '{}' as '{}'", source.name, copy.info.name)
            }
            SheetChange::Renamed { from, to, .. } => format!("Rename sheet '{from}' to '{to}'"),
            SheetChange::Reordered { from, to, .. } => {
                format!("Move sheet from position {} to {}", from + 1, to + 1)
            }
            SheetChange::Activated { to, .. } => format!("Switch to sheet '{}'", to.name),
        }
    }
}

// ============================================================================
// Composite
// ============================================================================

/// A named group of actions that the log treats as one step.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeAction {
    meta: ActionMeta,
    name: String,
    children: Vec<Action>,
}

impl CompositeAction {
    /// Returns `None` when `children` is empty.
    #[must_use]
    pub fn new(meta: ActionMeta, name: impl Into<String>, children: Vec<Action>) -> Option<Self> {
        if children.is_empty() {
            return None;
        }
        Some(Self {
            meta,
            name: name.into(),
            children,
        })
    }

    #[must_use]
    pub fn meta(&self) -> &ActionMeta {
        &self.meta
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn children(&self) -> &[Action] {
        &self.children
    }

    pub fn undo(&self, host: &mut dyn Workbook, refresh: bool) -> DocResult<()> {
        let last = self.children.len() - 1;
        for (done, child) in self.children.iter().rev().enumerate() {
            if let Err(err) = child.undo(host, refresh && done == last) {
                let undone = &self.children[self.children.len() - done..];
                for child in undone {
                    if let Err(rollback) = child.redo(host, false) {
                        rollback_failed(self, child, &rollback);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn redo(&self, host: &mut dyn Workbook, refresh: bool) -> DocResult<()> {
        let last = self.children.len() - 1;
        for (i, child) in self.children.iter().enumerate() {
            if let Err(err) = child.redo(host, refresh && i == last) {
                for child in self.children[..i].iter().rev() {
                    if let Err(rollback) = child.undo(host, false) {
                        rollback_failed(self, child, &rollback);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

fn rollback_failed(group: &CompositeAction, child: &Action, err: &DocumentError) {
    tracing::warn!(
        target: "gridlog.history",
        history_event = "rollback_failed",
        composite = group.meta.id.raw(),
        action = child.id().raw(),
        error = %err,
        "composite left partially rolled back"
    );
}

// ============================================================================
// Action
// ============================================================================

/// One entry of the history log.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Document(DocumentAction),
    Structural(StructuralAction),
    Composite(CompositeAction),
}

impl Action {
    #[must_use]
    pub fn meta(&self) -> &ActionMeta {
        match self {
            Self::Document(a) => a.meta(),
            Self::Structural(a) => a.meta(),
            Self::Composite(a) => a.meta(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ActionId {
        self.meta().id
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.meta().hidden
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.meta().kind
    }

    /// Restore the state before this action.
    pub fn undo(&self, host: &mut dyn Workbook, refresh: bool) -> DocResult<()> {
        match self {
            Self::Document(a) => a.undo(host, refresh),
            Self::Structural(a) => a.undo(host, refresh),
            Self::Composite(a) => a.undo(host, refresh),
        }
    }

    /// Re-apply this action after an undo.
    pub fn redo(&self, host: &mut dyn Workbook, refresh: bool) -> DocResult<()> {
        match self {
            Self::Document(a) => a.redo(host, refresh),
            Self::Structural(a) => a.redo(host, refresh),
            Self::Composite(a) => a.redo(host, refresh),
        }
    }

    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Document(a) => a.description(),
            Self::Structural(a) => a.description(),
            Self::Composite(a) => a.name().to_string(),
        }
    }

    #[must_use]
    pub fn as_document(&self) -> Option<&DocumentAction> {
        match self {
            Self::Document(a) => Some(a),
            _ => None,
        }
    }

    /// Visit this action and, for composites, every descendant leaf in
    /// chronological order.
    pub fn for_each_leaf<'a>(&'a self, f: &mut dyn FnMut(&'a Action)) {
        match self {
            Self::Composite(c) => {
                for child in &c.children {
                    child.for_each_leaf(f);
                }
            }
            leaf => f(leaf),
        }
    }
}

impl From<DocumentAction> for Action {
    fn from(action: DocumentAction) -> Self {
        Self::Document(action)
    }
}

impl From<StructuralAction> for Action {
    fn from(action: StructuralAction) -> Self {
        Self::Structural(action)
    }
}

impl From<CompositeAction> for Action {
    fn from(action: CompositeAction) -> Self {
        Self::Composite(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlog_core::{CellStyle, ViewId};

    fn meta(id: u64) -> ActionMeta {
        ActionMeta::new(ActionId(id), ActionKind::Document, "tester")
    }

    fn ctx(cell: CellCoord) -> DocumentContext {
        DocumentContext {
            sheet_id: SheetId(1),
            view: ViewRef::new(ViewId(1), SheetId(1), "main"),
            cursor: CursorState::at(cell),
        }
    }

    #[test]
    fn test_cursor_move_is_hidden() {
        let a = DocumentAction::cursor_move(meta(1), ctx(CellCoord::new(2, 1)));
        assert!(a.meta().hidden);
        assert!(a.op().is_none());
        assert_eq!(a.description(), "Select B3");
    }

    #[test]
    fn test_composite_rejects_empty() {
        assert!(CompositeAction::new(meta(1), "empty", Vec::new()).is_none());
    }

    #[test]
    fn test_edit_descriptions() {
        let a1 = CellCoord::ORIGIN;
        let range = CellRange::parse_a1("A1:B2").unwrap();
        assert_eq!(
            EditOp::SetValue {
                cell: a1,
                value: 5.into()
            }
            .describe(),
            "Set A1 to 5"
        );
        assert_eq!(
            EditOp::SetValue {
                cell: a1,
                value: CellValue::Empty
            }
            .describe(),
            "Clear A1"
        );
        assert_eq!(
            EditOp::Merge {
                range,
                direction: MergeDirection::Vertical
            }
            .describe(),
            "Merge A1:B2 down"
        );
        let style = CellStyle {
            bold: Some(true),
            ..CellStyle::default()
        };
        assert_eq!(
            EditOp::Style { range, style }.describe(),
            "Format A1:B2 (bold)"
        );
    }

    #[test]
    fn test_cursor_after_value_edit_moves_active_cell() {
        let current = CursorState::at(CellCoord::ORIGIN);
        let op = EditOp::SetValue {
            cell: CellCoord::new(4, 4),
            value: "x".into(),
        };
        assert_eq!(op.cursor_after(&current), CursorState::at(CellCoord::new(4, 4)));
    }

    #[test]
    fn test_cursor_after_value_edit_keeps_enclosing_selection() {
        let range = CellRange::parse_a1("A1:C3").unwrap();
        let current = CursorState {
            selections: vec![range],
            active_cell: CellCoord::ORIGIN,
        };
        let op = EditOp::SetValue {
            cell: CellCoord::new(1, 1),
            value: 1.into(),
        };
        let after = op.cursor_after(&current);
        assert_eq!(after.selections, vec![range]);
        assert_eq!(after.active_cell, CellCoord::new(1, 1));
    }

    #[test]
    fn test_cursor_after_range_edit_selects_range() {
        let current = CursorState::at(CellCoord::new(9, 9));
        let range = CellRange::parse_a1("B2:C3").unwrap();
        let after = EditOp::Unmerge { range }.cursor_after(&current);
        assert_eq!(after.selections[0], range);
        assert_eq!(after.active_cell, range.start);
    }

    #[test]
    fn test_for_each_leaf_flattens_composites() {
        let inner = CompositeAction::new(
            meta(10),
            "inner",
            vec![DocumentAction::cursor_move(meta(2), ctx(CellCoord::ORIGIN)).into()],
        )
        .unwrap();
        let outer = CompositeAction::new(
            meta(11),
            "outer",
            vec![
                DocumentAction::cursor_move(meta(1), ctx(CellCoord::ORIGIN)).into(),
                inner.into(),
                DocumentAction::cursor_move(meta(3), ctx(CellCoord::ORIGIN)).into(),
            ],
        )
        .unwrap();
        let mut seen = Vec::new();
        Action::from(outer).for_each_leaf(&mut |a| seen.push(a.id().raw()));
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
