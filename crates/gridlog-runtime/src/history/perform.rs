#![forbid(unsafe_code)]

//! Edit performers: apply an edit through the document API and return the
//! leaf action that reverses it.
//!
//! Both the host's interactive editing path and macro playback go through
//! these functions, so every effect lands in the history log with the same
//! snapshot discipline:
//!
//! ```text
//! snapshot(before) ─► apply op ─► snapshot(after) ─► DocumentAction
//! ```
//!
//! The snapshot region is the edit's range grown to cover every merge that
//! touches it, so undoing a merge or unmerge restores whole merged blocks.

use gridlog_core::{CellRange, DocResult, DocumentError, SheetId, Workbook};

use super::action::{
    ActionKind, ActionMeta, ActionSource, CellChange, DocumentAction, DocumentContext, EditOp,
    SheetChange, SheetLabel, SheetOp, StructuralAction,
};
use crate::ids::{ActionId, IdAllocator};

/// Who is performing edits, stamped onto every action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub owner: String,
    pub source: ActionSource,
    pub tags: Vec<String>,
}

impl Origin {
    /// Interactive edits by `owner`.
    #[must_use]
    pub fn user(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            source: ActionSource::User,
            tags: Vec::new(),
        }
    }

    /// Edits produced by replaying the macro `name`.
    #[must_use]
    pub fn replay(owner: impl Into<String>, name: &str, tagged: bool) -> Self {
        let tags = if tagged {
            vec![format!("macro:{name}")]
        } else {
            Vec::new()
        };
        Self {
            owner: owner.into(),
            source: ActionSource::Macro,
            tags,
        }
    }

    /// Metadata for a new action.
    #[must_use]
    pub fn meta(&self, id: ActionId, kind: ActionKind) -> ActionMeta {
        let mut meta = ActionMeta::new(id, kind, self.owner.clone()).with_source(self.source);
        meta.tags.extend(self.tags.iter().cloned());
        meta
    }
}

/// Grow `range` until no merged region sticks out of it.
#[must_use]
pub fn affected_region(range: CellRange, merges: &[CellRange]) -> CellRange {
    let mut region = range;
    loop {
        let grown = merges
            .iter()
            .filter(|m| m.intersects(&region))
            .fold(region, |acc, m| acc.union(m));
        if grown == region {
            return region;
        }
        region = grown;
    }
}

fn current_context(host: &dyn Workbook) -> DocResult<DocumentContext> {
    let sheet_id = host.active_sheet();
    let view = host
        .active_view()
        .ok_or(DocumentError::NoActiveView(sheet_id))?;
    Ok(DocumentContext {
        sheet_id,
        view,
        cursor: host.cursor(),
    })
}

/// Apply a cell-level edit to the active sheet and return its action.
///
/// The cursor ends up on the edit's target (see [`EditOp::cursor_after`]).
/// If the document rejects the edit, the region is put back to its captured
/// state and the error is returned.
pub fn perform_edit(
    host: &mut dyn Workbook,
    ids: &mut IdAllocator,
    origin: &Origin,
    op: &EditOp,
) -> DocResult<DocumentAction> {
    let mut context = current_context(host)?;
    let region = affected_region(op.range(), &host.current_merged_cells());
    let before = host.snapshot_range(region)?;

    if let Err(err) = op.apply(host) {
        if let Err(restore) = host.restore_range(&before) {
            tracing::warn!(
                target: "gridlog.history",
                history_event = "rollback_failed",
                region = %region,
                error = %restore,
                "rejected edit left the region partially applied"
            );
        }
        return Err(err);
    }
    let after = host.snapshot_range(region)?;

    let cursor_before = context.cursor.clone();
    context.cursor = op.cursor_after(&cursor_before);
    host.set_cursor(&context.cursor)?;

    let meta = origin.meta(ids.next_action_id(), ActionKind::Document);
    Ok(DocumentAction::edit(
        meta,
        context,
        CellChange {
            op: op.clone(),
            before,
            after,
            cursor_before,
        },
    ))
}

/// Record the current cursor as a hidden action.
pub fn capture_cursor(
    host: &dyn Workbook,
    ids: &mut IdAllocator,
    origin: &Origin,
) -> DocResult<DocumentAction> {
    let context = current_context(host)?;
    let meta = origin.meta(ids.next_action_id(), ActionKind::Document);
    Ok(DocumentAction::cursor_move(meta, context))
}

/// Apply a sheet lifecycle operation and return its action.
pub fn perform_sheet_op(
    host: &mut dyn Workbook,
    ids: &mut IdAllocator,
    origin: &Origin,
    op: &SheetOp,
) -> DocResult<StructuralAction> {
    let change = match op {
        SheetOp::Create { after } => {
            let after = match after {
                Some(id) => Some(label(host, *id)?),
                None => None,
            };
            let info = host.create_sheet(after.as_ref().map(|l| l.id))?;
            SheetChange::Created {
                sheet: host.snapshot_sheet(info.id)?,
                after,
            }
        }
        SheetOp::Delete { sheet } => {
            let snapshot = host.snapshot_sheet(*sheet)?;
            let was_active = host.active_sheet() == *sheet;
            host.delete_sheet(*sheet)?;
            SheetChange::Deleted {
                sheet: snapshot,
                was_active,
            }
        }
        SheetOp::Duplicate { sheet } => {
            let source = label(host, *sheet)?;
            let info = host.duplicate_sheet(*sheet)?;
            SheetChange::Duplicated {
                source,
                copy: host.snapshot_sheet(info.id)?,
            }
        }
        SheetOp::Rename { sheet, name } => {
            let from = label(host, *sheet)?.name;
            host.rename_sheet(*sheet, name)?;
            SheetChange::Renamed {
                sheet: *sheet,
                from,
                to: name.clone(),
            }
        }
        SheetOp::Reorder { from, to } => {
            let sheet = sheet_at(host, *from)?;
            host.reorder_sheet(*from, *to)?;
            SheetChange::Reordered {
                sheet,
                from: *from,
                to: *to,
            }
        }
        SheetOp::Activate { sheet } => {
            let from = host.active_sheet();
            let to = label(host, *sheet)?;
            host.activate_sheet(*sheet)?.wait()?;
            SheetChange::Activated { from, to }
        }
    };
    let meta = origin.meta(ids.next_action_id(), ActionKind::Structural);
    Ok(StructuralAction::new(meta, change))
}

fn label(host: &dyn Workbook, id: SheetId) -> DocResult<SheetLabel> {
    let info = host.sheet(id).ok_or(DocumentError::SheetNotFound(id))?;
    Ok(SheetLabel {
        id,
        name: info.name,
    })
}

fn sheet_at(host: &dyn Workbook, index: usize) -> DocResult<SheetId> {
    let sheets = host.sheets();
    sheets
        .get(index)
        .map(|s| s.id)
        .ok_or(DocumentError::IndexOutOfRange {
            index,
            len: sheets.len(),
        })
}
