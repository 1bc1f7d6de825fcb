#![forbid(unsafe_code)]

//! Errors raised by the document collaborator.
//!
//! These propagate unmodified through action undo/redo and the history log.
//! Only the macro player converts them into replay error codes.

use crate::geometry::CellRange;
use crate::sheet::SheetId;

/// Result alias for document API calls.
pub type DocResult<T> = Result<T, DocumentError>;

/// A failed call into the document or view collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// No sheet with this id exists.
    #[error("sheet {0} not found")]
    SheetNotFound(SheetId),
    /// No sheet carries this name.
    #[error("no sheet named '{0}'")]
    SheetNameNotFound(String),
    /// Another sheet already uses the name.
    #[error("sheet name '{0}' is already in use")]
    SheetNameTaken(String),
    /// A sheet name was empty or otherwise unusable.
    #[error("invalid sheet name '{0}'")]
    InvalidSheetName(String),
    /// The workbook must keep at least one sheet.
    #[error("cannot delete the last remaining sheet")]
    LastSheet,
    /// No view with this name exists in the sheet.
    #[error("view '{name}' not found in {sheet}")]
    ViewNotFound { sheet: SheetId, name: String },
    /// The sheet has no active view to edit through.
    #[error("{0} has no active view")]
    NoActiveView(SheetId),
    /// A tab position was outside the sheet list.
    #[error("sheet index {index} out of range (have {len} sheets)")]
    IndexOutOfRange { index: usize, len: usize },
    /// A merge request overlaps an existing merged region.
    #[error("range {0} overlaps an existing merge")]
    MergeConflict(CellRange),
    /// The activation readiness signal was dropped before completing.
    #[error("view activation was abandoned before it completed")]
    ActivationAborted,
    /// The collaborator refused the call.
    #[error("document rejected the operation: {0}")]
    Rejected(String),
    /// A remote backend failed (sheet lifecycle calls may cross the network).
    #[error("remote call failed: {0}")]
    Remote(String),
}
