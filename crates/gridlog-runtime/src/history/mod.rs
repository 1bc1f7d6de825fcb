#![forbid(unsafe_code)]

//! Undo/redo history for spreadsheet edits.
//!
//! # Architecture
//!
//! ```text
//!  host edit ──► perform_edit / perform_sheet_op ──► Action ──► ActionLog::add
//!                         │                                        │
//!                         ▼                                        ▼
//!                  DocumentApi calls                      undo / redo / jumps
//!                (snapshot, apply, snapshot)          (restore via snapshots)
//! ```
//!
//! # Module Structure
//!
//! - [`action`]: the `Action` enum and its leaf/composite variants
//! - [`perform`]: apply an edit and produce its reversible action
//! - [`action_log`]: the two-stack log, selection set, and change listener
//!
//! # Quick Start
//!
//! ```ignore
//! use gridlog_runtime::history::{ActionLog, EditOp, Origin, perform_edit};
//!
//! let mut log = ActionLog::default();
//! let op = EditOp::SetValue { cell: "B2".parse()?, value: 42.into() };
//! let action = perform_edit(&mut workbook, &mut ids, &Origin::user("me"), &op)?;
//! log.add(action.into());
//!
//! log.undo(&mut workbook, true)?;
//! log.redo(&mut workbook, true)?;
//! ```

pub mod action;
pub mod action_log;
pub mod perform;

pub use action::{
    Action, ActionKind, ActionMeta, ActionSource, CellChange, CompositeAction, DocumentAction,
    DocumentContext, EditOp, SheetChange, SheetLabel, SheetOp, StructuralAction,
};
pub use action_log::{ActionLog, HistoryChange, HistoryConfig, HistoryEntry, HistorySnapshot};
pub use perform::{Origin, affected_region, capture_cursor, perform_edit, perform_sheet_op};
