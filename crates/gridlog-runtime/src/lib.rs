#![forbid(unsafe_code)]

//! gridlog Runtime
//!
//! Undo/redo history and macro record/replay for spreadsheet documents.
//!
//! # Key Components
//!
//! - [`ActionLog`] - Two-stack history with hidden-action grouping and a selection set
//! - [`Action`] - Reversible edits: cell-level, structural, and composite
//! - [`MacroRecorder`] - Turns selected history entries into a portable macro
//! - [`MacroPlayer`] - Replays a macro as one undoable entry, collecting step errors
//! - [`MacroStore`] - Named macro catalog
//! - [`EditSession`] - Per-workbook context tying the pieces together
//! - [`SessionConfig`] - History, macro, and logging settings
//!
//! # Role in gridlog
//! `gridlog-runtime` is the engine. It talks to the document only through
//! the `gridlog-core` traits (`DocumentApi`, `ViewResolver`), captures
//! complete before/after snapshots for every edit, and restores them on
//! undo and redo.
//!
//! # How it fits in the system
//! A host (a GUI grid, a server-side document, or the `gridlog-harness`
//! in-memory workbook) implements the core traits and owns one
//! [`EditSession`] per open workbook. Interactive edits, history panel
//! clicks, and macro commands all go through that session.

pub mod config;
pub mod history;
pub mod ids;
pub mod macros;
pub mod session;

pub use config::{ConfigError, MacroConfig, SessionConfig};
pub use history::{
    Action, ActionKind, ActionLog, ActionMeta, ActionSource, CompositeAction, DocumentAction,
    EditOp, HistoryChange, HistoryConfig, HistoryEntry, HistorySnapshot, Origin, SheetOp,
    StructuralAction,
};
pub use ids::{ActionId, IdAllocator, MacroActionId, MacroId};
pub use macros::{
    MacroError, MacroErrorCode, MacroItem, MacroPlayer, MacroRecorder, MacroStore,
    PlaybackReport, ReferenceMode,
};
pub use session::{EditSession, UnknownMacro};
