#![forbid(unsafe_code)]

//! gridlog public facade crate.
//!
//! Re-exports the document traits from `gridlog-core` and the history and
//! macro engine from `gridlog-runtime`, plus a prelude for hosts that just
//! want to wire an [`EditSession`] to their workbook.
//!
//! ```rust,ignore
//! use gridlog::prelude::*;
//!
//! let mut session = EditSession::new("alice", SessionConfig::default());
//! session.apply_edit(&mut workbook, &EditOp::SetValue { cell, value: 3.into() })?;
//! session.undo(&mut workbook)?;
//! ```

// --- Core re-exports -------------------------------------------------------

pub use gridlog_core::{
    Activation, ActivationSignal, BorderEdges, BorderLine, BorderSpec, CellBorders, CellCoord,
    CellRange, CellStyle, CellValue, ClearMode, CursorState, DocResult, DocumentApi,
    DocumentError, LogFormat, LoggingConfig, MergeDirection, RangeSnapshot, SheetId, SheetInfo,
    SheetSnapshot, ViewId, ViewRef, ViewResolver, Workbook,
};

// --- Runtime re-exports ----------------------------------------------------

pub use gridlog_runtime::{
    Action, ActionId, ActionLog, ConfigError, EditOp, EditSession, HistoryChange, HistoryConfig,
    HistoryEntry, HistorySnapshot, MacroConfig, MacroError, MacroErrorCode, MacroId, MacroItem,
    MacroPlayer, MacroRecorder, MacroStore, PlaybackReport, ReferenceMode, SessionConfig, SheetOp,
    UnknownMacro,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gridlog hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The workbook rejected an operation.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// A replay step failed.
    #[error(transparent)]
    Macro(#[from] MacroError),
    #[error(transparent)]
    UnknownMacro(#[from] UnknownMacro),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Standard result type for gridlog APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CellCoord, CellRange, CellValue, CursorState, DocumentApi, EditOp, EditSession, Error,
        ReferenceMode, Result, SessionConfig, SheetOp, ViewResolver, Workbook,
    };

    pub use crate::{core, runtime};

    #[cfg(feature = "harness")]
    pub use crate::harness;
}

pub use gridlog_core as core;
#[cfg(feature = "harness")]
pub use gridlog_harness as harness;
pub use gridlog_runtime as runtime;
