#![forbid(unsafe_code)]

//! Core: coordinates, cell state, snapshots, and collaborator traits.
//!
//! # Role in gridlog
//! `gridlog-core` is the vocabulary shared by the history engine and its
//! hosts. It owns the value types an edit talks about (cells, ranges,
//! styles, sheets, views), the complete-state snapshots that make undo
//! independent of the live document, and the two traits a host implements:
//! [`DocumentApi`](document::DocumentApi) and
//! [`ViewResolver`](document::ViewResolver).
//!
//! # How it fits in the system
//! The runtime (`gridlog-runtime`) records actions against these traits and
//! replays macros through them. It never sees a concrete workbook, so any
//! spreadsheet model (the in-memory harness, a remote-backed document, a GUI
//! grid) can sit underneath.

pub mod cell;
pub mod document;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod sheet;
pub mod snapshot;

pub use cell::{
    BorderEdges, BorderLine, BorderSpec, CellBorders, CellStyle, CellValue, ClearMode,
    HorizontalAlign, MergeDirection, Rgb,
};
pub use document::{
    Activation, ActivationSignal, DocumentApi, ViewResolver, Workbook, ensure_sheet_active,
    ensure_view_active,
};
pub use error::{DocResult, DocumentError};
pub use geometry::{CellCoord, CellRange, ParseCoordError};
pub use logging::{LogFormat, LoggingConfig};
pub use sheet::{SheetId, SheetInfo, ViewId, ViewRef};
pub use snapshot::{CellSnapshot, CursorState, RangeSnapshot, SheetSnapshot};
