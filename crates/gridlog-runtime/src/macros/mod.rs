#![forbid(unsafe_code)]

//! Macro recording and replay.
//!
//! # Architecture
//!
//! ```text
//!  ActionLog selection ──► MacroRecorder ──► MacroItem ──► MacroStore
//!                                                             │
//!                      ActionLog ◄── CompositeAction ◄── MacroPlayer
//! ```
//!
//! A macro is recorded from the history entries the user selected. Each
//! step remembers where it happened as an offset (see [`offset`]), names its
//! view instead of pointing at it, and refers to sheets by name or by their
//! position among sheets the macro itself created. Replay goes through the
//! same edit performers as interactive editing, so the result is an ordinary
//! undoable history entry.
//!
//! # Module Structure
//!
//! - [`macro_action`]: portable steps and the recorded [`MacroItem`]
//! - [`offset`]: reference modes, offsets, and correction queues
//! - [`recorder`]: history entries to steps
//! - [`store`]: the macro catalog
//! - [`player`]: replay with per-step error capture
//! - [`error`]: replay error codes

pub mod error;
pub mod macro_action;
pub mod offset;
pub mod player;
pub mod recorder;
pub mod store;

pub use error::{MacroError, MacroErrorCode};
pub use macro_action::{
    CellEffect, DocumentStep, MacroAction, MacroItem, MacroStep, SheetStep, SheetTarget,
};
pub use offset::{
    ActiveCellOffset, CorrectionQueues, ReferenceMode, SelectionOffset, resolve_active_cell,
    resolve_selection,
};
pub use player::{MacroPlayer, PlaybackReport};
pub use recorder::MacroRecorder;
pub use store::{MacroStore, MacroStoreError};
