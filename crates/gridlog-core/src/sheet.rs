#![forbid(unsafe_code)]

//! Sheet and view identity.
//!
//! A workbook holds ordered sheets; each sheet exposes one or more named
//! views (panes). Views are looked up by name inside a sheet, so a recorded
//! macro can target "the same pane" in whatever sheet is active at replay
//! time.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of a sheet. Survives renames, reorders, and
/// delete/restore cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetId(pub u64);

impl SheetId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet#{}", self.0)
    }
}

/// Stable identifier of a view (pane) within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewId(pub u64);

impl ViewId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Handle to a view as returned by the view resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewRef {
    pub id: ViewId,
    pub sheet_id: SheetId,
    pub name: String,
}

impl ViewRef {
    #[must_use]
    pub fn new(id: ViewId, sheet_id: SheetId, name: impl Into<String>) -> Self {
        Self {
            id,
            sheet_id,
            name: name.into(),
        }
    }
}

/// Descriptive state of one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetInfo {
    pub id: SheetId,
    pub name: String,
    /// Zero-based position in the workbook's tab order.
    pub index: usize,
    /// The view a freshly activated sheet shows first.
    pub primary_view: ViewRef,
}
