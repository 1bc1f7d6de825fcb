#![forbid(unsafe_code)]

//! Replay step failures.
//!
//! A [`MacroError`] is a value, not a raised error: the player records the
//! first one it meets, keeps going with the remaining steps, and returns it
//! once the run is over.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a macro step could not be replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MacroErrorCode {
    /// The step's sheet or view does not exist.
    InvalidTarget,
    /// The translated coordinates fall before `A1`.
    StartingCoordinateTooSmall,
    SheetCreateFailed,
    SheetDuplicateFailed,
    SheetRenameFailed,
    SheetDeleteFailed,
    SheetReorderFailed,
    SheetActivateFailed,
    /// The document rejected a cell-level edit.
    EditFailed,
    /// The view could not be switched to or did not become ready.
    ViewActivationFailed,
}

impl MacroErrorCode {
    /// Stable kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTarget => "invalid-target",
            Self::StartingCoordinateTooSmall => "starting-coordinate-too-small",
            Self::SheetCreateFailed => "sheet-create-failed",
            Self::SheetDuplicateFailed => "sheet-duplicate-failed",
            Self::SheetRenameFailed => "sheet-rename-failed",
            Self::SheetDeleteFailed => "sheet-delete-failed",
            Self::SheetReorderFailed => "sheet-reorder-failed",
            Self::SheetActivateFailed => "sheet-activate-failed",
            Self::EditFailed => "edit-failed",
            Self::ViewActivationFailed => "view-activation-failed",
        }
    }

    const fn summary(self) -> &'static str {
        match self {
            Self::InvalidTarget => "the target sheet or view no longer exists",
            Self::StartingCoordinateTooSmall => {
                "the macro would start before the first row or column"
            }
            Self::SheetCreateFailed => "the sheet could not be created",
            Self::SheetDuplicateFailed => "the sheet could not be duplicated",
            Self::SheetRenameFailed => "the sheet could not be renamed",
            Self::SheetDeleteFailed => "the sheet could not be deleted",
            Self::SheetReorderFailed => "the sheet could not be moved",
            Self::SheetActivateFailed => "the sheet could not be activated",
            Self::EditFailed => "the document rejected the edit",
            Self::ViewActivationFailed => "the view could not be activated",
        }
    }
}

impl fmt::Display for MacroErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed replay step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacroError {
    pub code: MacroErrorCode,
    /// Zero-based index of the failing step.
    pub step: usize,
    /// Underlying document error, if any.
    pub detail: Option<String>,
}

impl MacroError {
    #[must_use]
    pub fn new(code: MacroErrorCode, step: usize) -> Self {
        Self {
            code,
            step,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    /// Human-readable explanation.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} ({detail})", self.code.summary()),
            None => self.code.summary().to_string(),
        }
    }
}

impl fmt::Display for MacroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}: {}: {}", self.step + 1, self.code, self.message())
    }
}

impl std::error::Error for MacroError {}
