#![forbid(unsafe_code)]

//! Collaborator traits: the document API and the view resolver.
//!
//! The history and macro engines never touch document storage directly.
//! Every effect goes through [`DocumentApi`], and every pane lookup or
//! switch through [`ViewResolver`]. A host implements both on its workbook
//! type and hands it to the engine as `&mut dyn Workbook`.
//!
//! # Activation
//!
//! Switching the active sheet or view may leave layout work pending in the
//! host. Instead of sleeping for a fixed period, the switch returns an
//! [`Activation`]: either already ready, or a pending handle the host
//! completes through its [`ActivationSignal`] once coordinates are valid.
//! Callers block on [`Activation::wait`] before reading state from the view.
//!
//! ```text
//!   engine                        host
//!     │ switch_active_view(v) ──►   │
//!     │ ◄── Activation::pending ─── │ (layout starts)
//!     │ wait() ...                  │
//!     │                             │ signal.complete()
//!     │ ◄── Ok(()) ──────────────── │
//! ```

use std::fmt;
use std::sync::mpsc;

use crate::cell::{BorderSpec, CellStyle, CellValue, ClearMode, MergeDirection};
use crate::error::{DocResult, DocumentError};
use crate::geometry::{CellCoord, CellRange};
use crate::sheet::{SheetId, SheetInfo, ViewRef};
use crate::snapshot::{CursorState, RangeSnapshot, SheetSnapshot};

// ============================================================================
// Activation readiness
// ============================================================================

/// Readiness of a sheet or view switch.
pub struct Activation {
    state: ActivationState,
}

enum ActivationState {
    Ready,
    Pending(mpsc::Receiver<DocResult<()>>),
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            ActivationState::Ready => "ready",
            ActivationState::Pending(_) => "pending",
        };
        f.debug_struct("Activation").field("state", &state).finish()
    }
}

impl Activation {
    /// An activation that completed synchronously.
    #[must_use]
    pub fn ready() -> Self {
        Self {
            state: ActivationState::Ready,
        }
    }

    /// A pending activation and the signal that resolves it.
    #[must_use]
    pub fn pending() -> (Self, ActivationSignal) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                state: ActivationState::Pending(rx),
            },
            ActivationSignal { tx },
        )
    }

    /// Block until the host reports the switch complete.
    ///
    /// Returns [`DocumentError::ActivationAborted`] if the signal is dropped
    /// without being completed.
    pub fn wait(self) -> DocResult<()> {
        match self.state {
            ActivationState::Ready => Ok(()),
            ActivationState::Pending(rx) => rx.recv().map_err(|_| DocumentError::ActivationAborted)?,
        }
    }
}

/// Host-side completion handle for a pending [`Activation`].
#[derive(Debug)]
pub struct ActivationSignal {
    tx: mpsc::Sender<DocResult<()>>,
}

impl ActivationSignal {
    /// Mark the switch complete.
    pub fn complete(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// Report that the switch failed.
    pub fn fail(self, error: DocumentError) {
        let _ = self.tx.send(Err(error));
    }
}

// ============================================================================
// Document API
// ============================================================================

/// Cell, style, merge, sheet-lifecycle, and cursor operations.
///
/// Cell-level calls act on the active sheet; cursor calls act on the active
/// view of the active sheet. Failures are reported as [`DocumentError`].
pub trait DocumentApi {
    fn set_cell_value(&mut self, cell: CellCoord, value: &CellValue) -> DocResult<()>;

    fn clear_cells(&mut self, range: CellRange, mode: ClearMode) -> DocResult<()>;

    fn apply_style(&mut self, range: CellRange, style: &CellStyle) -> DocResult<()>;

    fn apply_borders(&mut self, range: CellRange, borders: &BorderSpec) -> DocResult<()>;

    fn merge_cells(&mut self, range: CellRange, direction: MergeDirection) -> DocResult<()>;

    fn unmerge_cells(&mut self, range: CellRange) -> DocResult<()>;

    /// Merged regions of the active sheet.
    fn current_merged_cells(&self) -> Vec<CellRange>;

    /// Capture values, styles, borders, and intersecting merges of `range`.
    fn snapshot_range(&self, range: CellRange) -> DocResult<RangeSnapshot>;

    /// Put `snapshot.range` (and every captured merge) back exactly as captured.
    fn restore_range(&mut self, snapshot: &RangeSnapshot) -> DocResult<()>;

    /// Sheets in tab order.
    fn sheets(&self) -> Vec<SheetInfo>;

    fn active_sheet(&self) -> SheetId;

    fn sheet(&self, id: SheetId) -> Option<SheetInfo> {
        self.sheets().into_iter().find(|s| s.id == id)
    }

    fn sheet_by_name(&self, name: &str) -> Option<SheetInfo> {
        self.sheets().into_iter().find(|s| s.name == name)
    }

    /// Insert a new empty sheet after `after` (or at the end).
    fn create_sheet(&mut self, after: Option<SheetId>) -> DocResult<SheetInfo>;

    fn delete_sheet(&mut self, id: SheetId) -> DocResult<()>;

    /// Copy a sheet; the copy is placed right after the source.
    fn duplicate_sheet(&mut self, id: SheetId) -> DocResult<SheetInfo>;

    fn rename_sheet(&mut self, id: SheetId, name: &str) -> DocResult<()>;

    fn reorder_sheet(&mut self, from_index: usize, to_index: usize) -> DocResult<()>;

    fn activate_sheet(&mut self, id: SheetId) -> DocResult<Activation>;

    fn snapshot_sheet(&self, id: SheetId) -> DocResult<SheetSnapshot>;

    /// Re-insert a previously captured sheet with its original id and index.
    fn restore_sheet(&mut self, snapshot: &SheetSnapshot) -> DocResult<()>;

    fn active_cell(&self) -> CellCoord;

    fn selections(&self) -> Vec<CellRange>;

    fn cursor(&self) -> CursorState {
        CursorState {
            selections: self.selections(),
            active_cell: self.active_cell(),
        }
    }

    fn set_cursor(&mut self, cursor: &CursorState) -> DocResult<()>;
}

// ============================================================================
// View resolver
// ============================================================================

/// Locates and activates named views (panes) inside sheets.
pub trait ViewResolver {
    fn find_view_by_name(&self, sheet: SheetId, name: &str) -> Option<ViewRef>;

    /// The active view of the active sheet.
    fn active_view(&self) -> Option<ViewRef>;

    fn switch_active_view(&mut self, view: &ViewRef) -> DocResult<Activation>;

    /// Repaint whatever UI observes the document.
    fn request_refresh(&mut self);
}

/// Everything the engine needs from a host.
pub trait Workbook: DocumentApi + ViewResolver {}

impl<T: DocumentApi + ViewResolver + ?Sized> Workbook for T {}

// ============================================================================
// Switch helpers
// ============================================================================

/// Make `sheet` the active sheet, waiting for readiness.
///
/// Returns `true` if a switch happened.
pub fn ensure_sheet_active(host: &mut dyn Workbook, sheet: SheetId) -> DocResult<bool> {
    if host.active_sheet() == sheet {
        return Ok(false);
    }
    tracing::trace!(sheet = sheet.raw(), "activating sheet");
    host.activate_sheet(sheet)?.wait()?;
    Ok(true)
}

/// Make `view` the active view (activating its sheet first), waiting for
/// readiness after each switch.
///
/// Returns `true` if any switch happened.
pub fn ensure_view_active(host: &mut dyn Workbook, view: &ViewRef) -> DocResult<bool> {
    let mut switched = ensure_sheet_active(host, view.sheet_id)?;
    let current = host.active_view();
    if current.as_ref().map(|v| v.id) != Some(view.id) {
        tracing::trace!(view = view.id.raw(), name = %view.name, "switching view");
        host.switch_active_view(view)?.wait()?;
        switched = true;
    }
    Ok(switched)
}
