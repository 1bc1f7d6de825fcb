#![forbid(unsafe_code)]

//! Macro replay.
//!
//! # Replay loop
//!
//! ```text
//!  for each step ──► resolve sheet/view ──► activate + wait ──► translate
//!                          │ missing             │ failed          │ before A1
//!                          ▼                     ▼                 ▼
//!                    invalid-target     *-activate-failed   push correction
//!                                                                   │
//!   perform_edit / capture_cursor / perform_sheet_op ◄── ok ───────┘
//!                          │
//!                          ▼
//!                     stage action
//!
//!  after loop: one request_refresh, one CompositeAction added to the log
//! ```
//!
//! # Failure Modes
//!
//! A failed step never aborts the run. Only the first [`MacroError`] is kept;
//! every step that did apply stays applied and is undone as a single entry.

use gridlog_core::{
    CursorState, DocumentError, SheetId, Workbook, ensure_sheet_active, ensure_view_active,
};

use super::error::{MacroError, MacroErrorCode};
use super::macro_action::{DocumentStep, MacroItem, MacroStep, SheetStep, SheetTarget};
use super::offset::{CorrectionQueues, ReferenceMode, resolve_active_cell, resolve_selection};
use crate::history::{
    Action, ActionKind, ActionLog, CompositeAction, Origin, SheetChange, SheetOp, capture_cursor,
    perform_edit, perform_sheet_op,
};
use crate::ids::{ActionId, IdAllocator};

/// Outcome of one replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Steps that produced an action.
    pub applied: usize,
    /// Steps that failed and were skipped.
    pub skipped: usize,
    pub first_error: Option<MacroError>,
    /// The composite added to the log, if any step applied.
    pub action: Option<ActionId>,
}

impl PlaybackReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.first_error.is_none()
    }
}

/// Replays recorded macros against a workbook.
#[derive(Debug, Clone, Copy)]
pub struct MacroPlayer {
    tag_replayed_actions: bool,
}

impl Default for MacroPlayer {
    fn default() -> Self {
        Self {
            tag_replayed_actions: true,
        }
    }
}

impl MacroPlayer {
    /// When `tag_replayed_actions` is set, every produced action carries a
    /// `macro:<name>` tag.
    #[must_use]
    pub fn new(tag_replayed_actions: bool) -> Self {
        Self {
            tag_replayed_actions,
        }
    }

    /// Replay `item` and return the first step failure, if any.
    pub fn play(
        &self,
        item: &MacroItem,
        host: &mut dyn Workbook,
        log: &mut ActionLog,
        ids: &mut IdAllocator,
        owner: &str,
    ) -> Option<MacroError> {
        self.play_with_report(item, host, log, ids, owner)
            .first_error
    }

    /// Replay `item` and report what happened.
    pub fn play_with_report(
        &self,
        item: &MacroItem,
        host: &mut dyn Workbook,
        log: &mut ActionLog,
        ids: &mut IdAllocator,
        owner: &str,
    ) -> PlaybackReport {
        tracing::info!(
            target: "gridlog.macros",
            macro_event = "playback_start",
            name = %item.name(),
            steps = item.len(),
            mode = ?item.reference_mode(),
        );

        let mut replay = Replay {
            mode: item.reference_mode(),
            origin: Origin::replay(owner, item.name(), self.tag_replayed_actions),
            queues: CorrectionQueues::new(),
            created: Vec::new(),
            staged: Vec::new(),
        };
        let mut report = PlaybackReport::default();

        for (index, step) in item.actions().iter().enumerate() {
            let outcome = match &step.state {
                MacroStep::Document(doc) => replay.document_step(host, ids, index, doc),
                MacroStep::Structural(sheet) => replay.structural_step(host, ids, index, sheet),
            };
            match outcome {
                Ok(action) => {
                    replay.staged.push(action);
                    report.applied += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        target: "gridlog.macros",
                        macro_event = "step_failed",
                        name = %item.name(),
                        step = index,
                        code = err.code.as_str(),
                        detail = err.detail.as_deref().unwrap_or(""),
                    );
                    report.skipped += 1;
                    if report.first_error.is_none() {
                        report.first_error = Some(err);
                    }
                }
            }
        }

        host.request_refresh();

        let meta = replay.origin.meta(ids.next_action_id(), ActionKind::Base);
        if let Some(group) = CompositeAction::new(meta, item.name(), replay.staged) {
            let id = group.meta().id;
            log.add(group.into());
            report.action = Some(id);
        }

        tracing::info!(
            target: "gridlog.macros",
            macro_event = "playback_stop",
            name = %item.name(),
            applied = report.applied,
            skipped = report.skipped,
            error = report.first_error.as_ref().map(|e| e.code.as_str()).unwrap_or("none"),
        );
        report
    }
}

// ============================================================================
// Per-run state
// ============================================================================

struct Replay {
    mode: ReferenceMode,
    origin: Origin,
    queues: CorrectionQueues,
    /// One slot per creating step, `None` when that step failed.
    created: Vec<Option<SheetId>>,
    staged: Vec<Action>,
}

fn failure(code: MacroErrorCode, index: usize) -> impl FnOnce(DocumentError) -> MacroError {
    move |err| MacroError::new(code, index).with_detail(err)
}

impl Replay {
    fn document_step(
        &mut self,
        host: &mut dyn Workbook,
        ids: &mut IdAllocator,
        index: usize,
        step: &DocumentStep,
    ) -> Result<Action, MacroError> {
        let sheet = host.active_sheet();
        let view = host
            .find_view_by_name(sheet, &step.view_name)
            .ok_or_else(|| {
                MacroError::new(MacroErrorCode::InvalidTarget, index)
                    .with_detail(format_args!("no view named '{}'", step.view_name))
            })?;
        ensure_view_active(host, &view)
            .map_err(failure(MacroErrorCode::ViewActivationFailed, index))?;

        let current = host.active_cell();
        let corrections = self.queues.get(sheet, view.id);
        let resolved = resolve_active_cell(&step.active_cell, self.mode, current, corrections)
            .and_then(|active| {
                resolve_selection(&step.selection, self.mode, current, corrections)
                    .map(|selection| (active, selection))
            });
        let (active, selection) = match resolved {
            Ok(placed) => placed,
            Err(code) => {
                self.queues.push(sheet, view.id, step.active_cell);
                return Err(MacroError::new(code, index));
            }
        };
        self.queues.clear(sheet, view.id);

        let cursor = CursorState {
            selections: vec![selection],
            active_cell: active,
        };
        host.set_cursor(&cursor)
            .map_err(failure(MacroErrorCode::EditFailed, index))?;
        let performed = match step.effect.at(active, selection) {
            Some(op) => perform_edit(host, ids, &self.origin, &op),
            None => capture_cursor(host, ids, &self.origin),
        };
        performed
            .map(Action::from)
            .map_err(failure(MacroErrorCode::EditFailed, index))
    }

    fn resolve(&self, host: &dyn Workbook, target: &SheetTarget) -> Option<SheetId> {
        match target {
            SheetTarget::Active => Some(host.active_sheet()),
            SheetTarget::Named(name) => host.sheet_by_name(name).map(|info| info.id),
            SheetTarget::Created(n) => self.created.get(*n).copied().flatten(),
        }
    }

    fn target(
        &self,
        host: &dyn Workbook,
        target: &SheetTarget,
        index: usize,
    ) -> Result<SheetId, MacroError> {
        self.resolve(host, target).ok_or_else(|| {
            MacroError::new(MacroErrorCode::InvalidTarget, index)
                .with_detail(format_args!("sheet {target:?} not found"))
        })
    }

    fn structural_step(
        &mut self,
        host: &mut dyn Workbook,
        ids: &mut IdAllocator,
        index: usize,
        step: &SheetStep,
    ) -> Result<Action, MacroError> {
        let result = self.structural_op(host, ids, index, step);
        if step.creates_sheet() {
            let created = result.as_ref().ok().and_then(|action| match action {
                Action::Structural(sheet) => match sheet.change() {
                    SheetChange::Created { sheet, .. } => Some(sheet.info.id),
                    SheetChange::Duplicated { copy, .. } => Some(copy.info.id),
                    _ => None,
                },
                _ => None,
            });
            self.created.push(created);
        }
        result
    }

    fn structural_op(
        &mut self,
        host: &mut dyn Workbook,
        ids: &mut IdAllocator,
        index: usize,
        step: &SheetStep,
    ) -> Result<Action, MacroError> {
        let (op, code) = match step {
            SheetStep::Create { after } => {
                let after = match after {
                    Some(target) => Some(self.target(host, target, index)?),
                    None => None,
                };
                (SheetOp::Create { after }, MacroErrorCode::SheetCreateFailed)
            }
            SheetStep::Delete { sheet } => (
                SheetOp::Delete {
                    sheet: self.target(host, sheet, index)?,
                },
                MacroErrorCode::SheetDeleteFailed,
            ),
            SheetStep::Duplicate { sheet } => {
                let sheet = self.target(host, sheet, index)?;
                ensure_sheet_active(host, sheet)
                    .map_err(failure(MacroErrorCode::SheetActivateFailed, index))?;
                (
                    SheetOp::Duplicate { sheet },
                    MacroErrorCode::SheetDuplicateFailed,
                )
            }
            SheetStep::Rename { sheet, name } => {
                let sheet = self.target(host, sheet, index)?;
                ensure_sheet_active(host, sheet)
                    .map_err(failure(MacroErrorCode::SheetActivateFailed, index))?;
                (
                    SheetOp::Rename {
                        sheet,
                        name: name.clone(),
                    },
                    MacroErrorCode::SheetRenameFailed,
                )
            }
            SheetStep::Reorder { from, to } => (
                SheetOp::Reorder {
                    from: *from,
                    to: *to,
                },
                MacroErrorCode::SheetReorderFailed,
            ),
            SheetStep::Activate { sheet } => (
                SheetOp::Activate {
                    sheet: self.target(host, sheet, index)?,
                },
                MacroErrorCode::SheetActivateFailed,
            ),
        };
        perform_sheet_op(host, ids, &self.origin, &op)
            .map(Action::from)
            .map_err(failure(code, index))
    }
}
