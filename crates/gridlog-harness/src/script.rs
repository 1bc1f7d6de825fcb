#![forbid(unsafe_code)]

//! JSON editing scripts.
//!
//! A [`Script`] is a list of steps run in order against a fresh
//! [`MemoryWorkbook`] through an [`EditSession`]. A failing step is recorded
//! in the report and the run continues, so one script can show both the
//! happy path and the error surface.
//!
//! ```json
//! {
//!   "owner": "demo",
//!   "steps": [
//!     { "step": "edit", "edit": { "op": "set_value", "cell": "A1", "value": 10 } },
//!     { "step": "edit", "edit": { "op": "set_value", "cell": "B1", "value": 20 } },
//!     { "step": "select_recent", "count": 2 },
//!     { "step": "record", "name": "Fill row" },
//!     { "step": "cursor", "cell": "C3" },
//!     { "step": "play", "name": "Fill row" }
//!   ]
//! }
//! ```
//!
//! Sheets are referenced by name and resolved when the step runs.

use serde::{Deserialize, Serialize};

use gridlog_core::{
    CellCoord, CellRange, CellValue, CursorState, DocResult, DocumentApi, DocumentError, SheetId,
    ViewResolver, ensure_view_active,
};
use gridlog_runtime::{
    Action, ActionId, EditOp, EditSession, HistoryEntry, MacroItem, ReferenceMode, SessionConfig,
    SheetOp,
};

use crate::workbook::MemoryWorkbook;

fn default_owner() -> String {
    "harness".to_string()
}

/// A script file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default)]
    pub config: SessionConfig,
    pub steps: Vec<ScriptStep>,
}

/// One scripted command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    /// A cell-level edit on the active sheet.
    Edit { edit: EditOp },
    /// Move the cursor and note it in the history.
    Cursor {
        cell: CellCoord,
        #[serde(default)]
        selection: Option<CellRange>,
    },
    /// Add a view to the active sheet.
    AddView { name: String },
    /// Switch to a view of the active sheet.
    View { name: String },
    CreateSheet {
        #[serde(default)]
        after: Option<String>,
    },
    DeleteSheet { name: String },
    DuplicateSheet { name: String },
    RenameSheet { name: String, to: String },
    MoveSheet { from: usize, to: usize },
    ActivateSheet { name: String },
    Undo,
    Redo,
    UndoTo { action: ActionId },
    RedoTo { action: ActionId },
    /// Toggle one entry's selection.
    Select { action: ActionId },
    /// Toggle the `count` most recent visible undo entries.
    SelectRecent { count: usize },
    /// Record the selection as a macro.
    Record {
        name: String,
        #[serde(default)]
        mode: Option<ReferenceMode>,
    },
    /// Replay a stored macro by name.
    Play { name: String },
}

// ============================================================================
// Report
// ============================================================================

/// Non-empty cell of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDump {
    pub cell: CellCoord,
    pub value: CellValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetDump {
    pub name: String,
    pub active: bool,
    pub merges: Vec<CellRange>,
    pub cells: Vec<CellDump>,
}

/// One history entry as shown in a history panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub id: ActionId,
    pub description: String,
    pub hidden: bool,
    pub selected: bool,
    pub undone: bool,
}

impl From<HistoryEntry> for HistoryRow {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            description: entry.description,
            hidden: entry.hidden,
            selected: entry.selected,
            undone: entry.undone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRow {
    pub name: String,
    pub mode: ReferenceMode,
    pub steps: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRow {
    pub name: String,
    pub applied: usize,
    pub skipped: usize,
    pub error: Option<String>,
}

/// A step that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    /// Zero-based step index.
    pub step: usize,
    pub error: String,
}

/// Everything a script run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptReport {
    pub sheets: Vec<SheetDump>,
    pub history: Vec<HistoryRow>,
    pub macros: Vec<MacroRow>,
    pub playbacks: Vec<PlaybackRow>,
    pub failures: Vec<StepFailure>,
}

impl ScriptReport {
    /// Value of `cell` on the sheet named `sheet`.
    #[must_use]
    pub fn value(&self, sheet: &str, cell: CellCoord) -> CellValue {
        self.sheets
            .iter()
            .find(|s| s.name == sheet)
            .and_then(|s| s.cells.iter().find(|c| c.cell == cell))
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Why a step failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
enum StepError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("no macro named '{0}'")]
    UnknownMacro(String),
    #[error("the selection produced no macro steps")]
    EmptyRecording,
}

fn sheet_id(book: &MemoryWorkbook, name: &str) -> DocResult<SheetId> {
    book.sheet_by_name(name)
        .map(|info| info.id)
        .ok_or_else(|| DocumentError::SheetNameNotFound(name.to_string()))
}

/// A session and the workbook it edits.
#[derive(Debug)]
pub struct ScriptRunner {
    session: EditSession,
    book: MemoryWorkbook,
    playbacks: Vec<PlaybackRow>,
    failures: Vec<StepFailure>,
}

impl ScriptRunner {
    #[must_use]
    pub fn new(owner: &str, config: SessionConfig) -> Self {
        Self::with_workbook(owner, config, MemoryWorkbook::new())
    }

    #[must_use]
    pub fn with_workbook(owner: &str, config: SessionConfig, book: MemoryWorkbook) -> Self {
        Self {
            session: EditSession::new(owner, config),
            book,
            playbacks: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    #[must_use]
    pub fn workbook(&self) -> &MemoryWorkbook {
        &self.book
    }

    /// Run every step of `script` in order.
    pub fn run_all(&mut self, steps: &[ScriptStep]) {
        for (index, step) in steps.iter().enumerate() {
            if let Err(error) = self.run_step(step) {
                tracing::warn!(
                    target: "gridlog.harness",
                    step = index,
                    error = %error,
                    "script step failed"
                );
                self.failures.push(StepFailure {
                    step: index,
                    error: error.to_string(),
                });
            }
        }
    }

    fn run_step(&mut self, step: &ScriptStep) -> Result<(), StepError> {
        let book = &mut self.book;
        match step {
            ScriptStep::Edit { edit } => {
                self.session.apply_edit(book, edit)?;
            }
            ScriptStep::Cursor { cell, selection } => {
                let selection = selection.unwrap_or_else(|| CellRange::from(*cell));
                book.set_cursor(&CursorState {
                    selections: vec![selection],
                    active_cell: *cell,
                })?;
                self.session.note_cursor(book)?;
            }
            ScriptStep::AddView { name } => {
                let sheet = book.active_sheet_id();
                book.add_view(sheet, name).ok_or_else(|| {
                    DocumentError::Rejected(format!("view name '{name}' is taken"))
                })?;
            }
            ScriptStep::View { name } => {
                let sheet = book.active_sheet();
                let view = book
                    .find_view_by_name(sheet, name)
                    .ok_or_else(|| DocumentError::ViewNotFound {
                        sheet,
                        name: name.clone(),
                    })?;
                ensure_view_active(book, &view)?;
            }
            ScriptStep::CreateSheet { after } => {
                let after = match after {
                    Some(name) => Some(sheet_id(book, name)?),
                    None => None,
                };
                self.session
                    .apply_sheet_op(book, &SheetOp::Create { after })?;
            }
            ScriptStep::DeleteSheet { name } => {
                let sheet = sheet_id(book, name)?;
                self.session
                    .apply_sheet_op(book, &SheetOp::Delete { sheet })?;
            }
            ScriptStep::DuplicateSheet { name } => {
                let sheet = sheet_id(book, name)?;
                self.session
                    .apply_sheet_op(book, &SheetOp::Duplicate { sheet })?;
            }
            ScriptStep::RenameSheet { name, to } => {
                let sheet = sheet_id(book, name)?;
                let op = SheetOp::Rename {
                    sheet,
                    name: to.clone(),
                };
                self.session.apply_sheet_op(book, &op)?;
            }
            ScriptStep::MoveSheet { from, to } => {
                let op = SheetOp::Reorder {
                    from: *from,
                    to: *to,
                };
                self.session.apply_sheet_op(book, &op)?;
            }
            ScriptStep::ActivateSheet { name } => {
                let sheet = sheet_id(book, name)?;
                self.session
                    .apply_sheet_op(book, &SheetOp::Activate { sheet })?;
            }
            ScriptStep::Undo => {
                self.session.undo(book)?;
            }
            ScriptStep::Redo => {
                self.session.redo(book)?;
            }
            ScriptStep::UndoTo { action } => {
                self.session.undo_to(*action, book)?;
            }
            ScriptStep::RedoTo { action } => {
                self.session.redo_to(*action, book)?;
            }
            ScriptStep::Select { action } => {
                self.session.toggle_selected(*action);
            }
            ScriptStep::SelectRecent { count } => {
                let recent: Vec<ActionId> = self
                    .session
                    .log()
                    .undo_entries()
                    .filter(|a| !a.is_hidden())
                    .map(Action::id)
                    .collect();
                let skip = recent.len().saturating_sub(*count);
                for id in recent.into_iter().skip(skip) {
                    self.session.toggle_selected(id);
                }
            }
            ScriptStep::Record { name, mode } => {
                self.session
                    .record_macro(name, *mode)
                    .ok_or(StepError::EmptyRecording)?;
            }
            ScriptStep::Play { name } => {
                let id = self
                    .session
                    .macros()
                    .get_by_name(name)
                    .map(MacroItem::id)
                    .ok_or_else(|| StepError::UnknownMacro(name.clone()))?;
                let report = self
                    .session
                    .play_macro(id, book)
                    .map_err(|_| StepError::UnknownMacro(name.clone()))?;
                self.playbacks.push(PlaybackRow {
                    name: name.clone(),
                    applied: report.applied,
                    skipped: report.skipped,
                    error: report.first_error.map(|e| e.to_string()),
                });
            }
        }
        Ok(())
    }

    /// Snapshot the run so far.
    #[must_use]
    pub fn report(&self) -> ScriptReport {
        let active = self.book.active_sheet_id();
        let sheets = self
            .book
            .sheets()
            .into_iter()
            .map(|info| {
                let merges = self
                    .book
                    .snapshot_sheet(info.id)
                    .map(|s| s.merges)
                    .unwrap_or_default();
                SheetDump {
                    active: info.id == active,
                    merges,
                    cells: self
                        .book
                        .values(info.id)
                        .into_iter()
                        .map(|(cell, value)| CellDump { cell, value })
                        .collect(),
                    name: info.name,
                }
            })
            .collect();
        ScriptReport {
            sheets,
            history: self
                .session
                .log()
                .entries()
                .into_iter()
                .map(HistoryRow::from)
                .collect(),
            macros: self
                .session
                .macros()
                .list()
                .iter()
                .map(|m| MacroRow {
                    name: m.name().to_string(),
                    mode: m.reference_mode(),
                    steps: m.len(),
                })
                .collect(),
            playbacks: self.playbacks.clone(),
            failures: self.failures.clone(),
        }
    }
}

/// Run `script` against a fresh workbook.
#[must_use]
pub fn run_script(script: &Script) -> ScriptReport {
    let mut runner = ScriptRunner::new(&script.owner, script.config.clone());
    runner.run_all(&script.steps);
    runner.report()
}
