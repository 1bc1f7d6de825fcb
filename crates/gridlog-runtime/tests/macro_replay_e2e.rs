#![forbid(unsafe_code)]

//! End-to-end record and replay through an [`EditSession`] against the
//! in-memory workbook.

use gridlog_core::{
    CellCoord, CellRange, CellStyle, CellValue, CursorState, DocumentApi, DocumentError,
};
use gridlog_harness::{ActivationMode, MemoryWorkbook};
use gridlog_runtime::{
    ActionLog, EditOp, EditSession, IdAllocator, MacroErrorCode, MacroId, MacroPlayer,
    ReferenceMode, SessionConfig, SheetOp,
};

// ============================================================================
// Helpers
// ============================================================================

fn at(a1: &str) -> CellCoord {
    CellCoord::parse_a1(a1).unwrap()
}

fn set(a1: &str, value: impl Into<CellValue>) -> EditOp {
    EditOp::SetValue {
        cell: at(a1),
        value: value.into(),
    }
}

fn select_all(session: &mut EditSession) {
    let ids: Vec<_> = session
        .log()
        .undo_entries()
        .filter(|a| !a.is_hidden())
        .map(|a| a.id())
        .collect();
    for id in ids {
        session.toggle_selected(id);
    }
}

fn move_cursor(book: &mut MemoryWorkbook, a1: &str) {
    book.set_cursor(&CursorState::at(at(a1))).unwrap();
}

/// Record every visible action so far as `name`.
fn record_all(session: &mut EditSession, name: &str, mode: ReferenceMode) -> MacroId {
    select_all(session);
    session.record_macro(name, Some(mode)).unwrap()
}

// ============================================================================
// Basic history
// ============================================================================

#[test]
fn add_add_undo_undo_redo() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());

    session.apply_edit(&mut book, &set("A1", "a")).unwrap();
    session.apply_edit(&mut book, &set("A2", "b")).unwrap();
    assert_eq!(session.log().undo_descriptions(5).len(), 2);

    session.undo(&mut book).unwrap();
    session.undo(&mut book).unwrap();
    assert_eq!(book.value(at("A1")), CellValue::Empty);
    assert_eq!(book.value(at("A2")), CellValue::Empty);
    assert!(!session.log().can_undo());

    session.redo(&mut book).unwrap();
    assert_eq!(book.value(at("A1")), CellValue::text("a"));
    assert_eq!(book.value(at("A2")), CellValue::Empty);
    assert!(session.log().can_redo());

    // A new edit drops the redo branch.
    session.apply_edit(&mut book, &set("C1", 1)).unwrap();
    assert!(!session.log().can_redo());
}

// ============================================================================
// Relative replay
// ============================================================================

#[test]
fn relative_replay_follows_the_cursor() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());
    session.apply_edit(&mut book, &set("A1", 1)).unwrap();
    session.apply_edit(&mut book, &set("B1", 2)).unwrap();
    let fill = record_all(&mut session, "Fill", ReferenceMode::Relative);
    assert!(session.log().get_selected_actions().is_empty());

    move_cursor(&mut book, "C3");
    let refreshes = book.refresh_count();
    let report = session.play_macro(fill, &mut book).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.applied, 2);
    assert_eq!(book.value(at("C3")), CellValue::from(1));
    assert_eq!(book.value(at("D3")), CellValue::from(2));
    assert_eq!(book.refresh_count(), refreshes + 1);

    // The whole replay is one history entry.
    assert_eq!(session.log().next_undo_description().as_deref(), Some("Fill"));
    let action = report.action.unwrap();
    assert!(session.log().find(action).unwrap().meta().has_tag("macro:Fill"));
    session.undo(&mut book).unwrap();
    assert_eq!(book.value(at("C3")), CellValue::Empty);
    assert_eq!(book.value(at("D3")), CellValue::Empty);
    assert_eq!(book.value(at("B1")), CellValue::from(2));
}

#[test]
fn absolute_replay_ignores_the_cursor() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());
    session.apply_edit(&mut book, &set("B2", 9)).unwrap();
    let id = record_all(&mut session, "Pin", ReferenceMode::Absolute);

    session.undo(&mut book).unwrap();
    move_cursor(&mut book, "F10");
    let report = session.play_macro(id, &mut book).unwrap();
    assert!(report.is_clean());
    assert_eq!(book.value(at("B2")), CellValue::from(9));
    assert_eq!(book.value(at("F10")), CellValue::Empty);
}

#[test]
fn negative_start_skips_the_step_and_keeps_going() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());
    move_cursor(&mut book, "A3");
    let bold = CellStyle {
        bold: Some(true),
        ..CellStyle::default()
    };
    // Selection starts two rows above the active cell.
    let style = EditOp::Style {
        range: CellRange::new(at("A1"), at("A3")),
        style: bold,
    };
    session.apply_edit(&mut book, &style).unwrap();
    session.apply_edit(&mut book, &set("B3", 4)).unwrap();
    let id = record_all(&mut session, "Column", ReferenceMode::Relative);

    move_cursor(&mut book, "A1");
    let report = session.play_macro(id, &mut book).unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped, 1);
    let error = report.first_error.unwrap();
    assert_eq!(error.code, MacroErrorCode::StartingCoordinateTooSmall);
    assert_eq!(error.step, 0);
    assert_eq!(book.value(at("B1")), CellValue::from(4));
}

#[test]
fn skipped_step_drift_carries_into_the_next_step() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());
    session.apply_edit(&mut book, &set("B2", 1)).unwrap();
    session.apply_edit(&mut book, &set("A1", 2)).unwrap();
    session.apply_edit(&mut book, &set("B1", 3)).unwrap();
    let id = record_all(&mut session, "Walk", ReferenceMode::Relative);

    let mut fresh = MemoryWorkbook::new();
    move_cursor(&mut fresh, "A2");
    let report = session.play_macro(id, &mut fresh).unwrap();

    // The middle step would land left of column A; its (-1,-1) move still
    // applies to the step after it.
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 1);
    let error = report.first_error.unwrap();
    assert_eq!(error.code, MacroErrorCode::StartingCoordinateTooSmall);
    assert_eq!(error.step, 1);
    assert_eq!(fresh.value(at("A2")), CellValue::from(1));
    assert_eq!(fresh.value(at("A1")), CellValue::from(3));
    assert_eq!(fresh.value(at("B1")), CellValue::Empty);
}

#[test]
fn recorded_cursor_move_is_replayed() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());
    session.apply_edit(&mut book, &set("A1", 1)).unwrap();
    move_cursor(&mut book, "C5");
    assert!(session.note_cursor(&book).unwrap().is_some());

    let ids: Vec<_> = session.log().undo_entries().map(|a| a.id()).collect();
    for id in ids {
        session.toggle_selected(id);
    }
    let id = session.record_macro("Hop", Some(ReferenceMode::Relative)).unwrap();
    assert_eq!(session.macros().get_by_id(id).unwrap().len(), 2);

    move_cursor(&mut book, "E1");
    let report = session.play_macro(id, &mut book).unwrap();
    assert!(report.is_clean(), "{:?}", report.first_error);
    assert_eq!(report.applied, 2);
    assert_eq!(book.value(at("E1")), CellValue::from(1));
    assert_eq!(book.active_cell(), at("G5"));

    session.undo(&mut book).unwrap();
    assert_eq!(book.value(at("E1")), CellValue::Empty);
    assert_eq!(book.active_cell(), at("E1"));
}

#[test]
fn replayed_composite_undoes_and_redoes_with_one_refresh_each() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());
    session.apply_edit(&mut book, &set("A1", 1)).unwrap();
    session.apply_edit(&mut book, &set("B1", 2)).unwrap();
    session.apply_edit(&mut book, &set("C1", 3)).unwrap();
    let id = record_all(&mut session, "Row", ReferenceMode::Relative);

    move_cursor(&mut book, "A5");
    let before = book.state();
    let report = session.play_macro(id, &mut book).unwrap();
    assert_eq!(report.applied, 3);
    let after = book.state();

    let refreshes = book.refresh_count();
    session.undo(&mut book).unwrap();
    assert_eq!(book.refresh_count(), refreshes + 1);
    assert_eq!(book.state(), before);

    session.redo(&mut book).unwrap();
    assert_eq!(book.refresh_count(), refreshes + 2);
    assert_eq!(book.state(), after);
    assert_eq!(book.value(at("C5")), CellValue::from(3));
}

// ============================================================================
// Structural steps
// ============================================================================

#[test]
fn created_sheet_is_addressed_by_creation_order() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());

    session
        .apply_sheet_op(&mut book, &SheetOp::Create { after: None })
        .unwrap();
    let sheet = book.sheet_by_name("Sheet2").unwrap().id;
    session
        .apply_sheet_op(
            &mut book,
            &SheetOp::Rename {
                sheet,
                name: "Data".into(),
            },
        )
        .unwrap();
    session
        .apply_sheet_op(&mut book, &SheetOp::Activate { sheet })
        .unwrap();
    session.apply_edit(&mut book, &set("B2", 7)).unwrap();
    let id = record_all(&mut session, "Make data", ReferenceMode::Relative);
    let item = session.macros().get_by_id(id).unwrap().clone();
    assert_eq!(item.len(), 4);

    // Replay into a different workbook with its own history.
    let mut other = MemoryWorkbook::new();
    let mut log = ActionLog::default();
    let mut ids = IdAllocator::new();
    let report = MacroPlayer::default().play_with_report(&item, &mut other, &mut log, &mut ids, "e2e");

    assert!(report.is_clean(), "{:?}", report.first_error);
    assert_eq!(other.sheet_names(), ["Sheet1", "Data"]);
    let data = other.sheet_by_name("Data").unwrap().id;
    assert_eq!(other.value_in(data, at("B2")), CellValue::from(7));
    assert_eq!(log.undo_depth(), 1);

    log.undo(&mut other, true).unwrap();
    assert_eq!(other.sheet_names(), ["Sheet1"]);
}

#[test]
fn missing_named_sheet_is_an_invalid_target() {
    let mut book = MemoryWorkbook::with_sheets(&["Sheet1", "Notes"]);
    let mut session = EditSession::new("e2e", SessionConfig::default());
    let notes = book.sheet_by_name("Notes").unwrap().id;
    session
        .apply_sheet_op(&mut book, &SheetOp::Activate { sheet: notes })
        .unwrap();
    let id = record_all(&mut session, "Go", ReferenceMode::Relative);

    session
        .apply_sheet_op(
            &mut book,
            &SheetOp::Rename {
                sheet: notes,
                name: "Gone".into(),
            },
        )
        .unwrap();
    let report = session.play_macro(id, &mut book).unwrap();
    assert_eq!(report.applied, 0);
    assert_eq!(report.first_error.unwrap().code, MacroErrorCode::InvalidTarget);
    assert_eq!(report.action, None);
}

// ============================================================================
// Activation readiness
// ============================================================================

fn record_switch_and_fill(book: &mut MemoryWorkbook, session: &mut EditSession) -> MacroId {
    let second = book.sheet_by_name("Sheet2").unwrap().id;
    session
        .apply_sheet_op(book, &SheetOp::Activate { sheet: second })
        .unwrap();
    session.apply_edit(book, &set("A1", 5)).unwrap();
    record_all(session, "Switch", ReferenceMode::Absolute)
}

#[test]
fn deferred_activation_is_awaited() {
    let mut book = MemoryWorkbook::with_sheets(&["Sheet1", "Sheet2"]);
    let mut session = EditSession::new("e2e", SessionConfig::default());
    let id = record_switch_and_fill(&mut book, &mut session);

    let mut fresh = MemoryWorkbook::with_sheets(&["Sheet1", "Sheet2"]);
    fresh.set_activation_mode(ActivationMode::Deferred);
    let report = session.play_macro(id, &mut fresh).unwrap();

    assert!(report.is_clean(), "{:?}", report.first_error);
    let second = fresh.sheet_by_name("Sheet2").unwrap().id;
    assert_eq!(fresh.value_in(second, at("A1")), CellValue::from(5));
}

#[test]
fn abandoned_activation_reports_the_step() {
    let mut book = MemoryWorkbook::with_sheets(&["Sheet1", "Sheet2"]);
    let mut session = EditSession::new("e2e", SessionConfig::default());
    let id = record_switch_and_fill(&mut book, &mut session);

    let mut fresh = MemoryWorkbook::with_sheets(&["Sheet1", "Sheet2"]);
    fresh.set_activation_mode(ActivationMode::Abandoned);
    let report = session.play_macro(id, &mut fresh).unwrap();

    let error = report.first_error.unwrap();
    assert_eq!(error.code, MacroErrorCode::SheetActivateFailed);
    assert_eq!(error.step, 0);
    assert!(report.skipped >= 1);
}

#[test]
fn failed_undo_leaves_the_log_unchanged() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("e2e", SessionConfig::default());
    session.apply_edit(&mut book, &set("A1", 1)).unwrap();

    book.fail_next_restore(DocumentError::Rejected("locked".into()));
    let err = session.undo(&mut book).unwrap_err();
    assert_eq!(err, DocumentError::Rejected("locked".into()));
    assert_eq!(session.log().undo_depth(), 1);
    assert_eq!(session.log().redo_depth(), 0);
    assert_eq!(book.value(at("A1")), CellValue::from(1));

    session.undo(&mut book).unwrap();
    assert_eq!(book.value(at("A1")), CellValue::Empty);
}
