#![forbid(unsafe_code)]

//! Log level policy compliance.
//!
//! Drives real sessions under a capturing subscriber and checks that:
//! - history mutations log at DEBUG with a `history_event` field
//! - macro record and playback milestones log at INFO with `macro_event`
//! - a skipped replay step logs at WARN with its step index and error code
//! - a rollback that fails too logs at WARN on the history target
//! - nothing logs at ERROR
//!
//! Run:
//!   cargo test -p gridlog-runtime --test log_level_policy_compliance

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;

use gridlog_core::{CellCoord, CellValue, CursorState, DocumentApi, DocumentError};
use gridlog_harness::{ActivationMode, FailPoint, MemoryWorkbook};
use gridlog_runtime::{EditOp, EditSession, ReferenceMode, SessionConfig, SheetOp};

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn set(row: u32, col: u32, value: f64) -> EditOp {
    EditOp::SetValue {
        cell: CellCoord::new(row, col),
        value: CellValue::from(value),
    }
}

/// Record a macro that walks one row up, then replay it on row 1 so the
/// second step is skipped.
fn run_session() {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("policy", SessionConfig::default());

    let first = session.apply_edit(&mut book, &set(4, 0, 1.0)).unwrap();
    let second = session.apply_edit(&mut book, &set(3, 0, 2.0)).unwrap();
    session.undo(&mut book).unwrap();
    session.redo(&mut book).unwrap();

    session.toggle_selected(first);
    session.toggle_selected(second);
    let id = session
        .record_macro("Up", Some(ReferenceMode::Relative))
        .unwrap();

    book.set_cursor(&CursorState::at(CellCoord::ORIGIN)).unwrap();
    let report = session.play_macro(id, &mut book).unwrap();
    assert_eq!(report.skipped, 1);
}

// ============================================================================
// Policy tests
// ============================================================================

#[test]
fn history_mutations_log_at_debug() {
    let events = with_captured_events(run_session);
    let history: Vec<_> = events
        .iter()
        .filter(|e| e.target == "gridlog.history" && e.level == tracing::Level::DEBUG)
        .collect();

    let kinds: Vec<&str> = history
        .iter()
        .filter_map(|e| e.field("history_event"))
        .collect();
    assert_eq!(kinds, ["add", "add", "undo", "redo", "add"]);
    for event in &history {
        assert!(event.field("action").is_some(), "{event:?}");
    }
}

#[test]
fn macro_milestones_log_at_info() {
    let events = with_captured_events(run_session);
    let milestones: Vec<&str> = events
        .iter()
        .filter(|e| e.level == tracing::Level::INFO)
        .map(|e| {
            assert_eq!(e.target, "gridlog.macros");
            assert_eq!(e.field("name"), Some("Up"));
            e.field("macro_event").unwrap()
        })
        .collect();
    assert_eq!(milestones, ["record", "playback_start", "playback_stop"]);

    let stop = events
        .iter()
        .find(|e| e.field("macro_event") == Some("playback_stop"))
        .unwrap();
    assert_eq!(stop.field("applied"), Some("1"));
    assert_eq!(stop.field("skipped"), Some("1"));
    assert_eq!(stop.field("error"), Some("starting-coordinate-too-small"));
}

#[test]
fn skipped_step_logs_at_warn() {
    let events = with_captured_events(run_session);
    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    let warning = warnings[0];
    assert_eq!(warning.field("macro_event"), Some("step_failed"));
    assert_eq!(warning.field("step"), Some("1"));
    assert_eq!(warning.field("code"), Some("starting-coordinate-too-small"));
}

fn rollback_warnings(events: &[CapturedEvent]) -> Vec<&CapturedEvent> {
    events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN && e.target == "gridlog.history")
        .filter(|e| e.field("history_event") == Some("rollback_failed"))
        .collect()
}

#[test]
fn failed_composite_rollback_logs_at_warn() {
    let events = with_captured_events(|| {
        let mut book = MemoryWorkbook::with_sheets(&["Sheet1", "Sheet2"]);
        let mut session = EditSession::new("policy", SessionConfig::default());
        let second = book.sheet_by_name("Sheet2").unwrap().id;
        let ids = [
            session.apply_edit(&mut book, &set(0, 0, 1.0)).unwrap(),
            session
                .apply_sheet_op(&mut book, &SheetOp::Activate { sheet: second })
                .unwrap(),
            session.apply_edit(&mut book, &set(0, 0, 2.0)).unwrap(),
        ];
        for id in ids {
            session.toggle_selected(id);
        }
        let id = session
            .record_macro("Both", Some(ReferenceMode::Absolute))
            .unwrap();

        let mut fresh = MemoryWorkbook::with_sheets(&["Sheet1", "Sheet2"]);
        assert!(session.play_macro(id, &mut fresh).unwrap().is_clean());

        // Switching back to Sheet1 fails, and so does the rollback's switch
        // back to Sheet2.
        fresh.set_activation_mode(ActivationMode::Abandoned);
        assert!(session.undo(&mut fresh).is_err());
    });

    let warnings = rollback_warnings(&events);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].field("composite").is_some());
    assert!(warnings[0].field("error").is_some());
}

#[test]
fn failed_edit_restore_logs_at_warn() {
    let events = with_captured_events(|| {
        let mut book = MemoryWorkbook::new();
        let mut session = EditSession::new("policy", SessionConfig::default());
        book.fail_next(FailPoint::SetValue, DocumentError::Rejected("locked".into()));
        book.fail_next_restore(DocumentError::Rejected("gone".into()));
        assert!(session.apply_edit(&mut book, &set(0, 0, 1.0)).is_err());
    });

    let warnings = rollback_warnings(&events);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("region"), Some("A1"));
}

#[test]
fn nothing_logs_at_error() {
    let events = with_captured_events(run_session);
    assert!(events.iter().all(|e| e.level != tracing::Level::ERROR));
}
