//! Benchmarks for the history log and macro replay.
//!
//! Run with: cargo bench -p gridlog-runtime --bench history_bench
//!
//! | Scenario                  | What it measures                              |
//! |---------------------------|-----------------------------------------------|
//! | `history/add_undo_redo`   | N edits, then undo all and redo all           |
//! | `history/undo_to`         | One jump through N entries with hidden noise  |
//! | `macros/replay`           | Replaying an N-step relative macro            |

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use gridlog_core::{CellCoord, CellValue, CursorState, DocumentApi};
use gridlog_harness::MemoryWorkbook;
use gridlog_runtime::{ActionId, EditOp, EditSession, ReferenceMode, SessionConfig};

// ============================================================================
// Setup helpers
// ============================================================================

fn set(row: u32, col: u32, value: f64) -> EditOp {
    EditOp::SetValue {
        cell: CellCoord::new(row, col),
        value: CellValue::from(value),
    }
}

/// A session with `n` value edits down column A, each followed by a hidden
/// cursor move.
fn setup_session(n: u32) -> (MemoryWorkbook, EditSession, ActionId) {
    let mut book = MemoryWorkbook::new();
    let mut session = EditSession::new("bench", SessionConfig::default());
    let mut first = None;
    for i in 0..n {
        let id = session
            .apply_edit(&mut book, &set(i, 0, f64::from(i)))
            .unwrap();
        first.get_or_insert(id);
        book.set_cursor(&CursorState::at(CellCoord::new(i, 3)))
            .unwrap();
        session.note_cursor(&book).unwrap();
    }
    (book, session, first.unwrap())
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_add_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("history/add_undo_redo");
    for n in [10u32, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let (mut book, mut session, _) = setup_session(n);
                while session.undo(&mut book).unwrap().is_some() {}
                while session.redo(&mut book).unwrap().is_some() {}
                black_box(session.log().undo_depth())
            });
        });
    }
    group.finish();
}

fn bench_undo_to(c: &mut Criterion) {
    let mut group = c.benchmark_group("history/undo_to");
    for n in [10u32, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || setup_session(n),
                |(mut book, mut session, first)| {
                    black_box(session.undo_to(first, &mut book).unwrap())
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("macros/replay");
    for n in [10u32, 100] {
        let mut book = MemoryWorkbook::new();
        let mut session = EditSession::new("bench", SessionConfig::default());
        for i in 0..n {
            let id = session
                .apply_edit(&mut book, &set(i, i % 4, f64::from(i)))
                .unwrap();
            session.toggle_selected(id);
        }
        let macro_id = session
            .record_macro("bench", Some(ReferenceMode::Relative))
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut target = MemoryWorkbook::new();
                target
                    .set_cursor(&CursorState::at(CellCoord::new(5, 5)))
                    .unwrap();
                black_box(session.play_macro(macro_id, &mut target).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add_undo_redo, bench_undo_to, bench_replay);
criterion_main!(benches);
