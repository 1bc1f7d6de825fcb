#![forbid(unsafe_code)]

//! Canned scripts.

use gridlog_core::CellCoord;
use gridlog_runtime::{EditOp, ReferenceMode, SessionConfig};

use crate::script::{Script, ScriptStep};

fn cell(row: u32, col: u32) -> CellCoord {
    CellCoord::new(row, col)
}

fn set(row: u32, col: u32, value: f64) -> ScriptStep {
    ScriptStep::Edit {
        edit: EditOp::SetValue {
            cell: cell(row, col),
            value: value.into(),
        },
    }
}

/// Record a two-cell fill, replay it elsewhere, then touch the sheet list.
///
/// Expected end state on `Sheet1`: A1=10, B1=20, C3=10, D3=20. A second
/// sheet named `Totals` exists and the history holds the replay as one
/// `Fill row` entry.
#[must_use]
pub fn demo_script() -> Script {
    Script {
        owner: "demo".to_string(),
        config: SessionConfig::default(),
        steps: vec![
            set(0, 0, 10.0),
            set(0, 1, 20.0),
            ScriptStep::SelectRecent { count: 2 },
            ScriptStep::Record {
                name: "Fill row".to_string(),
                mode: Some(ReferenceMode::Relative),
            },
            ScriptStep::Cursor {
                cell: cell(2, 2),
                selection: None,
            },
            ScriptStep::Play {
                name: "Fill row".to_string(),
            },
            ScriptStep::Undo,
            ScriptStep::Redo,
            ScriptStep::CreateSheet { after: None },
            ScriptStep::RenameSheet {
                name: "Sheet2".to_string(),
                to: "Totals".to_string(),
            },
        ],
    }
}

/// Replays a relative macro from a starting cell too close to the edge.
///
/// The macro writes one row above its first cell; replaying at row 1
/// reports a too-small starting coordinate for that step.
#[must_use]
pub fn edge_script() -> Script {
    Script {
        owner: "edge".to_string(),
        config: SessionConfig::default(),
        steps: vec![
            set(3, 3, 1.0),
            set(2, 3, 2.0),
            ScriptStep::SelectRecent { count: 2 },
            ScriptStep::Record {
                name: "Up".to_string(),
                mode: None,
            },
            ScriptStep::Cursor {
                cell: cell(0, 0),
                selection: None,
            },
            ScriptStep::Play {
                name: "Up".to_string(),
            },
        ],
    }
}
