#![forbid(unsafe_code)]

//! Coordinate translation for macro replay.
//!
//! Recorded steps store where they happened as offsets. In
//! [`ReferenceMode::Relative`] an offset is measured from the active cell
//! left behind by the previous step in the same view; in
//! [`ReferenceMode::Absolute`] it is the literal coordinate.
//!
//! ```text
//! recorded at A1, then B1            replayed with cursor at C3
//!   step 1: active (0,0)   ──────►     C3 + (0,0) = C3
//!   step 2: active (0,1)   ──────►     C3 + (0,1) = D3
//! ```
//!
//! # Corrections
//!
//! When a step cannot be placed (its start would fall before `A1`) the
//! cursor does not move, so the following step would land one offset short.
//! The player pushes the failed step's active-cell offset onto the
//! [`CorrectionQueues`] entry of that sheet and view; resolution adds the
//! queued offsets, and a successful resolution empties the queue.

use std::collections::HashMap;

use gridlog_core::{CellCoord, CellRange, SheetId, ViewId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::MacroErrorCode;

/// How recorded coordinates are interpreted on replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReferenceMode {
    /// Offsets are literal coordinates.
    Absolute,
    /// Offsets are relative to the previous step's active cell.
    #[default]
    Relative,
}

impl std::str::FromStr for ReferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            other => Err(format!("unknown reference mode '{other}'")),
        }
    }
}

/// Position and size of a step's primary selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionOffset {
    pub offset_row: i64,
    pub offset_column: i64,
    pub num_rows: u32,
    pub num_columns: u32,
}

impl SelectionOffset {
    /// Offset of `range` measured from `base`.
    #[must_use]
    pub fn between(range: CellRange, base: CellCoord) -> Self {
        let (offset_row, offset_column) = range.start.delta_from(base);
        Self {
            offset_row,
            offset_column,
            num_rows: range.num_rows(),
            num_columns: range.num_cols(),
        }
    }
}

/// Position of a step's active cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActiveCellOffset {
    pub offset_row: i64,
    pub offset_column: i64,
}

impl ActiveCellOffset {
    #[must_use]
    pub fn between(cell: CellCoord, base: CellCoord) -> Self {
        let (offset_row, offset_column) = cell.delta_from(base);
        Self {
            offset_row,
            offset_column,
        }
    }
}

fn correction_sum(corrections: &[ActiveCellOffset]) -> (i64, i64) {
    corrections.iter().fold((0, 0), |(r, c), o| {
        (r.saturating_add(o.offset_row), c.saturating_add(o.offset_column))
    })
}

fn place(
    offset_row: i64,
    offset_column: i64,
    mode: ReferenceMode,
    current: CellCoord,
    corrections: &[ActiveCellOffset],
) -> Result<CellCoord, MacroErrorCode> {
    let (row, col) = match mode {
        ReferenceMode::Absolute => (offset_row, offset_column),
        ReferenceMode::Relative => {
            let (cr, cc) = correction_sum(corrections);
            (
                i64::from(current.row)
                    .saturating_add(offset_row)
                    .saturating_add(cr),
                i64::from(current.col)
                    .saturating_add(offset_column)
                    .saturating_add(cc),
            )
        }
    };
    CellCoord::from_signed(row, col).ok_or(MacroErrorCode::StartingCoordinateTooSmall)
}

/// Resolve a recorded active cell against the replay cursor.
pub fn resolve_active_cell(
    offset: &ActiveCellOffset,
    mode: ReferenceMode,
    current: CellCoord,
    corrections: &[ActiveCellOffset],
) -> Result<CellCoord, MacroErrorCode> {
    place(
        offset.offset_row,
        offset.offset_column,
        mode,
        current,
        corrections,
    )
}

/// Resolve a recorded selection against the replay cursor.
pub fn resolve_selection(
    offset: &SelectionOffset,
    mode: ReferenceMode,
    current: CellCoord,
    corrections: &[ActiveCellOffset],
) -> Result<CellRange, MacroErrorCode> {
    let start = place(
        offset.offset_row,
        offset.offset_column,
        mode,
        current,
        corrections,
    )?;
    CellRange::from_origin(start, offset.num_rows.max(1), offset.num_columns.max(1))
        .ok_or(MacroErrorCode::StartingCoordinateTooSmall)
}

/// Pending corrections per sheet and view, for one replay.
#[derive(Debug, Clone, Default)]
pub struct CorrectionQueues {
    queues: HashMap<(SheetId, ViewId), Vec<ActiveCellOffset>>,
}

impl CorrectionQueues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued offsets for a view (empty if none).
    #[must_use]
    pub fn get(&self, sheet: SheetId, view: ViewId) -> &[ActiveCellOffset] {
        self.queues
            .get(&(sheet, view))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn push(&mut self, sheet: SheetId, view: ViewId, offset: ActiveCellOffset) {
        self.queues.entry((sheet, view)).or_default().push(offset);
    }

    pub fn clear(&mut self, sheet: SheetId, view: ViewId) {
        self.queues.remove(&(sheet, view));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(a1: &str) -> CellCoord {
        CellCoord::parse_a1(a1).unwrap()
    }

    #[test]
    fn test_relative_active_cell() {
        let offset = ActiveCellOffset {
            offset_row: 0,
            offset_column: 1,
        };
        assert_eq!(
            resolve_active_cell(&offset, ReferenceMode::Relative, at("C3"), &[]),
            Ok(at("D3"))
        );
    }

    #[test]
    fn test_absolute_ignores_cursor_and_corrections() {
        let offset = ActiveCellOffset {
            offset_row: 4,
            offset_column: 2,
        };
        let corrections = [ActiveCellOffset {
            offset_row: 10,
            offset_column: 10,
        }];
        assert_eq!(
            resolve_active_cell(&offset, ReferenceMode::Absolute, at("Z99"), &corrections),
            Ok(at("C5"))
        );
    }

    #[test]
    fn test_negative_resolution_fails() {
        let offset = ActiveCellOffset {
            offset_row: -1,
            offset_column: 0,
        };
        assert_eq!(
            resolve_active_cell(&offset, ReferenceMode::Relative, at("A1"), &[]),
            Err(MacroErrorCode::StartingCoordinateTooSmall)
        );
        assert_eq!(
            resolve_active_cell(&offset, ReferenceMode::Relative, at("A2"), &[]),
            Ok(at("A1"))
        );
    }

    #[test]
    fn test_corrections_are_summed() {
        let offset = ActiveCellOffset {
            offset_row: 0,
            offset_column: 1,
        };
        let corrections = [
            ActiveCellOffset {
                offset_row: 1,
                offset_column: 0,
            },
            ActiveCellOffset {
                offset_row: 1,
                offset_column: -1,
            },
        ];
        assert_eq!(
            resolve_active_cell(&offset, ReferenceMode::Relative, at("B2"), &corrections),
            Ok(at("B4"))
        );
    }

    #[test]
    fn test_selection_keeps_size() {
        let offset = SelectionOffset {
            offset_row: -1,
            offset_column: 0,
            num_rows: 2,
            num_columns: 3,
        };
        let range = resolve_selection(&offset, ReferenceMode::Relative, at("B5"), &[]).unwrap();
        assert_eq!(range.to_string(), "B4:D5");
        assert_eq!(
            resolve_selection(&offset, ReferenceMode::Relative, at("B1"), &[]),
            Err(MacroErrorCode::StartingCoordinateTooSmall)
        );
    }

    #[test]
    fn test_selection_past_grid_edge_fails() {
        let offset = SelectionOffset {
            offset_row: 0,
            offset_column: 0,
            num_rows: 2,
            num_columns: 1,
        };
        let edge = CellCoord::new(u32::MAX, 0);
        assert_eq!(
            resolve_selection(&offset, ReferenceMode::Relative, edge, &[]),
            Err(MacroErrorCode::StartingCoordinateTooSmall)
        );
    }

    #[test]
    fn test_offsets_between() {
        let sel = SelectionOffset::between(CellRange::parse_a1("B2:C4").unwrap(), at("C3"));
        assert_eq!((sel.offset_row, sel.offset_column), (-1, -1));
        assert_eq!((sel.num_rows, sel.num_columns), (3, 2));
        let act = ActiveCellOffset::between(at("A1"), at("B2"));
        assert_eq!((act.offset_row, act.offset_column), (-1, -1));
    }

    #[test]
    fn test_correction_queue_lifecycle() {
        let mut queues = CorrectionQueues::new();
        let (s, v) = (SheetId(1), ViewId(1));
        assert!(queues.get(s, v).is_empty());
        queues.push(s, v, ActiveCellOffset::default());
        queues.push(s, v, ActiveCellOffset::default());
        assert_eq!(queues.get(s, v).len(), 2);
        assert!(queues.get(s, ViewId(2)).is_empty());
        queues.clear(s, v);
        assert!(queues.is_empty());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("ABSOLUTE".parse::<ReferenceMode>(), Ok(ReferenceMode::Absolute));
        assert!("sideways".parse::<ReferenceMode>().is_err());
    }
}
