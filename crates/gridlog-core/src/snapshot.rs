#![forbid(unsafe_code)]

//! Point-in-time captures of document state.
//!
//! Snapshots are complete, not deltas: restoring a [`RangeSnapshot`] puts
//! every cell of its range back to the captured value, style, and borders,
//! and replaces the merges that intersect the range with the captured ones.
//! Cells of the range that are absent from `cells` are restored as blank.

use crate::cell::{CellBorders, CellStyle, CellValue};
use crate::geometry::{CellCoord, CellRange};
use crate::sheet::{SheetInfo, ViewRef};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full state of one non-blank cell.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellSnapshot {
    pub coord: CellCoord,
    pub value: CellValue,
    pub style: CellStyle,
    pub borders: CellBorders,
}

impl CellSnapshot {
    /// True when the cell carries nothing worth storing.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style.is_empty() && self.borders.is_empty()
    }
}

/// Content, formatting, and merge state of a rectangular region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangeSnapshot {
    pub range: CellRange,
    /// Non-blank cells in row-major order.
    pub cells: Vec<CellSnapshot>,
    /// Merged regions intersecting `range`.
    pub merges: Vec<CellRange>,
}

impl RangeSnapshot {
    /// A snapshot of an entirely blank, unmerged region.
    #[must_use]
    pub fn blank(range: CellRange) -> Self {
        Self {
            range,
            cells: Vec::new(),
            merges: Vec::new(),
        }
    }

    /// The captured state of `coord`, if it was non-blank.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&CellSnapshot> {
        self.cells.iter().find(|c| c.coord == coord)
    }

    /// The captured value of `coord` (`Empty` when blank or out of range).
    #[must_use]
    pub fn value(&self, coord: CellCoord) -> CellValue {
        self.cell(coord).map(|c| c.value.clone()).unwrap_or_default()
    }

    /// Region a restore must cover: the range itself plus every captured
    /// merge that sticks out of it.
    #[must_use]
    pub fn footprint(&self) -> CellRange {
        self.merges
            .iter()
            .fold(self.range, |acc, merge| acc.union(merge))
    }
}

/// Full state of a sheet, sufficient to re-create it with its original id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetSnapshot {
    pub info: SheetInfo,
    /// Every view of the sheet, primary view included.
    pub views: Vec<ViewRef>,
    pub cells: Vec<CellSnapshot>,
    pub merges: Vec<CellRange>,
}

/// Cursor context of a view: the selections and the active cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CursorState {
    pub selections: Vec<CellRange>,
    pub active_cell: CellCoord,
}

impl CursorState {
    /// A cursor with a single one-cell selection at `cell`.
    #[must_use]
    pub fn at(cell: CellCoord) -> Self {
        Self {
            selections: vec![CellRange::single(cell)],
            active_cell: cell,
        }
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::at(CellCoord::ORIGIN)
    }
}
