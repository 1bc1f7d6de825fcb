#![forbid(unsafe_code)]

//! Cell coordinates and rectangular ranges.
//!
//! Coordinates are zero-based `(row, col)` pairs. Display and parsing use A1
//! notation: column letters followed by a one-based row number, so
//! `CellCoord::new(0, 0)` is `A1` and `CellCoord::new(9, 26)` is `AA10`.
//!
//! # Invariants
//!
//! 1. A [`CellRange`] is always normalized: `start.row <= end.row` and
//!    `start.col <= end.col`.
//! 2. Ranges are inclusive on both ends, so a single cell has one row and
//!    one column.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A zero-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// The top-left cell (`A1`).
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Build a coordinate from signed components.
    ///
    /// Returns `None` when either component is negative or exceeds `u32`.
    #[must_use]
    pub fn from_signed(row: i64, col: i64) -> Option<Self> {
        let row = u32::try_from(row).ok()?;
        let col = u32::try_from(col).ok()?;
        Some(Self { row, col })
    }

    /// Parse an A1-style reference such as `B7` or `aa10`.
    pub fn parse_a1(s: &str) -> Result<Self, ParseCoordError> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| ParseCoordError::new(s))?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ParseCoordError::new(s));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            let v = u64::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
            col = col * 26 + v;
            if col > u64::from(u32::MAX) + 1 {
                return Err(ParseCoordError::new(s));
            }
        }

        let row: u64 = digits.parse().map_err(|_| ParseCoordError::new(s))?;
        if row == 0 || row > u64::from(u32::MAX) + 1 {
            return Err(ParseCoordError::new(s));
        }

        Ok(Self {
            row: (row - 1) as u32,
            col: (col - 1) as u32,
        })
    }

    /// Column label in A1 notation (`A`, `Z`, `AA`, ...).
    #[must_use]
    pub fn column_label(col: u32) -> String {
        let mut n = u64::from(col) + 1;
        let mut out = Vec::new();
        while n > 0 {
            let rem = ((n - 1) % 26) as u8;
            out.push(b'A' + rem);
            n = (n - 1) / 26;
        }
        out.reverse();
        String::from_utf8(out).unwrap_or_default()
    }

    /// Signed difference `self - other` as `(rows, cols)`.
    #[must_use]
    pub fn delta_from(self, other: CellCoord) -> (i64, i64) {
        (
            i64::from(self.row) - i64::from(other.row),
            i64::from(self.col) - i64::from(other.col),
        )
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            Self::column_label(self.col),
            u64::from(self.row) + 1
        )
    }
}

impl FromStr for CellCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s)
    }
}

/// An inclusive rectangular block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    /// Create a range spanning both corners, normalizing their order.
    #[must_use]
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        Self {
            start: CellCoord::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellCoord::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// A one-cell range.
    #[must_use]
    pub const fn single(cell: CellCoord) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// Build a range from its top-left corner and its size.
    ///
    /// Returns `None` for zero sizes or when the far corner overflows `u32`.
    #[must_use]
    pub fn from_origin(start: CellCoord, num_rows: u32, num_cols: u32) -> Option<Self> {
        if num_rows == 0 || num_cols == 0 {
            return None;
        }
        let end = CellCoord::new(
            start.row.checked_add(num_rows - 1)?,
            start.col.checked_add(num_cols - 1)?,
        );
        Some(Self { start, end })
    }

    #[must_use]
    pub const fn num_rows(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    #[must_use]
    pub const fn num_cols(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    #[must_use]
    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.col..=self.end.col).contains(&cell.col)
    }

    #[must_use]
    pub fn intersects(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &CellRange) -> CellRange {
        CellRange {
            start: CellCoord::new(
                self.start.row.min(other.start.row),
                self.start.col.min(other.start.col),
            ),
            end: CellCoord::new(
                self.end.row.max(other.end.row),
                self.end.col.max(other.end.col),
            ),
        }
    }

    /// Iterate every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let (start, end) = (self.start, self.end);
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| CellCoord::new(row, col)))
    }

    /// Parse `A1` or `A1:C4`.
    pub fn parse_a1(s: &str) -> Result<Self, ParseCoordError> {
        match s.split_once(':') {
            Some((a, b)) => Ok(Self::new(CellCoord::parse_a1(a)?, CellCoord::parse_a1(b)?)),
            None => Ok(Self::single(CellCoord::parse_a1(s)?)),
        }
    }
}

impl From<CellCoord> for CellRange {
    fn from(cell: CellCoord) -> Self {
        Self::single(cell)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s)
    }
}

impl From<CellCoord> for String {
    fn from(cell: CellCoord) -> Self {
        cell.to_string()
    }
}

impl TryFrom<String> for CellCoord {
    type Error = ParseCoordError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_a1(&s)
    }
}

impl From<CellRange> for String {
    fn from(range: CellRange) -> Self {
        range.to_string()
    }
}

impl TryFrom<String> for CellRange {
    type Error = ParseCoordError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_a1(&s)
    }
}

/// Failure to parse an A1 reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell reference '{input}'")]
pub struct ParseCoordError {
    input: String,
}

impl ParseCoordError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}
