#![forbid(unsafe_code)]

//! Property tests for cell geometry.
//!
//! Validates:
//! - `CellRange::new` normalizes its corners regardless of order.
//! - `cells()` visits exactly `num_rows * num_cols` cells, all contained.
//! - `intersects` is symmetric and agrees with a cell-by-cell check.
//! - `union` covers both inputs.
//! - A1 text parses back to the same coordinate.

use proptest::prelude::*;

use gridlog_core::{CellCoord, CellRange};

fn coord() -> impl Strategy<Value = CellCoord> {
    (0u32..12, 0u32..12).prop_map(|(row, col)| CellCoord::new(row, col))
}

fn range() -> impl Strategy<Value = CellRange> {
    (coord(), coord()).prop_map(|(a, b)| CellRange::new(a, b))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn corners_are_normalized(a in coord(), b in coord()) {
        let range = CellRange::new(a, b);
        prop_assert_eq!(range, CellRange::new(b, a));
        prop_assert!(range.start.row <= range.end.row);
        prop_assert!(range.start.col <= range.end.col);
        prop_assert!(range.contains(a) && range.contains(b));
    }

    #[test]
    fn cells_cover_the_range_exactly(range in range()) {
        let cells: Vec<CellCoord> = range.cells().collect();
        let expected = range.num_rows() as usize * range.num_cols() as usize;
        prop_assert_eq!(cells.len(), expected);
        prop_assert!(cells.iter().all(|c| range.contains(*c)));
        prop_assert_eq!(cells.first().copied(), Some(range.start));
        prop_assert_eq!(cells.last().copied(), Some(range.end));
    }

    #[test]
    fn intersects_matches_shared_cells(a in range(), b in range()) {
        let shared = a.cells().any(|c| b.contains(c));
        prop_assert_eq!(a.intersects(&b), shared);
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn union_covers_both(a in range(), b in range()) {
        let u = a.union(&b);
        for corner in [a.start, a.end, b.start, b.end] {
            prop_assert!(u.contains(corner));
        }
        prop_assert_eq!(u, b.union(&a));
    }

    #[test]
    fn a1_text_parses_back(row in 0u32..100_000, col in 0u32..20_000) {
        let cell = CellCoord::new(row, col);
        prop_assert_eq!(CellCoord::parse_a1(&cell.to_string()), Ok(cell));
    }
}
