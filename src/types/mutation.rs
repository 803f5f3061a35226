use serde::{Deserialize, Serialize};

use super::{CellRange, CellStyle, CellValue};

static EMPTY: CellValue = CellValue::Empty;

/// One write instruction emitted by the layout engine.
///
/// Covers a rectangle of `rows` x `cols` cells anchored at `(row, col)`.
/// Every covered cell receives `value` and `style`, except that a merged
/// mutation keeps the value only in its anchor cell.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CellMutation {
    pub row: u32,
    pub col: u32,
    pub rows: u32,
    pub cols: u32,
    pub value: CellValue,
    pub style: CellStyle,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub merge: bool,
}

impl CellMutation {
    /// Single cell write.
    pub fn cell(row: u32, col: u32, value: CellValue, style: CellStyle) -> Self {
        Self::range(row, col, 1, 1, value, style)
    }

    /// Write the same value and style across a rectangle.
    pub fn range(
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
        value: CellValue,
        style: CellStyle,
    ) -> Self {
        Self {
            row,
            col,
            rows,
            cols,
            value,
            style,
            merge: false,
        }
    }

    /// Blank styled rectangle.
    pub fn blank(row: u32, col: u32, rows: u32, cols: u32, style: CellStyle) -> Self {
        Self::range(row, col, rows, cols, CellValue::Empty, style)
    }

    #[must_use]
    pub fn merged(mut self) -> Self {
        self.merge = true;
        self
    }

    pub const fn end_row(&self) -> u32 {
        self.row + self.rows.saturating_sub(1)
    }

    pub const fn end_col(&self) -> u32 {
        self.col + self.cols.saturating_sub(1)
    }

    pub const fn covered(&self) -> CellRange {
        CellRange::new(self.row, self.col, self.end_row(), self.end_col())
    }

    /// Value that ends up in `(row, col)` once this mutation is applied, if covered.
    pub fn value_at(&self, row: u32, col: u32) -> Option<&CellValue> {
        if !self.covered().contains(row, col) {
            return None;
        }
        if self.merge && (row, col) != (self.row, self.col) {
            return Some(&EMPTY);
        }
        Some(&self.value)
    }
}
