//! Page geometry: where each month block sits and how tall it is.

use crate::types::{
    CalendarConfig, BLOCK_COL_STRIDE, GRID_ROWS, WEEKS_PER_MONTH,
};

/// Title row, day-initial header row and the blank row below the header.
const ROWS_ABOVE_WEEKS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub spacer_rows_after_week: u32,
    pub spacer_rows_after_month_block: u32,
}

impl PageGeometry {
    pub const fn new(config: &CalendarConfig) -> Self {
        Self {
            spacer_rows_after_week: config.spacer_rows_after_week,
            spacer_rows_after_month_block: config.spacer_rows_after_month_block,
        }
    }

    /// Distance between consecutive week rows.
    pub const fn week_stride(&self) -> u32 {
        1 + self.spacer_rows_after_week
    }

    /// Rows occupied by one block. The last week has no trailing spacer.
    pub const fn block_height(&self) -> u32 {
        ROWS_ABOVE_WEEKS + WEEKS_PER_MONTH + (WEEKS_PER_MONTH - 1) * self.spacer_rows_after_week
    }

    pub const fn anchor_row(&self, block_row: u32) -> u32 {
        1 + block_row * (self.block_height() + self.spacer_rows_after_month_block)
    }

    pub const fn anchor_col(block_col: u32) -> u32 {
        1 + block_col * BLOCK_COL_STRIDE
    }

    pub const fn header_row(anchor_row: u32) -> u32 {
        anchor_row + 1
    }

    pub const fn header_spacer_row(anchor_row: u32) -> u32 {
        anchor_row + 2
    }

    pub const fn week_row(&self, anchor_row: u32, week: u32) -> u32 {
        anchor_row + ROWS_ABOVE_WEEKS + week * self.week_stride()
    }

    /// First of the blank rows separating `block_row` from the next block-row.
    pub const fn month_spacer_row(&self, block_row: u32) -> u32 {
        self.anchor_row(block_row) + self.block_height()
    }

    /// Rows from the top of the page to the last week row of the bottom blocks.
    pub const fn page_height(&self) -> u32 {
        GRID_ROWS * self.block_height() + (GRID_ROWS - 1) * self.spacer_rows_after_month_block
    }
}
