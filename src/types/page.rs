use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CellMutation, CellRange};

/// What a sheet row is used for. Drives row sizing in the formatting pass.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RowRole {
    Title,
    Header,
    /// Blank row between the day initials and the first week.
    HeaderSpacer,
    Week,
    WeekSpacer,
    /// Blank row between the two rows of month blocks.
    MonthSpacer,
}

/// What a sheet column is used for.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ColRole {
    Day,
    Spacer,
}

/// One month's region of a page.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthBlock {
    /// 0 = January.
    pub month_index: u32,
    pub name: String,
    pub block_row: u32,
    pub block_col: u32,
    pub anchor_row: u32,
    pub anchor_col: u32,
    /// Rows occupied, title through the last week row.
    pub height: u32,
    /// Weekday of the 1st, 0 = Sunday.
    pub starting_weekday: u32,
    pub days_in_month: u32,
}

impl MonthBlock {
    /// Rectangle covered by the block's title, header and week rows.
    pub const fn occupied(&self) -> CellRange {
        CellRange::new(
            self.anchor_row,
            self.anchor_col,
            self.anchor_row + self.height - 1,
            self.anchor_col + super::DAYS_PER_WEEK - 1,
        )
    }
}

/// A fully laid out page of six months.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub year: i32,
    pub start_month: u32,
    /// Sheet the page is rendered onto.
    pub surface_name: String,
    /// From `A1` to the bottom-right cell any mutation touches.
    pub bounds: CellRange,
    pub blocks: Vec<MonthBlock>,
    pub mutations: Vec<CellMutation>,
    pub row_roles: BTreeMap<u32, RowRole>,
    pub col_roles: BTreeMap<u32, ColRole>,
}

impl Page {
    pub fn block_at(&self, block_row: u32, block_col: u32) -> Option<&MonthBlock> {
        self.blocks
            .iter()
            .find(|b| b.block_row == block_row && b.block_col == block_col)
    }

    pub fn block_for_month(&self, month_index: u32) -> Option<&MonthBlock> {
        self.blocks.iter().find(|b| b.month_index == month_index)
    }

    pub fn row_role(&self, row: u32) -> Option<RowRole> {
        self.row_roles.get(&row).copied()
    }

    pub fn col_role(&self, col: u32) -> Option<ColRole> {
        self.col_roles.get(&col).copied()
    }

    pub const fn last_row(&self) -> u32 {
        self.bounds.end_row
    }

    pub const fn last_col(&self) -> u32 {
        self.bounds.end_col
    }
}
