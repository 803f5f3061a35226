//! The month-grid layout engine.
//!
//! Turns a [`CalendarConfig`] into a [`Page`]: the cell writes for six month
//! blocks in a 2x3 grid, plus the role of every row and column it touched.

use std::collections::BTreeMap;

use tracing::debug;

use crate::calendar::{page_surface_name, MonthCalendar, DAY_INITIALS};
use crate::error::Result;
use crate::types::{
    CalendarConfig, CellMutation, CellRange, CellStyle, CellValue, ColRole, Fill, HAlign,
    MonthBlock, Page, RowRole, VAlign, BLOCK_COL_STRIDE, DAYS_PER_WEEK, GRID_COLS, GRID_ROWS,
    PAGE_COLS, WEEKS_PER_MONTH,
};

use super::geometry::PageGeometry;

fn title_style() -> CellStyle {
    CellStyle::blank()
        .bold()
        .fill(Fill::LightBlue)
        .align(Some(HAlign::Center), None)
}

fn header_style() -> CellStyle {
    CellStyle::blank()
        .bold()
        .fill(Fill::Gray)
        .align(Some(HAlign::Center), None)
}

fn day_style() -> CellStyle {
    CellStyle::blank().align(Some(HAlign::Center), Some(VAlign::Middle))
}

/// Lay out the six months starting at `config.start_month`.
///
/// Month indices are not wrapped into the next year: a page that would run
/// past December fails with [`crate::error::WallcalError::InvalidDate`].
pub fn layout_page(config: &CalendarConfig) -> Result<Page> {
    config.validate()?;

    let mut builder = PageBuilder::new(config);
    for block_row in 0..GRID_ROWS {
        for block_col in 0..GRID_COLS {
            let month_index = config.start_month + block_row * GRID_COLS + block_col;
            builder.month_block(block_row, block_col, month_index)?;
        }
        if block_row + 1 < GRID_ROWS {
            builder.month_spacer_rows(block_row);
        }
    }

    let page = builder.finish();
    debug!(
        year = page.year,
        start_month = page.start_month,
        mutations = page.mutations.len(),
        rows = page.last_row(),
        "laid out calendar page"
    );
    Ok(page)
}

struct PageBuilder {
    year: i32,
    start_month: u32,
    geometry: PageGeometry,
    blocks: Vec<MonthBlock>,
    mutations: Vec<CellMutation>,
    row_roles: BTreeMap<u32, RowRole>,
    col_roles: BTreeMap<u32, ColRole>,
}

impl PageBuilder {
    fn new(config: &CalendarConfig) -> Self {
        Self {
            year: config.year,
            start_month: config.start_month,
            geometry: PageGeometry::new(config),
            blocks: Vec::with_capacity(6),
            mutations: Vec::new(),
            row_roles: BTreeMap::new(),
            col_roles: BTreeMap::new(),
        }
    }

    fn push(&mut self, mutation: CellMutation) {
        self.mutations.push(mutation);
    }

    fn blank_row(&mut self, row: u32, col: u32, cols: u32, role: RowRole) {
        self.push(CellMutation::blank(row, col, 1, cols, CellStyle::blank()));
        self.row_roles.insert(row, role);
    }

    fn month_block(&mut self, block_row: u32, block_col: u32, month_index: u32) -> Result<()> {
        let month = MonthCalendar::new(self.year, month_index)?;
        let anchor_row = self.geometry.anchor_row(block_row);
        let anchor_col = PageGeometry::anchor_col(block_col);
        let height = self.geometry.block_height();

        self.push(
            CellMutation::range(
                anchor_row,
                anchor_col,
                1,
                DAYS_PER_WEEK,
                CellValue::Text(month.title()),
                title_style(),
            )
            .merged(),
        );
        self.row_roles.insert(anchor_row, RowRole::Title);

        let header_row = PageGeometry::header_row(anchor_row);
        for (col, initial) in (anchor_col..).zip(DAY_INITIALS) {
            self.push(CellMutation::cell(
                header_row,
                col,
                CellValue::from(initial),
                header_style(),
            ));
        }
        self.row_roles.insert(header_row, RowRole::Header);

        self.blank_row(
            PageGeometry::header_spacer_row(anchor_row),
            anchor_col,
            DAYS_PER_WEEK,
            RowRole::HeaderSpacer,
        );

        let mut day_counter: u32 = 1;
        for week in 0..WEEKS_PER_MONTH {
            let week_row = self.geometry.week_row(anchor_row, week);
            for day in 0..DAYS_PER_WEEK {
                let leading = week == 0 && day < month.starting_weekday;
                let value = if leading || day_counter > month.days_in_month {
                    CellValue::Empty
                } else {
                    day_counter += 1;
                    CellValue::from(day_counter - 1)
                };
                self.push(CellMutation::cell(week_row, anchor_col + day, value, day_style()));
            }
            self.row_roles.insert(week_row, RowRole::Week);

            if week + 1 < WEEKS_PER_MONTH {
                for offset in 1..=self.geometry.spacer_rows_after_week {
                    self.blank_row(
                        week_row + offset,
                        anchor_col,
                        DAYS_PER_WEEK,
                        RowRole::WeekSpacer,
                    );
                }
            }
        }

        if block_col + 1 < GRID_COLS {
            for spacer_col in [anchor_col + DAYS_PER_WEEK, anchor_col + DAYS_PER_WEEK + 1] {
                self.push(CellMutation::blank(
                    anchor_row,
                    spacer_col,
                    height,
                    1,
                    CellStyle::blank(),
                ));
            }
        }

        for col in anchor_col..anchor_col + BLOCK_COL_STRIDE {
            let role = if col < anchor_col + DAYS_PER_WEEK {
                ColRole::Day
            } else {
                ColRole::Spacer
            };
            self.col_roles.insert(col, role);
        }

        self.blocks.push(MonthBlock {
            month_index,
            name: month.name.to_string(),
            block_row,
            block_col,
            anchor_row,
            anchor_col,
            height,
            starting_weekday: month.starting_weekday,
            days_in_month: month.days_in_month,
        });
        Ok(())
    }

    /// Full-width blank rows below `block_row`.
    fn month_spacer_rows(&mut self, block_row: u32) {
        let first = self.geometry.month_spacer_row(block_row);
        for row in first..first + self.geometry.spacer_rows_after_month_block {
            self.blank_row(row, 1, PAGE_COLS, RowRole::MonthSpacer);
        }
    }

    fn finish(self) -> Page {
        let last_row = self.mutations.iter().map(CellMutation::end_row).max().unwrap_or(0);
        let last_col = self.mutations.iter().map(CellMutation::end_col).max().unwrap_or(0);
        Page {
            year: self.year,
            start_month: self.start_month,
            surface_name: page_surface_name(self.year, self.start_month),
            bounds: CellRange::new(1, 1, last_row, last_col),
            blocks: self.blocks,
            mutations: self.mutations,
            row_roles: self.row_roles,
            col_roles: self.col_roles,
        }
    }
}
