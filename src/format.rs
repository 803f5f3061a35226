//! Post-layout formatting passes.
//!
//! The formatting pass sizes rows and columns by the roles the layout engine
//! recorded on the [`Page`]; it never re-derives them from row arithmetic.
//! The print pass then overwrites that sizing with uniform print values.

use crate::error::Result;
use crate::surface::Surface;
use crate::types::{
    CellRange, ColRole, Page, RowRole, CALENDAR_FONT_SIZE, PAGE_COLS, PRINT_ROWS,
};

/// Row heights and column widths in pixels, by role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatSettings {
    pub font_size: u32,
    pub title_height: f64,
    pub header_height: f64,
    pub header_spacer_height: f64,
    pub week_height: f64,
    pub week_spacer_height: f64,
    pub month_spacer_height: f64,
    /// Rows the layout did not tag.
    pub other_height: f64,
    pub day_col_width: f64,
    pub spacer_col_width: f64,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            font_size: CALENDAR_FONT_SIZE,
            title_height: 26.0,
            header_height: 22.0,
            header_spacer_height: 10.0,
            week_height: 24.0,
            week_spacer_height: 8.0,
            month_spacer_height: 12.0,
            other_height: 15.0,
            day_col_width: 50.0,
            spacer_col_width: 10.0,
        }
    }
}

impl FormatSettings {
    pub fn row_height(&self, role: Option<RowRole>) -> f64 {
        match role {
            Some(RowRole::Title) => self.title_height,
            Some(RowRole::Header) => self.header_height,
            Some(RowRole::HeaderSpacer) => self.header_spacer_height,
            Some(RowRole::Week) => self.week_height,
            Some(RowRole::WeekSpacer) => self.week_spacer_height,
            Some(RowRole::MonthSpacer) => self.month_spacer_height,
            None => self.other_height,
        }
    }

    pub fn col_width(&self, role: Option<ColRole>) -> f64 {
        match role {
            Some(ColRole::Spacer) => self.spacer_col_width,
            Some(ColRole::Day) | None => self.day_col_width,
        }
    }
}

/// Uniform sizing applied over the fixed print bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintSettings {
    pub cols: u32,
    pub rows: u32,
    pub col_width: f64,
    pub row_height: f64,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            cols: PAGE_COLS,
            rows: PRINT_ROWS,
            col_width: 45.0,
            row_height: 18.0,
        }
    }
}

/// Font size over the occupied rectangle, then role-driven row and column sizing.
pub fn format_page<S: Surface + ?Sized>(
    surface: &mut S,
    page: &Page,
    settings: &FormatSettings,
) -> Result<()> {
    let last_row = surface.last_row();
    let last_col = surface.last_col().min(PAGE_COLS);

    if last_row > 0 && last_col > 0 {
        surface.set_font_size(CellRange::new(1, 1, last_row, last_col), settings.font_size)?;
    }

    for row in 1..=last_row {
        surface.set_row_height(row, settings.row_height(page.row_role(row)))?;
    }

    for col in 1..=PAGE_COLS {
        surface.set_col_width(col, settings.col_width(page.col_role(col)))?;
    }

    Ok(())
}

/// Uniform column widths and row heights across the print bounds, plus the print area.
///
/// Runs after [`format_page`] and overrides its sizing inside the bounds.
pub fn apply_print_formatting<S: Surface + ?Sized>(
    surface: &mut S,
    settings: &PrintSettings,
) -> Result<()> {
    for col in 1..=settings.cols {
        surface.set_col_width(col, settings.col_width)?;
    }
    for row in 1..=settings.rows {
        surface.set_row_height(row, settings.row_height)?;
    }
    if settings.rows > 0 && settings.cols > 0 {
        surface.set_print_area(CellRange::new(1, 1, settings.rows, settings.cols))?;
    }
    Ok(())
}
