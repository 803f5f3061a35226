use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, WallcalError};

/// Week rows rendered per month block, whether or not the month needs them.
pub const WEEKS_PER_MONTH: u32 = 6;
/// Day columns per month block (Sunday first).
pub const DAYS_PER_WEEK: u32 = 7;
/// Month blocks stacked vertically on a page.
pub const GRID_ROWS: u32 = 2;
/// Month blocks side by side on a page.
pub const GRID_COLS: u32 = 3;
/// Months on one page.
pub const MONTHS_PER_PAGE: u32 = GRID_ROWS * GRID_COLS;
/// Columns from one block anchor to the next: 7 day columns + 2 spacer columns.
pub const BLOCK_COL_STRIDE: u32 = DAYS_PER_WEEK + 2;
/// Full page width in columns.
pub const PAGE_COLS: u32 = GRID_COLS * BLOCK_COL_STRIDE;
/// Rows covered by the print sizing pass.
pub const PRINT_ROWS: u32 = 40;
/// Year used by the packaged menu entry.
pub const DEFAULT_YEAR: i32 = 2026;

const _: () = assert!(MONTHS_PER_PAGE == 6, "a page must hold exactly six months");

/// Upper bound on either spacing value; keeps every page inside sheet limits.
const MAX_SPACER_ROWS: u32 = 100;

/// The two packaged spacing presets.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SpacingVariant {
    /// One empty row between weeks, two between month rows.
    #[default]
    Compact,
    /// Two empty rows between weeks, four between month rows.
    Airy,
}

impl SpacingVariant {
    /// `(spacer_rows_after_week, spacer_rows_after_month_block)`
    pub const fn spacing(self) -> (u32, u32) {
        match self {
            Self::Compact => (1, 2),
            Self::Airy => (2, 4),
        }
    }
}

impl FromStr for SpacingVariant {
    type Err = WallcalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "a" => Ok(Self::Compact),
            "airy" | "b" => Ok(Self::Airy),
            other => Err(WallcalError::Config(format!(
                "unknown spacing variant '{other}' (expected compact or airy)"
            ))),
        }
    }
}

/// Everything the layout engine needs to lay out one page.
///
/// Passed explicitly through the call chain; the grid shape itself is fixed
/// by the constants in this module.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarConfig {
    pub year: i32,
    /// First month on the page, 0 = January.
    pub start_month: u32,
    pub spacer_rows_after_week: u32,
    pub spacer_rows_after_month_block: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR, SpacingVariant::default())
    }
}

impl CalendarConfig {
    pub const fn new(year: i32, variant: SpacingVariant) -> Self {
        let (week, block) = variant.spacing();
        Self {
            year,
            start_month: 0,
            spacer_rows_after_week: week,
            spacer_rows_after_month_block: block,
        }
    }

    #[must_use]
    pub const fn with_start_month(mut self, start_month: u32) -> Self {
        self.start_month = start_month;
        self
    }

    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    #[must_use]
    pub const fn with_variant(mut self, variant: SpacingVariant) -> Self {
        let (week, block) = variant.spacing();
        self.spacer_rows_after_week = week;
        self.spacer_rows_after_month_block = block;
        self
    }

    /// The packaged preset these spacing values match, if any.
    pub fn variant(&self) -> Option<SpacingVariant> {
        [SpacingVariant::Compact, SpacingVariant::Airy]
            .into_iter()
            .find(|v| {
                v.spacing() == (self.spacer_rows_after_week, self.spacer_rows_after_month_block)
            })
    }

    /// Reject values the layout engine cannot place on a sheet.
    ///
    /// The start month only has to name a real month here; a page that would
    /// run past December is reported by the calendar math as an invalid date.
    pub fn validate(&self) -> Result<()> {
        if self.start_month > 11 {
            return Err(WallcalError::Config(format!(
                "start month {} is outside 0..=11",
                self.start_month
            )));
        }
        if self.spacer_rows_after_week > MAX_SPACER_ROWS
            || self.spacer_rows_after_month_block > MAX_SPACER_ROWS
        {
            return Err(WallcalError::Config(format!(
                "spacer rows must be at most {MAX_SPACER_ROWS}"
            )));
        }
        Ok(())
    }

    /// Parse a JSON config; missing fields fall back to the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
