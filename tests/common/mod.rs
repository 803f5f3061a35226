//! Common test utilities and assertion helpers.
//!
//! Runs generation end to end against in-memory documents and reads back
//! what ended up on the sheets.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use wallcal::{
    generate_calendar, CalendarConfig, CellMutation, CellRange, CellValue, Document,
    GenerationReport, MonthBlock, RecordingNotifier, Result, Sheet, Surface, SurfaceId,
    WallcalError, Workbook,
};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Generation helpers
// ============================================================================

/// Generate into a fresh workbook; panics on failure.
#[must_use]
pub fn generate(config: &CalendarConfig) -> (Workbook, RecordingNotifier, GenerationReport) {
    let mut workbook = Workbook::new();
    let mut notifier = RecordingNotifier::new();
    let report = generate_calendar(&mut workbook, &mut notifier, config)
        .expect("calendar generation failed");
    (workbook, notifier, report)
}

/// Integer values found in the week rows of a month block.
#[must_use]
pub fn day_numbers(sheet: &Sheet, block: &MonthBlock) -> Vec<i64> {
    let mut days = Vec::new();
    for row in block.anchor_row..block.anchor_row + block.height {
        for col in block.anchor_col..block.anchor_col + 7 {
            if let Some(n) = sheet.value_at(row, col).and_then(CellValue::as_integer) {
                days.push(n);
            }
        }
    }
    days
}

/// Snapshot of a sheet, ignoring its name.
#[must_use]
pub fn sheet_contents(sheet: &Sheet) -> Sheet {
    let mut copy = sheet.clone();
    copy.name = String::new();
    copy
}

pub fn assert_text(sheet: &Sheet, row: u32, col: u32, expected: &str) {
    assert_eq!(
        sheet.value_at(row, col),
        Some(&CellValue::Text(expected.to_string())),
        "text at row {row}, col {col} of '{}'",
        sheet.name
    );
}

pub fn assert_integer(sheet: &Sheet, row: u32, col: u32, expected: i64) {
    assert_eq!(
        sheet.value_at(row, col).and_then(CellValue::as_integer),
        Some(expected),
        "integer at row {row}, col {col} of '{}'",
        sheet.name
    );
}

// ============================================================================
// Failing document
// ============================================================================

/// A sheet that starts rejecting mutations after `remaining` successful ones.
#[derive(Debug)]
pub struct FlakySheet {
    pub inner: Sheet,
    pub remaining: usize,
}

impl Surface for FlakySheet {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn clear(&mut self) -> Result<()> {
        self.inner.clear();
        Ok(())
    }

    fn apply(&mut self, mutation: &CellMutation) -> Result<()> {
        if self.remaining == 0 {
            return Err(WallcalError::Surface("host rejected the write".into()));
        }
        self.remaining -= 1;
        self.inner.apply(mutation)
    }

    fn set_font_size(&mut self, range: CellRange, size: u32) -> Result<()> {
        self.inner.set_font_size(range, size)
    }

    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        self.inner.set_row_height(row, height)
    }

    fn set_col_width(&mut self, col: u32, width: f64) -> Result<()> {
        self.inner.set_col_width(col, width)
    }

    fn set_print_area(&mut self, range: CellRange) -> Result<()> {
        self.inner.set_print_area(range)
    }

    fn last_row(&self) -> u32 {
        self.inner.last_row()
    }

    fn last_col(&self) -> u32 {
        self.inner.last_col()
    }
}

/// Document whose new sheets each accept `budget` writes.
#[derive(Debug, Default)]
pub struct FlakyDocument {
    pub sheets: Vec<FlakySheet>,
    pub budget: usize,
    pub activated: Option<SurfaceId>,
}

impl FlakyDocument {
    #[must_use]
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }
}

impl Document for FlakyDocument {
    type Surface = FlakySheet;

    fn find_surface(&self, name: &str) -> Option<SurfaceId> {
        self.sheets
            .iter()
            .position(|s| s.inner.name == name)
            .map(SurfaceId)
    }

    fn insert_surface(&mut self, name: &str) -> Result<SurfaceId> {
        self.sheets.push(FlakySheet {
            inner: Sheet::new(name),
            remaining: self.budget,
        });
        Ok(SurfaceId(self.sheets.len() - 1))
    }

    fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut FlakySheet> {
        self.sheets
            .get_mut(id.0)
            .ok_or_else(|| WallcalError::Surface("missing".into()))
    }

    fn activate(&mut self, id: SurfaceId) -> Result<()> {
        self.activated = Some(id);
        Ok(())
    }
}
