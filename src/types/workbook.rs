use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::*;
use crate::error::{Result, WallcalError};

/// Default column width in pixels (~8.43 characters).
pub const DEFAULT_COL_WIDTH: f64 = 64.0;
/// Default row height in pixels (~15 points).
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// Largest row index SpreadsheetML allows.
pub const MAX_ROWS: u32 = 1_048_576;
/// Largest column index SpreadsheetML allows.
pub const MAX_COLS: u32 = 16_384;

/// A single worksheet.
///
/// Cells are keyed by 1-based `(row, col)`; the map keeps them in row-major
/// order, which is the order they are written out in.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub cells: BTreeMap<(u32, u32), Cell>,
    pub merges: Vec<CellRange>,
    /// Custom row heights in pixels.
    pub row_heights: BTreeMap<u32, f64>,
    /// Custom column widths in pixels.
    pub col_widths: BTreeMap<u32, f64>,
    pub default_row_height: f64,
    pub default_col_width: f64,
    /// Print area recorded for this sheet, if any.
    pub print_area: Option<CellRange>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            row_heights: BTreeMap::new(),
            col_widths: BTreeMap::new(),
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_col_width: DEFAULT_COL_WIDTH,
            print_area: None,
        }
    }

    /// Remove all contents, formatting and sizing, keeping the sheet's identity.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.merges.clear();
        self.row_heights.clear();
        self.col_widths.clear();
        self.print_area = None;
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn value_at(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cell(row, col).map(|c| &c.value)
    }

    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        self.cells.insert((row, col), cell);
    }

    /// Style of a cell, materializing a default cell if it does not exist.
    pub fn style_mut(&mut self, row: u32, col: u32) -> &mut CellStyle {
        &mut self.cells.entry((row, col)).or_default().style
    }

    /// Record a merge, replacing any merge it overlaps.
    pub fn merge(&mut self, range: CellRange) {
        self.merges.retain(|m| !m.intersects(&range));
        self.merges.push(range);
    }

    pub fn merge_at(&self, row: u32, col: u32) -> Option<&CellRange> {
        self.merges.iter().find(|m| m.contains(row, col))
    }

    /// Bottom-most row holding a cell or merge (0 when empty).
    pub fn last_row(&self) -> u32 {
        let cells = self.cells.keys().map(|&(r, _)| r).max().unwrap_or(0);
        let merges = self.merges.iter().map(|m| m.end_row).max().unwrap_or(0);
        cells.max(merges)
    }

    /// Right-most column holding a cell or merge (0 when empty).
    pub fn last_col(&self) -> u32 {
        let cells = self.cells.keys().map(|&(_, c)| c).max().unwrap_or(0);
        let merges = self.merges.iter().map(|m| m.end_col).max().unwrap_or(0);
        cells.max(merges)
    }

    pub fn row_height(&self, row: u32) -> f64 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    pub fn col_width(&self, col: u32) -> f64 {
        self.col_widths
            .get(&col)
            .copied()
            .unwrap_or(self.default_col_width)
    }
}

/// The `.xlsx` bytes a workbook was read from.
///
/// Saving a loaded workbook patches this package: parts the model does not
/// cover, and sheets that were not changed, are copied through as they are.
#[derive(Clone, PartialEq, Eq)]
pub struct SourcePackage {
    bytes: Arc<[u8]>,
}

impl SourcePackage {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SourcePackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePackage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A workbook: ordered sheets plus the active (selected) one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    pub active_sheet: usize,
    /// Set when the workbook was loaded from a file.
    pub source: Option<SourcePackage>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name == name)
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn active(&self) -> Option<&Sheet> {
        self.sheets.get(self.active_sheet)
    }

    /// Append a new, empty sheet and return its index.
    pub fn push_sheet(&mut self, name: &str) -> Result<usize> {
        validate_sheet_name(name)?;
        if self.sheet_index(name).is_some() {
            return Err(WallcalError::Surface(format!(
                "a sheet named '{name}' already exists"
            )));
        }
        self.sheets.push(Sheet::new(name));
        Ok(self.sheets.len() - 1)
    }
}

/// Sheet names are limited to 31 characters and may not contain `[]:*?/\`.
fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().count() > 31 {
        return Err(WallcalError::Surface(format!(
            "sheet name '{name}' must be 1 to 31 characters"
        )));
    }
    if name.contains(['[', ']', ':', '*', '?', '/', '\\']) {
        return Err(WallcalError::Surface(format!(
            "sheet name '{name}' contains a reserved character"
        )));
    }
    Ok(())
}
