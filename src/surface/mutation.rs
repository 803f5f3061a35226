//! Cell mutations.
//!
//! Applies layout output to the in-memory sheet model.

use crate::error::{Result, WallcalError};
use crate::types::{Cell, CellMutation, CellRange, CellValue, Sheet, MAX_COLS, MAX_ROWS};

/// Apply one mutation to a sheet.
///
/// Every covered cell is overwritten with the mutation's value and style, as
/// a range-wide "set value" would. For a merged mutation only the anchor
/// keeps the value, and the range is recorded as a merge.
pub(crate) fn apply_cell_mutation(sheet: &mut Sheet, mutation: &CellMutation) -> Result<()> {
    let range = checked_range(mutation)?;

    for row in range.start_row..=range.end_row {
        for col in range.start_col..=range.end_col {
            let value = match mutation.value_at(row, col) {
                Some(v) => v.clone(),
                None => CellValue::Empty,
            };
            sheet.set_cell(
                row,
                col,
                Cell {
                    value,
                    style: mutation.style,
                },
            );
        }
    }

    if mutation.merge && (range.rows() > 1 || range.cols() > 1) {
        sheet.merge(range);
    }

    Ok(())
}

/// Set the font size of every cell in `range`, creating blank cells as needed.
pub(crate) fn apply_font_size(sheet: &mut Sheet, range: CellRange, size: u32) -> Result<()> {
    check_bounds(range)?;
    for row in range.start_row..=range.end_row {
        for col in range.start_col..=range.end_col {
            sheet.style_mut(row, col).font_size = size;
        }
    }
    Ok(())
}

fn checked_range(mutation: &CellMutation) -> Result<CellRange> {
    if mutation.rows == 0 || mutation.cols == 0 {
        return Err(WallcalError::Surface(format!(
            "empty mutation at row {}, column {}",
            mutation.row, mutation.col
        )));
    }
    let range = CellRange::new(
        mutation.row,
        mutation.col,
        mutation
            .row
            .checked_add(mutation.rows - 1)
            .ok_or_else(|| WallcalError::Surface("row range overflows".into()))?,
        mutation
            .col
            .checked_add(mutation.cols - 1)
            .ok_or_else(|| WallcalError::Surface("column range overflows".into()))?,
    );
    check_bounds(range)?;
    Ok(range)
}

fn check_bounds(range: CellRange) -> Result<()> {
    if range.start_row == 0 || range.start_col == 0 {
        return Err(WallcalError::CellRef(format!(
            "row and column are 1-based, got ({}, {})",
            range.start_row, range.start_col
        )));
    }
    if range.end_row > MAX_ROWS || range.end_col > MAX_COLS {
        return Err(WallcalError::Surface(format!(
            "range ends at ({}, {}), outside the sheet",
            range.end_row, range.end_col
        )));
    }
    Ok(())
}
