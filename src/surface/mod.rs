//! Grid surfaces the calendar is rendered onto.
//!
//! `Document` and `Surface` are the only things the orchestrator knows about
//! the host spreadsheet: find or insert a named grid, clear it, write cells,
//! size rows and columns, and select which grid is shown. The in-memory
//! [`Workbook`] implements both; tests plug in their own.

pub(crate) mod mutation;

use crate::error::{Result, WallcalError};
use crate::types::{CellMutation, CellRange, Sheet, Workbook};

/// Handle to a surface within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub usize);

/// A writable grid of cells.
pub trait Surface {
    fn name(&self) -> &str;

    /// Remove all values and formatting in place.
    fn clear(&mut self) -> Result<()>;

    fn apply(&mut self, mutation: &CellMutation) -> Result<()>;

    fn set_font_size(&mut self, range: CellRange, size: u32) -> Result<()>;

    /// Height in pixels.
    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()>;

    /// Width in pixels.
    fn set_col_width(&mut self, col: u32, width: f64) -> Result<()>;

    /// Record the rectangle that should be printed.
    fn set_print_area(&mut self, range: CellRange) -> Result<()>;

    /// Bottom-most occupied row, 0 when empty.
    fn last_row(&self) -> u32;

    /// Right-most occupied column, 0 when empty.
    fn last_col(&self) -> u32;
}

/// A container of named surfaces.
pub trait Document {
    type Surface: Surface;

    fn find_surface(&self, name: &str) -> Option<SurfaceId>;

    fn insert_surface(&mut self, name: &str) -> Result<SurfaceId>;

    fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut Self::Surface>;

    /// Make `id` the surface shown when the document is opened.
    fn activate(&mut self, id: SurfaceId) -> Result<()>;

    /// Reuse the surface named `name`, cleared in place, or insert a new one.
    ///
    /// Returns the id and whether an existing surface was reused.
    fn obtain_cleared_surface(&mut self, name: &str) -> Result<(SurfaceId, bool)> {
        match self.find_surface(name) {
            Some(id) => {
                self.surface_mut(id)?.clear()?;
                Ok((id, true))
            }
            None => Ok((self.insert_surface(name)?, false)),
        }
    }
}

fn check_row(row: u32) -> Result<()> {
    if row == 0 || row > crate::types::MAX_ROWS {
        return Err(WallcalError::CellRef(format!("row {row} is outside the sheet")));
    }
    Ok(())
}

fn check_col(col: u32) -> Result<()> {
    if col == 0 || col > crate::types::MAX_COLS {
        return Err(WallcalError::CellRef(format!(
            "column {col} is outside the sheet"
        )));
    }
    Ok(())
}

fn check_size(size: f64) -> Result<()> {
    if !size.is_finite() || size < 0.0 {
        return Err(WallcalError::Surface(format!("invalid size {size}")));
    }
    Ok(())
}

impl Surface for Sheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn clear(&mut self) -> Result<()> {
        Sheet::clear(self);
        Ok(())
    }

    fn apply(&mut self, mutation: &CellMutation) -> Result<()> {
        mutation::apply_cell_mutation(self, mutation)
    }

    fn set_font_size(&mut self, range: CellRange, size: u32) -> Result<()> {
        mutation::apply_font_size(self, range, size)
    }

    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        check_row(row)?;
        check_size(height)?;
        self.row_heights.insert(row, height);
        Ok(())
    }

    fn set_col_width(&mut self, col: u32, width: f64) -> Result<()> {
        check_col(col)?;
        check_size(width)?;
        self.col_widths.insert(col, width);
        Ok(())
    }

    fn set_print_area(&mut self, range: CellRange) -> Result<()> {
        check_row(range.start_row)?;
        check_row(range.end_row)?;
        check_col(range.start_col)?;
        check_col(range.end_col)?;
        self.print_area = Some(range);
        Ok(())
    }

    fn last_row(&self) -> u32 {
        Sheet::last_row(self)
    }

    fn last_col(&self) -> u32 {
        Sheet::last_col(self)
    }
}

impl Document for Workbook {
    type Surface = Sheet;

    fn find_surface(&self, name: &str) -> Option<SurfaceId> {
        self.sheet_index(name).map(SurfaceId)
    }

    fn insert_surface(&mut self, name: &str) -> Result<SurfaceId> {
        self.push_sheet(name).map(SurfaceId)
    }

    fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut Sheet> {
        self.sheets
            .get_mut(id.0)
            .ok_or_else(|| WallcalError::Surface(format!("no sheet at index {}", id.0)))
    }

    fn activate(&mut self, id: SurfaceId) -> Result<()> {
        if id.0 >= self.sheets.len() {
            return Err(WallcalError::Surface(format!(
                "cannot activate missing sheet {}",
                id.0
            )));
        }
        self.active_sheet = id.0;
        Ok(())
    }
}
