//! Layout engine for the calendar pages.
//!
//! This module handles:
//! - Block geometry (anchor rows/columns, block heights, spacing)
//! - Emitting the cell mutations for one page of six months
//! - Tagging every row and column with the role the formatting pass sizes by

mod geometry;
mod month_grid;

pub use geometry::PageGeometry;
pub use month_grid::layout_page;
