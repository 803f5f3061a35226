//! Pixel <-> SpreadsheetML unit conversions.
//!
//! Sizes are kept in pixels in memory. Files store row heights in points
//! and column widths in characters of the default font (Calibri 11, whose
//! maximum digit width is 7 px, plus 5 px of cell padding).

const DIGIT_WIDTH: f64 = 7.0;
const CELL_PADDING: f64 = 5.0;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn px_to_points(px: f64) -> f64 {
    px * (72.0 / 96.0)
}

pub fn points_to_px(points: f64) -> f64 {
    round2(points * (96.0 / 72.0))
}

pub fn px_to_col_chars(px: f64) -> f64 {
    ((px - CELL_PADDING) / DIGIT_WIDTH).max(0.0)
}

pub fn col_chars_to_px(chars: f64) -> f64 {
    round2(chars * DIGIT_WIDTH + CELL_PADDING)
}
