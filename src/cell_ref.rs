//! Utilities for formatting and parsing A1-style cell references.
//!
//! Rows and columns are 1-based throughout the crate, matching the A1
//! notation and the host spreadsheet APIs the layout targets.

/// Convert a 1-based column number into its letter form (1 -> "A", 27 -> "AA").
///
/// Column 0 has no letter form and yields an empty string.
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + offset));
        n /= 26;
    }
    result
}

/// Format a 1-based (row, col) pair as "A1".
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), row)
}

/// Format a rectangular range as "A1:G1" (or "A1" for a single cell).
pub fn range_ref(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> String {
    if start_row == end_row && start_col == end_col {
        return cell_ref(start_row, start_col);
    }
    format!(
        "{}:{}",
        cell_ref(start_row, start_col),
        cell_ref(end_row, end_col)
    )
}

/// Absolute reference form used in defined names ("$A$1:$AA$40").
pub fn absolute_range_ref(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> String {
    format!(
        "${}${}:${}${}",
        col_to_letter(start_col),
        start_row,
        col_to_letter(end_col),
        end_row
    )
}

/// Parse a cell reference like "A1" into a 1-based (row, col).
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

/// Parse a cell reference from raw bytes (ASCII) into a 1-based (row, col).
///
/// This is the bytes equivalent of [`parse_cell_ref`] for use on raw XML
/// attribute values from quick-xml.
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(u32::from(upper - b'A') + 1)?;
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some((row, col))
}

/// Parse a range like "A1:G1" or "A1" into (start_row, start_col, end_row, end_col).
pub fn parse_cell_range(range: &str) -> Option<(u32, u32, u32, u32)> {
    if let Some((start, end)) = range.split_once(':') {
        let (start_row, start_col) = parse_cell_ref(start)?;
        let (end_row, end_col) = parse_cell_ref(end)?;
        Some((start_row, start_col, end_row, end_col))
    } else {
        let (row, col) = parse_cell_ref(range)?;
        Some((row, col, row, col))
    }
}
