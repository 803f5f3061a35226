//! Worksheet XML parsing into a [`Sheet`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

use crate::cell_ref::{parse_cell_range, parse_cell_ref};
use crate::error::Result;
use crate::types::{Cell, CellRange, CellStyle, CellValue, Sheet, MAX_COLS};
use crate::units::{col_chars_to_px, points_to_px};

use super::relationships::attr_string;

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &str) -> CellTypeTag {
    match value {
        "s" => CellTypeTag::Shared,
        "b" => CellTypeTag::Bool,
        "e" => CellTypeTag::Error,
        "str" => CellTypeTag::Str,
        "inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

/// A `<c>` element whose value is still being read.
struct PendingCell {
    row: u32,
    col: u32,
    tag: CellTypeTag,
    style: CellStyle,
    text: String,
}

/// Turn the raw `<v>`/`<t>` text of a cell into a value.
///
/// Integral numbers stay numeric; anything else the model cannot hold
/// (fractions, booleans, errors) is kept as its text form.
pub(super) fn resolve_cell_value(
    raw: &str,
    tag: CellTypeTag,
    shared_strings: &[String],
) -> CellValue {
    match tag {
        CellTypeTag::Shared => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared_strings.get(idx))
            .map_or(CellValue::Empty, |s| CellValue::Text(s.clone())),
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Error => {
            CellValue::Text(raw.to_string())
        }
        CellTypeTag::Bool => {
            let truthy = matches!(raw.trim(), "1" | "true" | "TRUE");
            CellValue::Text(if truthy { "TRUE" } else { "FALSE" }.to_string())
        }
        CellTypeTag::Default => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else if let Ok(n) = trimmed.parse::<i64>() {
                CellValue::Integer(n)
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
    }
}

fn parse_f64(e: &BytesStart<'_>, key: &[u8]) -> Option<f64> {
    attr_string(e, key).and_then(|v| v.parse().ok())
}

fn parse_u32(e: &BytesStart<'_>, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|v| v.parse().ok())
}

/// Parse one worksheet part.
///
/// `styles` is the resolved `cellXfs` table; cells without an `s` attribute
/// or with an out-of-range index get the default style.
pub(super) fn parse_sheet<R: BufRead>(
    reader: R,
    name: &str,
    shared_strings: &[String],
    styles: &[CellStyle],
) -> Result<Sheet> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut sheet = Sheet::new(name);
    let mut buf = Vec::new();
    let mut current_row: u32 = 0;
    let mut pending: Option<PendingCell> = None;
    let mut in_value = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"sheetFormatPr" => {
                        if let Some(pts) = parse_f64(e, b"defaultRowHeight") {
                            sheet.default_row_height = points_to_px(pts);
                        }
                        if let Some(chars) = parse_f64(e, b"defaultColWidth") {
                            sheet.default_col_width = col_chars_to_px(chars);
                        }
                    }

                    b"col" => {
                        let min = parse_u32(e, b"min").unwrap_or(0).max(1);
                        let max = parse_u32(e, b"max").unwrap_or(0).min(MAX_COLS);
                        if let Some(chars) = parse_f64(e, b"width") {
                            let px = col_chars_to_px(chars);
                            for col in min..=max {
                                sheet.col_widths.insert(col, px);
                            }
                        }
                    }

                    b"row" => {
                        current_row = parse_u32(e, b"r").unwrap_or(current_row.saturating_add(1));
                        if let Some(pts) = parse_f64(e, b"ht") {
                            sheet.row_heights.insert(current_row, points_to_px(pts));
                        }
                    }

                    b"c" => {
                        if let Some((row, col)) =
                            attr_string(e, b"r").and_then(|r| parse_cell_ref(&r))
                        {
                            let tag = attr_string(e, b"t")
                                .map_or(CellTypeTag::Default, |t| parse_cell_type_tag(&t));
                            let style = attr_string(e, b"s")
                                .and_then(|s| s.parse::<usize>().ok())
                                .and_then(|idx| styles.get(idx).copied())
                                .unwrap_or_default();
                            let cell = PendingCell {
                                row,
                                col,
                                tag,
                                style,
                                text: String::new(),
                            };
                            if is_empty {
                                finish_cell(&mut sheet, cell, shared_strings);
                            } else {
                                pending = Some(cell);
                            }
                        }
                    }

                    b"v" | b"t" if pending.is_some() && !is_empty => in_value = true,

                    b"mergeCell" => {
                        if let Some((sr, sc, er, ec)) =
                            attr_string(e, b"ref").and_then(|r| parse_cell_range(&r))
                        {
                            sheet.merge(CellRange::new(sr, sc, er, ec));
                        }
                    }

                    _ => {}
                }
            }
            Event::Text(ref t) if in_value => {
                if let Some(cell) = pending.as_mut() {
                    cell.text.push_str(&t.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        finish_cell(&mut sheet, cell, shared_strings);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheet)
}

fn finish_cell(sheet: &mut Sheet, cell: PendingCell, shared_strings: &[String]) {
    let value = if cell.text.is_empty() {
        CellValue::Empty
    } else {
        resolve_cell_value(&cell.text, cell.tag, shared_strings)
    };
    sheet.set_cell(
        cell.row,
        cell.col,
        Cell {
            value,
            style: cell.style,
        },
    );
}
