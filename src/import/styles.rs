//! Resolve `cellXfs` entries of xl/styles.xml into [`CellStyle`]s.
//!
//! Only the properties the calendar model knows about are read: bold, font
//! size, solid fill color, border presence and alignment. Anything else in
//! a foreign stylesheet is dropped.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::BufRead;

use crate::error::Result;
use crate::types::{BorderStyle, CellStyle, Fill, HAlign, VAlign, HOST_DEFAULT_FONT_SIZE};

use super::relationships::attr_string;

#[derive(Debug, Default, Clone, Copy)]
struct RawFont {
    bold: bool,
    size: Option<u32>,
}

#[derive(Debug, Default, Clone)]
struct RawFill {
    pattern_type: Option<String>,
    fg_rgb: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
struct RawXf {
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    align_h: Option<HAlign>,
    align_v: Option<VAlign>,
}

/// Font sizes may be fractional ("10.5"); the whole-point part is kept.
fn parse_font_size(value: &str) -> Option<u32> {
    value
        .parse()
        .ok()
        .or_else(|| value.split('.').next()?.parse().ok())
}

fn parse_index(value: Option<String>) -> usize {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Parse a stylesheet into one resolved style per `cellXfs` index.
pub(super) fn parse_cell_styles<R: BufRead>(reader: R) -> Result<Vec<CellStyle>> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut fonts: Vec<RawFont> = Vec::new();
    let mut fills: Vec<RawFill> = Vec::new();
    let mut borders: Vec<bool> = Vec::new();
    let mut xfs: Vec<RawXf> = Vec::new();

    let mut in_fonts = false;
    let mut in_fills = false;
    let mut in_borders = false;
    let mut in_cell_xfs = false;
    let mut current_font: Option<RawFont> = None;
    let mut current_fill: Option<RawFill> = None;
    let mut current_border: Option<bool> = None;
    let mut current_xf: Option<RawXf> = None;

    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"fonts" => in_fonts = true,
                    b"fills" => in_fills = true,
                    b"borders" => in_borders = true,
                    b"cellXfs" => in_cell_xfs = true,

                    b"font" if in_fonts => {
                        if is_empty {
                            fonts.push(RawFont::default());
                        } else {
                            current_font = Some(RawFont::default());
                        }
                    }
                    b"b" => {
                        if let Some(ref mut font) = current_font {
                            // <b val="0"/> switches bold off
                            font.bold = attr_string(e, b"val").map_or(true, |v| v != "0");
                        }
                    }
                    b"sz" => {
                        if let Some(ref mut font) = current_font {
                            font.size = attr_string(e, b"val").and_then(|v| parse_font_size(&v));
                        }
                    }

                    b"fill" if in_fills => {
                        if is_empty {
                            fills.push(RawFill::default());
                        } else {
                            current_fill = Some(RawFill::default());
                        }
                    }
                    b"patternFill" => {
                        if let Some(ref mut fill) = current_fill {
                            fill.pattern_type = attr_string(e, b"patternType");
                        }
                    }
                    b"fgColor" => {
                        if let Some(ref mut fill) = current_fill {
                            fill.fg_rgb = attr_string(e, b"rgb");
                        }
                    }

                    b"border" if in_borders => {
                        if is_empty {
                            borders.push(false);
                        } else {
                            current_border = Some(false);
                        }
                    }
                    b"left" | b"right" | b"top" | b"bottom" => {
                        if let Some(ref mut has_line) = current_border {
                            if attr_string(e, b"style").is_some_and(|s| s != "none") {
                                *has_line = true;
                            }
                        }
                    }

                    b"xf" if in_cell_xfs => {
                        let xf = RawXf {
                            font_id: parse_index(attr_string(e, b"fontId")),
                            fill_id: parse_index(attr_string(e, b"fillId")),
                            border_id: parse_index(attr_string(e, b"borderId")),
                            ..RawXf::default()
                        };
                        if is_empty {
                            xfs.push(xf);
                        } else {
                            current_xf = Some(xf);
                        }
                    }
                    b"alignment" => {
                        if let Some(ref mut xf) = current_xf {
                            xf.align_h = attr_string(e, b"horizontal")
                                .and_then(|v| HAlign::from_xml(&v));
                            xf.align_v =
                                attr_string(e, b"vertical").and_then(|v| VAlign::from_xml(&v));
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"fonts" => in_fonts = false,
                b"fills" => in_fills = false,
                b"borders" => in_borders = false,
                b"cellXfs" => in_cell_xfs = false,
                b"font" => fonts.extend(current_font.take()),
                b"fill" => fills.extend(current_fill.take()),
                b"border" => borders.extend(current_border.take()),
                b"xf" => xfs.extend(current_xf.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(xfs
        .iter()
        .map(|xf| resolve_style(xf, &fonts, &fills, &borders))
        .collect())
}

fn resolve_style(xf: &RawXf, fonts: &[RawFont], fills: &[RawFill], borders: &[bool]) -> CellStyle {
    let font = fonts.get(xf.font_id).copied().unwrap_or_default();
    let fill = fills
        .get(xf.fill_id)
        .filter(|f| f.pattern_type.as_deref() == Some("solid"))
        .and_then(|f| f.fg_rgb.as_deref())
        .and_then(Fill::from_color)
        .unwrap_or_default();
    let border = if borders.get(xf.border_id).copied().unwrap_or(false) {
        BorderStyle::Thin
    } else {
        BorderStyle::None
    };

    CellStyle {
        bold: font.bold,
        font_size: font.size.unwrap_or(HOST_DEFAULT_FONT_SIZE),
        fill,
        align_h: xf.align_h,
        align_v: xf.align_v,
        border,
    }
}
