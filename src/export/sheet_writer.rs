//! Generates worksheet XML from a `Sheet` struct.
//!
//! Strings are written inline (`t="inlineStr"`) so no shared string table
//! has to be built.

use std::collections::BTreeSet;

use crate::cell_ref::{cell_ref, range_ref};
use crate::types::{Cell, CellValue, Sheet};
use crate::units::{px_to_col_chars, px_to_points};

use super::styles_writer::StyleTable;

/// Write a complete worksheet XML string from a `Sheet`.
pub(crate) fn write_sheet_xml(sheet: &Sheet, styles: &StyleTable, selected: bool) -> String {
    let mut out = String::with_capacity(8192);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    let (last_row, last_col) = (sheet.last_row(), sheet.last_col());
    let dimension = if last_row > 0 && last_col > 0 {
        range_ref(1, 1, last_row, last_col)
    } else {
        "A1".to_string()
    };
    out.push_str(&format!("<dimension ref=\"{dimension}\"/>\n"));

    // <sheetViews>
    out.push_str("<sheetViews><sheetView");
    if selected {
        out.push_str(" tabSelected=\"1\"");
    }
    out.push_str(" workbookViewId=\"0\"/></sheetViews>\n");

    // <sheetFormatPr>
    out.push_str(&format!(
        "<sheetFormatPr defaultRowHeight=\"{:.2}\" defaultColWidth=\"{:.4}\"/>\n",
        px_to_points(sheet.default_row_height),
        px_to_col_chars(sheet.default_col_width)
    ));

    // <cols>
    if !sheet.col_widths.is_empty() {
        out.push_str("<cols>\n");
        for (&col, &width) in &sheet.col_widths {
            out.push_str(&format!(
                "<col min=\"{col}\" max=\"{col}\" width=\"{:.4}\" customWidth=\"1\"/>\n",
                px_to_col_chars(width)
            ));
        }
        out.push_str("</cols>\n");
    }

    // <sheetData>
    out.push_str("<sheetData>\n");
    write_sheet_data(&mut out, sheet, styles);
    out.push_str("</sheetData>\n");

    // <mergeCells>
    if !sheet.merges.is_empty() {
        out.push_str(&format!("<mergeCells count=\"{}\">\n", sheet.merges.len()));
        for merge in &sheet.merges {
            out.push_str(&format!(
                "<mergeCell ref=\"{}\"/>\n",
                range_ref(merge.start_row, merge.start_col, merge.end_row, merge.end_col)
            ));
        }
        out.push_str("</mergeCells>\n");
    }

    out.push_str(
        "<pageMargins left=\"0.7\" right=\"0.7\" top=\"0.75\" bottom=\"0.75\" header=\"0.3\" footer=\"0.3\"/>\n",
    );
    // A4, portrait
    out.push_str("<pageSetup paperSize=\"9\" orientation=\"portrait\"/>\n");

    out.push_str("</worksheet>");
    out
}

/// Write all rows into `<sheetData>`, including rows that only carry a height.
fn write_sheet_data(out: &mut String, sheet: &Sheet, styles: &StyleTable) {
    let rows: BTreeSet<u32> = sheet
        .cells
        .keys()
        .map(|&(r, _)| r)
        .chain(sheet.row_heights.keys().copied())
        .collect();

    for row in rows {
        out.push_str(&format!("<row r=\"{row}\""));
        if let Some(&h) = sheet.row_heights.get(&row) {
            out.push_str(&format!(" ht=\"{:.2}\" customHeight=\"1\"", px_to_points(h)));
        }

        let mut cells = sheet.cells.range((row, 0)..=(row, u32::MAX)).peekable();
        if cells.peek().is_none() {
            out.push_str("/>\n");
            continue;
        }
        out.push('>');
        for (&(r, c), cell) in cells {
            write_cell(out, r, c, cell, styles);
        }
        out.push_str("</row>\n");
    }
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, row: u32, col: u32, cell: &Cell, styles: &StyleTable) {
    out.push_str(&format!("<c r=\"{}\"", cell_ref(row, col)));

    let xf = styles.xf_id(&cell.style);
    if xf != 0 {
        out.push_str(&format!(" s=\"{xf}\""));
    }

    match &cell.value {
        CellValue::Empty => out.push_str("/>"),
        CellValue::Integer(n) => out.push_str(&format!("><v>{n}</v></c>")),
        CellValue::Text(s) => {
            out.push_str(" t=\"inlineStr\"><is><t>");
            out.push_str(&xml_escape(s));
            out.push_str("</t></is></c>");
        }
    }
}

/// Minimal XML escaping for attribute/text content.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::styles_writer::StyleBase;
    use crate::types::{CellRange, CellStyle, Fill};

    fn sample_sheet() -> Sheet {
        let mut sheet = Sheet::new("Calendar 2026");
        sheet.set_cell(
            1,
            1,
            Cell {
                value: CellValue::from("January & co"),
                style: CellStyle::blank().bold().fill(Fill::LightBlue),
            },
        );
        sheet.set_cell(
            4,
            5,
            Cell {
                value: CellValue::Integer(1),
                style: CellStyle::blank(),
            },
        );
        sheet.merge(CellRange::new(1, 1, 1, 7));
        sheet.row_heights.insert(2, 22.0);
        sheet.col_widths.insert(8, 10.0);
        sheet
    }

    fn render(sheet: &Sheet) -> String {
        let styles = StyleTable::from_sheets([sheet], StyleBase::FRESH);
        write_sheet_xml(sheet, &styles, true)
    }

    #[test]
    fn writes_values_merges_and_sizes() {
        let xml = render(&sample_sheet());
        assert!(xml.contains("<dimension ref=\"A1:G4\"/>"));
        assert!(xml.contains("<is><t>January &amp; co</t></is>"));
        assert!(xml.contains("<c r=\"E4\" s=\"2\"><v>1</v></c>"));
        assert!(xml.contains("<mergeCell ref=\"A1:G1\"/>"));
        assert!(xml.contains("<row r=\"2\" ht=\"16.50\" customHeight=\"1\"/>"));
        assert!(xml.contains("<col min=\"8\" max=\"8\" width=\"0.7143\" customWidth=\"1\"/>"));
        assert!(xml.contains("tabSelected=\"1\""));
    }

    #[test]
    fn empty_sheet_has_a1_dimension() {
        let xml = render(&Sheet::new("Empty"));
        assert!(xml.contains("<dimension ref=\"A1\"/>"));
        assert!(xml.contains("<sheetData>\n</sheetData>"));
    }

    #[test]
    fn escape_handles_all_special_characters() {
        assert_eq!(xml_escape("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;");
    }
}
