//! Assemble a fresh XLSX ZIP package for a workbook.
//!
//! Every part is generated from the in-memory workbook. Entries carry the
//! zip crate's fixed default timestamp, so identical workbooks produce
//! identical bytes.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::cell_ref::absolute_range_ref;
use crate::error::Result;
use crate::types::{Sheet, Workbook};

use super::sheet_writer::{write_sheet_xml, xml_escape};
use super::styles_writer::{StyleBase, StyleTable};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(crate) const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
pub(crate) const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Path of the n-th (0-based) worksheet part.
pub(crate) fn sheet_part_path(index: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", index + 1)
}

pub(crate) fn write_package(workbook: &Workbook) -> Result<Vec<u8>> {
    let styles = StyleTable::from_sheets(&workbook.sheets, StyleBase::FRESH);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut put = |name: &str, body: &str| -> Result<()> {
        writer.start_file(name, options)?;
        writer.write_all(body.as_bytes())?;
        Ok(())
    };

    put("[Content_Types].xml", &content_types_xml(workbook))?;
    put("_rels/.rels", &root_rels_xml())?;
    put("xl/workbook.xml", &workbook_xml(workbook))?;
    put("xl/_rels/workbook.xml.rels", &workbook_rels_xml(workbook))?;
    put("xl/styles.xml", &styles.to_xml())?;
    for (idx, sheet) in workbook.sheets.iter().enumerate() {
        let xml = write_sheet_xml(sheet, &styles, idx == workbook.active_sheet);
        put(&sheet_part_path(idx), &xml)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

fn content_types_xml(workbook: &Workbook) -> String {
    let mut out = format!(
        "{XML_HEADER}\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\n"
    );
    out.push_str("<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\n");
    out.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>\n");
    out.push_str("<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\n");
    out.push_str(&format!(
        "<Override PartName=\"/xl/styles.xml\" ContentType=\"{STYLES_CONTENT_TYPE}\"/>\n"
    ));
    for idx in 0..workbook.sheets.len() {
        out.push_str(&format!(
            "<Override PartName=\"/{}\" ContentType=\"{WORKSHEET_CONTENT_TYPE}\"/>\n",
            sheet_part_path(idx)
        ));
    }
    out.push_str("</Types>");
    out
}

fn root_rels_xml() -> String {
    format!(
        "{XML_HEADER}\n<Relationships xmlns=\"{NS_PKG_REL}\">\n\
         <Relationship Id=\"rId1\" Type=\"{NS_REL}/officeDocument\" Target=\"xl/workbook.xml\"/>\n\
         </Relationships>"
    )
}

fn workbook_xml(workbook: &Workbook) -> String {
    let mut out = format!("{XML_HEADER}\n<workbook xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\">\n");
    out.push_str(&format!(
        "<bookViews><workbookView activeTab=\"{}\"/></bookViews>\n",
        workbook.active_sheet
    ));

    out.push_str("<sheets>\n");
    for (idx, sheet) in workbook.sheets.iter().enumerate() {
        out.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>\n",
            xml_escape(&sheet.name),
            idx + 1,
            idx + 1
        ));
    }
    out.push_str("</sheets>\n");

    let print_areas: Vec<String> = workbook
        .sheets
        .iter()
        .enumerate()
        .filter_map(|(idx, sheet)| print_area_name(idx, sheet, ""))
        .collect();
    if !print_areas.is_empty() {
        out.push_str("<definedNames>\n");
        for name in print_areas {
            out.push_str(&name);
        }
        out.push_str("</definedNames>\n");
    }

    out.push_str("</workbook>");
    out
}

fn workbook_rels_xml(workbook: &Workbook) -> String {
    let mut out = format!("{XML_HEADER}\n<Relationships xmlns=\"{NS_PKG_REL}\">\n");
    let count = workbook.sheets.len();
    for idx in 0..count {
        out.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{NS_REL}/worksheet\" Target=\"worksheets/sheet{}.xml\"/>\n",
            idx + 1,
            idx + 1
        ));
    }
    out.push_str(&format!(
        "<Relationship Id=\"rId{}\" Type=\"{NS_REL}/styles\" Target=\"styles.xml\"/>\n",
        count + 1
    ));
    out.push_str("</Relationships>");
    out
}

/// `_xlnm.Print_Area` defined name for the sheet at `idx`, if it has one.
///
/// `prefix` is the namespace prefix of the surrounding elements.
pub(crate) fn print_area_name(idx: usize, sheet: &Sheet, prefix: &str) -> Option<String> {
    let area = sheet.print_area?;
    let target = format!(
        "{}!{}",
        quote_sheet_name(&sheet.name),
        absolute_range_ref(area.start_row, area.start_col, area.end_row, area.end_col)
    );
    Some(format!(
        "<{prefix}definedName name=\"_xlnm.Print_Area\" localSheetId=\"{idx}\">{}</{prefix}definedName>\n",
        xml_escape(&target)
    ))
}

/// Quote a sheet name for use in a formula reference ('It''s' form).
pub(crate) fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}
