//! Package-level parts: workbook relationships, the sheet list and shared strings.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_range;
use crate::error::Result;
use crate::types::CellRange;

/// Workbook relationships parsed from xl/_rels/workbook.xml.rels
#[derive(Default, Debug)]
pub(super) struct WorkbookRelationships {
    /// rId -> full path, e.g. "rId1" -> "xl/worksheets/sheet1.xml"
    pub worksheets: HashMap<String, String>,
    pub shared_strings: Option<String>,
    pub styles: Option<String>,
}

/// One `<sheet>` entry of xl/workbook.xml.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
}

/// What xl/workbook.xml says about the sheets.
#[derive(Debug, Default)]
pub(super) struct WorkbookInfo {
    pub sheets: Vec<SheetInfo>,
    pub active_tab: usize,
    /// Sheet index -> print area.
    pub print_areas: HashMap<usize, CellRange>,
}

pub(super) fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse workbook relationships from xl/_rels/workbook.xml.rels
pub(super) fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> WorkbookRelationships {
    let mut rels = WorkbookRelationships::default();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return rels; // Relationships file is optional
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_string(e, b"Id").unwrap_or_default();
                let target = attr_string(e, b"Target").unwrap_or_default();
                let rel_type = attr_string(e, b"Type").unwrap_or_default();

                // Resolve target path relative to xl/
                let full_path = match target.strip_prefix('/') {
                    Some(stripped) => stripped.to_string(),
                    None => format!("xl/{target}"),
                };

                if rel_type.ends_with("/worksheet") && !id.is_empty() && !target.is_empty() {
                    rels.worksheets.insert(id, full_path);
                } else if rel_type.ends_with("/sharedStrings") {
                    rels.shared_strings = Some(full_path);
                } else if rel_type.ends_with("/styles") {
                    rels.styles = Some(full_path);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Read sheet names and paths, the active tab and per-sheet print areas
/// from xl/workbook.xml.
pub(super) fn parse_workbook_info<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
) -> Result<WorkbookInfo> {
    let file = archive.by_name("xl/workbook.xml")?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut info = WorkbookInfo::default();
    let mut buf = Vec::new();
    // localSheetId of the print-area name being read
    let mut print_area_for: Option<usize> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                b"workbookView" => {
                    info.active_tab = attr_string(e, b"activeTab")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                }
                b"sheet" => {
                    let name = attr_string(e, b"name").unwrap_or_default();
                    // r:id is namespace prefixed; match on the local name
                    let r_id = attr_string(e, b"id").unwrap_or_default();
                    if !name.is_empty() {
                        let path = relationships.get(&r_id).cloned().unwrap_or_else(|| {
                            format!("xl/worksheets/sheet{}.xml", info.sheets.len() + 1)
                        });
                        info.sheets.push(SheetInfo { name, path });
                    }
                }
                b"definedName" => {
                    let is_print_area =
                        attr_string(e, b"name").is_some_and(|n| n == "_xlnm.Print_Area");
                    print_area_for = if is_print_area {
                        attr_string(e, b"localSheetId").and_then(|v| v.parse().ok())
                    } else {
                        None
                    };
                }
                _ => {}
            },
            Event::Text(ref t) => {
                if let Some(sheet_idx) = print_area_for {
                    let text = t.unescape()?;
                    if let Some(range) = parse_print_area(&text) {
                        info.print_areas.insert(sheet_idx, range);
                    }
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"definedName" => {
                print_area_for = None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

/// Parse a defined-name target such as `'Calendar 2026'!$A$1:$AA$40`.
///
/// Only the first area of a multi-area name is kept.
pub(super) fn parse_print_area(target: &str) -> Option<CellRange> {
    let first = target.split(',').next()?;
    let (_, refs) = first.rsplit_once('!')?;
    let (start_row, start_col, end_row, end_col) = parse_cell_range(refs)?;
    Some(CellRange::new(start_row, start_col, end_row, end_col))
}

/// Parse the shared string table. Rich text runs are concatenated.
pub(super) fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Vec<String> {
    let sst_path = path.unwrap_or("xl/sharedStrings.xml");
    let Ok(file) = archive.by_name(sst_path) else {
        return Vec::new(); // SharedStrings is optional
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    strings
}
