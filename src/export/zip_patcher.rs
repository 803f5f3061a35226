//! Save a workbook back into the XLSX package it was loaded from.
//!
//! Sheets that match what the package already holds, and every part the
//! workbook model does not cover, are copied via `raw_copy_file`. Changed
//! sheets are rewritten at their original paths and new sheets get new
//! parts. `workbook.xml`, its relationships, the content types and the
//! styles part are edited in place so nothing they already list is lost.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Seek, Write};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Result, WallcalError};
use crate::import::read_package;
use crate::types::{SourcePackage, Workbook};

use super::package::{print_area_name, NS_REL, STYLES_CONTENT_TYPE, WORKSHEET_CONTENT_TYPE};
use super::sheet_writer::{write_sheet_xml, xml_escape};
use super::styles_writer::{count_style_entries, patch_styles_xml, StyleBase, StyleTable};
use super::xml_patch::{
    attr_value, contains_bytes, insert_before_end, prefix_of, rewrite_xml, with_attribute,
    write_raw,
};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const DEFAULT_STYLES_PART: &str = "xl/styles.xml";

/// A worksheet part written by this save.
struct SheetPart {
    index: usize,
    path: String,
    /// The archive has no entry at `path` yet.
    missing: bool,
    /// Relationship id of a sheet the package does not list yet.
    new_rel: Option<String>,
}

/// A relationship appended to the workbook's relationships part.
struct NewRelationship {
    id: String,
    kind: &'static str,
    target: String,
}

/// Patch `source` so it holds `workbook`.
///
/// Sheets can be changed, renamed or appended; removing sheets that the
/// package lists is not supported.
pub(crate) fn patch_package(source: &SourcePackage, workbook: &Workbook) -> Result<Vec<u8>> {
    let original = read_package(source.bytes())?;
    if workbook.sheets.len() < original.workbook.sheets.len() {
        return Err(WallcalError::Package(format!(
            "workbook has {} sheets but its package lists {}",
            workbook.sheets.len(),
            original.workbook.sheets.len()
        )));
    }

    let mut archive = ZipArchive::new(Cursor::new(source.bytes()))?;
    let in_archive: HashSet<String> = archive.file_names().map(String::from).collect();
    let mut taken = in_archive.clone();

    let rels_xml = required_entry(&mut archive, WORKBOOK_RELS_PART)?;
    let mut next_rel = max_relationship_id(&rels_xml)?;

    // Decide, per sheet, whether its part is copied or written.
    let mut written: Vec<SheetPart> = Vec::new();
    let mut reselected: Vec<(String, bool)> = Vec::new();
    for (index, sheet) in workbook.sheets.iter().enumerate() {
        let before = original.workbook.sheets.get(index);
        match (before, original.sheet_paths.get(index)) {
            (Some(before), Some(path)) => {
                let missing = !in_archive.contains(path);
                if before == sheet && !missing {
                    let selected = index == workbook.active_sheet;
                    if selected != (index == original.workbook.active_sheet) {
                        reselected.push((path.clone(), selected));
                    }
                    continue;
                }
                written.push(SheetPart {
                    index,
                    path: path.clone(),
                    missing,
                    new_rel: None,
                });
            }
            _ => {
                let path = free_sheet_part(&taken);
                taken.insert(path.clone());
                next_rel = next_rel.saturating_add(1);
                written.push(SheetPart {
                    index,
                    path,
                    missing: true,
                    new_rel: Some(format!("rId{next_rel}")),
                });
            }
        }
    }

    let mut replaced: HashMap<String, Vec<u8>> = HashMap::new();
    let mut appended: Vec<(String, Vec<u8>)> = Vec::new();
    let mut new_rels: Vec<NewRelationship> = Vec::new();
    let mut new_overrides: Vec<(String, &'static str)> = Vec::new();

    if !written.is_empty() {
        let styles_part = original
            .styles_path
            .clone()
            .filter(|path| in_archive.contains(path));
        let (styles_xml, base) = match styles_part {
            Some(ref path) => {
                let xml = read_entry(&mut archive, path)?;
                let base = count_style_entries(&xml)?;
                (Some(xml), base)
            }
            None => (None, StyleBase::FRESH),
        };
        let styles = StyleTable::from_sheets(
            written.iter().filter_map(|part| workbook.sheets.get(part.index)),
            base,
        );

        match (styles_part, styles_xml) {
            (Some(path), Some(xml)) => {
                replaced.insert(path, patch_styles_xml(&xml, base, &styles.entries())?);
            }
            _ => {
                next_rel = next_rel.saturating_add(1);
                new_rels.push(NewRelationship {
                    id: format!("rId{next_rel}"),
                    kind: "styles",
                    target: relationship_target(DEFAULT_STYLES_PART),
                });
                new_overrides.push((DEFAULT_STYLES_PART.to_string(), STYLES_CONTENT_TYPE));
                put(&mut replaced, &mut appended, &in_archive, DEFAULT_STYLES_PART, styles.to_xml());
            }
        }

        for part in &written {
            let Some(sheet) = workbook.sheets.get(part.index) else {
                continue;
            };
            let xml = write_sheet_xml(sheet, &styles, part.index == workbook.active_sheet);
            put(&mut replaced, &mut appended, &in_archive, &part.path, xml);
            if part.missing {
                new_overrides.push((part.path.clone(), WORKSHEET_CONTENT_TYPE));
            }
            if let Some(ref id) = part.new_rel {
                new_rels.push(NewRelationship {
                    id: id.clone(),
                    kind: "worksheet",
                    target: relationship_target(&part.path),
                });
            }
        }
    }

    for (path, selected) in reselected {
        let xml = read_entry(&mut archive, &path)?;
        if contains_bytes(&xml, b"tabSelected=\"1\"") != selected {
            replaced.insert(path, set_tab_selected(&xml, selected)?);
        }
    }

    let workbook_xml = required_entry(&mut archive, WORKBOOK_PART)?;
    replaced.insert(
        WORKBOOK_PART.to_string(),
        patch_workbook_xml(&workbook_xml, workbook, &written)?,
    );

    if !new_rels.is_empty() {
        let xml = insert_before_end(&rels_xml, b"Relationships", |prefix| {
            new_rels
                .iter()
                .map(|rel| {
                    format!(
                        "<{prefix}Relationship Id=\"{}\" Type=\"{NS_REL}/{}\" Target=\"{}\"/>",
                        rel.id,
                        rel.kind,
                        xml_escape(&rel.target)
                    )
                })
                .collect()
        })?;
        replaced.insert(WORKBOOK_RELS_PART.to_string(), xml);
    }

    if !new_overrides.is_empty() {
        let types_xml = required_entry(&mut archive, CONTENT_TYPES_PART)?;
        let xml = insert_before_end(&types_xml, b"Types", |prefix| {
            new_overrides
                .iter()
                .map(|(path, content_type)| {
                    format!(
                        "<{prefix}Override PartName=\"/{}\" ContentType=\"{content_type}\"/>",
                        xml_escape(path)
                    )
                })
                .collect()
        })?;
        replaced.insert(CONTENT_TYPES_PART.to_string(), xml);
    }

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(source.bytes().len())));
    let mut copied = 0usize;
    for i in 0..archive.len() {
        let name = archive.by_index_raw(i)?.name().to_string();
        match replaced.remove(&name) {
            Some(body) => {
                writer.start_file(name, options)?;
                writer.write_all(&body)?;
            }
            None => {
                // Pass through unmodified entry (raw copy, no re-compression)
                writer.raw_copy_file(archive.by_index_raw(i)?)?;
                copied += 1;
            }
        }
    }
    for (name, body) in appended {
        writer.start_file(name, options)?;
        writer.write_all(&body)?;
    }

    debug!(
        copied,
        sheets_written = written.len(),
        "patched existing package"
    );
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Queue `body` for `path`, replacing the entry when the archive has one.
fn put(
    replaced: &mut HashMap<String, Vec<u8>>,
    appended: &mut Vec<(String, Vec<u8>)>,
    in_archive: &HashSet<String>,
    path: &str,
    body: String,
) {
    if in_archive.contains(path) {
        replaced.insert(path.to_string(), body.into_bytes());
    } else {
        appended.push((path.to_string(), body.into_bytes()));
    }
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    let mut file = archive.by_name(name)?;
    let mut body = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut body)?;
    Ok(body)
}

fn required_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    if !archive.file_names().any(|entry| entry == name) {
        return Err(WallcalError::Package(format!("package has no {name} part")));
    }
    read_entry(archive, name)
}

/// First `xl/worksheets/sheetN.xml` not used by the archive.
fn free_sheet_part(taken: &HashSet<String>) -> String {
    (1u32..)
        .map(|n| format!("xl/worksheets/sheet{n}.xml"))
        .find(|path| !taken.contains(path))
        .unwrap_or_default()
}

/// Target of a part as seen from `xl/workbook.xml`.
fn relationship_target(path: &str) -> String {
    match path.strip_prefix("xl/") {
        Some(relative) => relative.to_string(),
        None => format!("/{path}"),
    }
}

/// Highest numeric `rIdN` in a relationships part, 0 when there is none.
fn max_relationship_id(xml: &[u8]) -> Result<u32> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut max = 0u32;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_value(e, b"Id")
                    .and_then(|id| id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()));
                if let Some(id) = id {
                    max = max.max(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(max)
}

/// What the existing `workbook.xml` already holds.
#[derive(Debug, Default)]
struct WorkbookScan {
    max_sheet_id: u32,
    has_defined_names: bool,
    has_workbook_view: bool,
    /// Qualified name of the relationship attribute on `<sheet>`.
    rel_attr: Option<String>,
}

fn scan_workbook_xml(xml: &[u8]) -> Result<WorkbookScan> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut scan = WorkbookScan::default();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"workbookView" => scan.has_workbook_view = true,
                b"definedNames" => scan.has_defined_names = true,
                b"sheet" => {
                    if let Some(id) = attr_value(e, b"sheetId").and_then(|v| v.parse().ok()) {
                        scan.max_sheet_id = scan.max_sheet_id.max(id);
                    }
                    if scan.rel_attr.is_none() {
                        scan.rel_attr = e
                            .attributes()
                            .flatten()
                            .find(|attr| attr.key.local_name().as_ref() == b"id")
                            .map(|attr| String::from_utf8_lossy(attr.key.as_ref()).into_owned());
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(scan)
}

fn element(e: BytesStart<'_>, empty: bool) -> Event<'_> {
    if empty {
        Event::Empty(e)
    } else {
        Event::Start(e)
    }
}

/// Point `activeTab` at the active sheet, rename sheets, list new ones and
/// replace the print areas of every sheet written by this save.
fn patch_workbook_xml(xml: &[u8], workbook: &Workbook, written: &[SheetPart]) -> Result<Vec<u8>> {
    let scan = scan_workbook_xml(xml)?;
    let rel_attr = scan.rel_attr.clone().unwrap_or_else(|| "r:id".to_string());
    let active = workbook.active_sheet.to_string();
    let owned: HashSet<usize> = written.iter().map(|part| part.index).collect();
    let print_areas = |prefix: &str| -> String {
        written
            .iter()
            .filter_map(|part| {
                let sheet = workbook.sheets.get(part.index)?;
                print_area_name(part.index, sheet, prefix)
            })
            .collect()
    };

    let mut sheet_pos = 0usize;
    let mut skipping = false;
    let mut next_sheet_id = scan.max_sheet_id;

    rewrite_xml(xml, |writer, event| {
        let (e, empty) = match event {
            Event::Start(e) => (e, false),
            Event::Empty(e) => (e, true),
            Event::End(e) => {
                if skipping {
                    skipping = e.local_name().as_ref() != b"definedName";
                    return Ok(());
                }
                let local = e.local_name().as_ref().to_vec();
                let prefix = prefix_of(e.name().as_ref());
                match local.as_slice() {
                    b"sheets" => {
                        for part in written {
                            let (Some(id), Some(sheet)) =
                                (part.new_rel.as_ref(), workbook.sheets.get(part.index))
                            else {
                                continue;
                            };
                            next_sheet_id = next_sheet_id.saturating_add(1);
                            write_raw(
                                writer,
                                &format!(
                                    "<{prefix}sheet name=\"{}\" sheetId=\"{next_sheet_id}\" {rel_attr}=\"{id}\"/>",
                                    xml_escape(&sheet.name)
                                ),
                            );
                        }
                        writer.write_event(Event::End(e))?;
                        let names = print_areas(&prefix);
                        if !scan.has_defined_names && !names.is_empty() {
                            write_raw(
                                writer,
                                &format!("<{prefix}definedNames>{names}</{prefix}definedNames>"),
                            );
                        }
                    }
                    b"definedNames" => {
                        write_raw(writer, &print_areas(&prefix));
                        writer.write_event(Event::End(e))?;
                    }
                    _ => writer.write_event(Event::End(e))?,
                }
                return Ok(());
            }
            other => {
                if !skipping {
                    writer.write_event(other)?;
                }
                return Ok(());
            }
        };
        if skipping {
            return Ok(());
        }

        let local = e.local_name().as_ref().to_vec();
        match local.as_slice() {
            b"workbookView" => {
                writer.write_event(element(with_attribute(&e, "activeTab", &active), empty))?;
            }
            b"sheets" if !scan.has_workbook_view && workbook.active_sheet != 0 => {
                let p = prefix_of(e.name().as_ref());
                write_raw(
                    writer,
                    &format!("<{p}bookViews><{p}workbookView activeTab=\"{active}\"/></{p}bookViews>"),
                );
                writer.write_event(element(e, empty))?;
            }
            b"sheet" => {
                let renamed = workbook
                    .sheets
                    .get(sheet_pos)
                    .filter(|sheet| attr_value(&e, b"name").as_deref() != Some(sheet.name.as_str()));
                sheet_pos += 1;
                match renamed {
                    Some(sheet) => {
                        writer.write_event(element(with_attribute(&e, "name", &sheet.name), empty))?;
                    }
                    None => writer.write_event(element(e, empty))?,
                }
            }
            b"definedNames" if empty => {
                let p = prefix_of(e.name().as_ref());
                let names = print_areas(&p);
                if names.is_empty() {
                    writer.write_event(element(e, empty))?;
                } else {
                    writer.write_event(Event::Start(e))?;
                    write_raw(writer, &format!("{names}</{p}definedNames>"));
                }
            }
            b"definedName" if is_owned_print_area(&e, &owned) => {
                skipping = !empty;
            }
            _ => writer.write_event(element(e, empty))?,
        }
        Ok(())
    })
}

fn is_owned_print_area(e: &BytesStart<'_>, owned: &HashSet<usize>) -> bool {
    attr_value(e, b"name").is_some_and(|name| name == "_xlnm.Print_Area")
        && attr_value(e, b"localSheetId")
            .and_then(|id| id.parse::<usize>().ok())
            .is_some_and(|id| owned.contains(&id))
}

/// Set `tabSelected` on every sheet view of a copied worksheet part.
fn set_tab_selected(xml: &[u8], selected: bool) -> Result<Vec<u8>> {
    let value = if selected { "1" } else { "0" };
    rewrite_xml(xml, |writer, event| {
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"sheetView" => {
                writer.write_event(Event::Start(with_attribute(&e, "tabSelected", value)))?;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"sheetView" => {
                writer.write_event(Event::Empty(with_attribute(&e, "tabSelected", value)))?;
            }
            other => writer.write_event(other)?,
        }
        Ok(())
    })
}
