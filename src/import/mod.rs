//! XLSX import.
//!
//! Loads an existing workbook so a calendar can be regenerated into it. The
//! model holds values, the calendar style subset, merges, sizes, print areas
//! and the active tab; the original bytes are kept alongside so that saving
//! copies everything else through unchanged.

mod relationships;
mod styles;
mod worksheet;

use std::io::{BufReader, Cursor};
use std::path::Path;

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::Result;
use crate::types::{Sheet, SourcePackage, Workbook};

use relationships::{parse_shared_strings, parse_workbook_info, parse_workbook_relationships};
use styles::parse_cell_styles;
use worksheet::parse_sheet;

/// A parsed package plus where its parts live.
pub(crate) struct LoadedPackage {
    pub workbook: Workbook,
    /// Worksheet part of each sheet, in sheet order.
    pub sheet_paths: Vec<String>,
    pub styles_path: Option<String>,
}

/// Parse XLSX bytes into a [`Workbook`] that remembers its source package.
pub fn read_xlsx(data: &[u8]) -> Result<Workbook> {
    let mut workbook = read_package(data)?.workbook;
    workbook.source = Some(SourcePackage::new(data));
    Ok(workbook)
}

pub(crate) fn read_package(data: &[u8]) -> Result<LoadedPackage> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let rels = parse_workbook_relationships(&mut archive);
    let shared_strings = parse_shared_strings(&mut archive, rels.shared_strings.as_deref());

    let styles_path = rels.styles.as_deref().unwrap_or("xl/styles.xml");
    let cell_styles = match archive.by_name(styles_path) {
        Ok(file) => parse_cell_styles(BufReader::new(file))?,
        Err(_) => Vec::new(), // Styles are optional
    };

    let info = parse_workbook_info(&mut archive, &rels.worksheets)?;
    let mut workbook = Workbook::new();
    for (idx, sheet_info) in info.sheets.iter().enumerate() {
        let mut sheet = match archive.by_name(&sheet_info.path) {
            Ok(file) => parse_sheet(
                BufReader::new(file),
                &sheet_info.name,
                &shared_strings,
                &cell_styles,
            )?,
            Err(_) => {
                warn!(sheet = %sheet_info.name, path = %sheet_info.path, "worksheet part missing");
                Sheet::new(sheet_info.name.as_str())
            }
        };
        sheet.print_area = info.print_areas.get(&idx).copied();
        debug!(sheet = %sheet.name, cells = sheet.cells.len(), "worksheet loaded");
        workbook.sheets.push(sheet);
    }

    workbook.active_sheet = if info.active_tab < workbook.sheets.len() {
        info.active_tab
    } else {
        0
    };
    Ok(LoadedPackage {
        workbook,
        sheet_paths: info.sheets.into_iter().map(|s| s.path).collect(),
        styles_path: rels.styles,
    })
}

/// Read and parse an XLSX file from disk.
pub fn load_xlsx(path: impl AsRef<Path>) -> Result<Workbook> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let workbook = read_xlsx(&bytes)?;
    info!(path = %path.display(), sheets = workbook.sheets.len(), "workbook loaded");
    Ok(workbook)
}
