//! XLSX export pipeline.
//!
//! A workbook built in memory is serialized into a fresh package: one
//! worksheet part per sheet, a generated style table, and print areas as
//! workbook defined names. A workbook loaded from a file is saved by
//! patching the package it came from, so parts the workbook model does not
//! describe survive untouched.

pub(crate) mod package;
pub(crate) mod sheet_writer;
pub(crate) mod styles_writer;
mod xml_patch;
mod zip_patcher;

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::types::Workbook;

/// Serialize a workbook to XLSX bytes.
pub fn write_xlsx(workbook: &Workbook) -> Result<Vec<u8>> {
    match workbook.source {
        Some(ref source) => zip_patcher::patch_package(source, workbook),
        None => package::write_package(workbook),
    }
}

/// Serialize a workbook and write it to `path`.
pub fn save_xlsx(workbook: &Workbook, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = write_xlsx(workbook)?;
    std::fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "workbook saved");
    Ok(())
}
