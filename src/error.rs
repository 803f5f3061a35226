//! Structured error types for wallcal.
//!
//! Every fallible operation in the crate returns [`Result`]; failures abort
//! the whole generation and propagate to the caller unchanged.

/// All errors that can occur while laying out, applying, or saving a calendar.
#[derive(Debug, thiserror::Error)]
pub enum WallcalError {
    /// A (year, month) pair that has no day 1 on the Gregorian calendar.
    #[error("Invalid date: year {year}, month index {month_index}")]
    InvalidDate { year: i32, month_index: u32 },

    /// Rejected configuration values.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The target surface is missing or could not be mutated.
    #[error("Surface error: {0}")]
    Surface(String),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A package part is missing or not shaped the way SpreadsheetML requires.
    #[error("Invalid package: {0}")]
    Package(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WallcalError>;
