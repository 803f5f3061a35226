//! wallcal - printable yearly wall calendars for spreadsheets
//!
//! Lays out a year as two pages of six months each (a 2x3 grid of month
//! blocks per page) and renders them onto spreadsheet sheets:
//! - Month blocks with a merged title, day-initial header and six week rows
//! - Two spacing variants (compact and airy)
//! - Role-based row/column sizing plus an A4 print pass
//! - Idempotent regeneration into an existing workbook
//! - XLSX load/save
//!
//! # Usage
//!
//! ```no_run
//! use wallcal::{generate_calendar, export, CalendarConfig, RecordingNotifier, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let mut notifier = RecordingNotifier::new();
//! generate_calendar(&mut workbook, &mut notifier, &CalendarConfig::default())?;
//! export::save_xlsx(&workbook, "calendar-2026.xlsx")?;
//! # Ok::<(), wallcal::WallcalError>(())
//! ```

pub mod calendar;
pub mod cell_ref;
pub mod error;
pub mod export;
pub mod format;
pub mod import;
pub mod layout;
pub mod menu;
pub mod notify;
pub mod orchestrator;
pub mod surface;
pub mod types;
pub mod units;

pub use calendar::MonthCalendar;
pub use error::{Result, WallcalError};
pub use format::{apply_print_formatting, format_page, FormatSettings, PrintSettings};
pub use layout::{layout_page, PageGeometry};
pub use menu::{calendar_menu, dispatch, Menu, MenuAction, MenuEntry};
pub use notify::{ConsoleNotifier, Notification, Notifier, RecordingNotifier};
pub use orchestrator::{generate_calendar, surface_names, GenerationReport, PageOutcome};
pub use surface::{Document, Surface, SurfaceId};
pub use types::*;

/// Crate version, as reported by the CLI's about box.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
