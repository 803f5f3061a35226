//! User-facing notifications.
//!
//! A notification is a modal, single-button dialog: [`Notifier::alert`]
//! returns once it has been acknowledged.

use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::types::{CalendarConfig, CALENDAR_FONT_SIZE, GRID_COLS, GRID_ROWS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Sink for blocking acknowledgement dialogs.
pub trait Notifier {
    fn alert(&mut self, notification: &Notification) -> Result<()>;
}

/// Collects notifications instead of showing them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub received: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&mut self, notification: &Notification) -> Result<()> {
        self.received.push(notification.clone());
        Ok(())
    }
}

/// Renders the dialog as text on a writer.
pub struct ConsoleNotifier<W: Write> {
    out: W,
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn alert(&mut self, notification: &Notification) -> Result<()> {
        info!(title = %notification.title, "notification");
        writeln!(self.out, "{}", notification.title)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", notification.message)?;
        writeln!(self.out)?;
        writeln!(self.out, "[ OK ]")?;
        self.out.flush()?;
        Ok(())
    }
}

fn rows_phrase(count: u32) -> String {
    match count {
        0 => "No empty rows".to_string(),
        1 => "1 empty row".to_string(),
        n => format!("{n} empty rows"),
    }
}

/// Dialog shown after both pages have been generated.
pub fn success_notification(config: &CalendarConfig, sheet_names: &[String]) -> Notification {
    let mut message = String::from("Your calendar has been created in:\n");
    let ranges = ["Jan-Jun", "Jul-Dec"];
    for (name, range) in sheet_names.iter().zip(ranges) {
        message.push_str(&format!("• \"{name}\" sheet ({range})\n"));
    }
    message.push_str(&format!(
        "\nLayout: {GRID_ROWS} rows × {GRID_COLS} columns\n\
         • 2 column spaces between months\n\
         • {} between each week\n\
         • {} between month rows\n\
         • Font size {CALENDAR_FONT_SIZE}\n\
         • No borders - clean and simple!\n\
         Ready to print on 2 A4 pages!",
        rows_phrase(config.spacer_rows_after_week),
        rows_phrase(config.spacer_rows_after_month_block),
    ));
    Notification {
        title: format!("✅ Calendar {} Created!", config.year),
        message,
    }
}

/// Static description shown by the "About" menu item.
pub fn about_notification(config: &CalendarConfig) -> Notification {
    let year = config.year;
    Notification {
        title: format!("📅 Calendar {year}"),
        message: format!(
            "This tool creates a simple {year} calendar:\n\n\
             • Page 1: January - June {year}\n\
             • Page 2: July - December {year}\n\
             • Layout: {GRID_ROWS} rows × {GRID_COLS} columns\n\
             • 2 column spaces between months\n\
             • {} between each week\n\
             • Font size {CALENDAR_FONT_SIZE}\n\
             • No borders - clean and minimal\n\
             • Month names in bold with light blue background\n\
             • Day initials in bold with gray background\n\
             • Plain day numbers\n\
             • Optimized for A4 printing\n\n\
             Created by: Simple Calendar Generator",
            rows_phrase(config.spacer_rows_after_week),
        ),
    }
}
