//! The "Calendar Tools" host menu and its two actions.

use crate::error::Result;
use crate::notify::{about_notification, Notifier};
use crate::orchestrator::{generate_calendar, GenerationReport};
use crate::surface::Document;
use crate::types::CalendarConfig;

pub const MENU_TITLE: &str = "📅 Calendar Tools";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CreateCalendar,
    About,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item { label: String, action: MenuAction },
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    /// Action bound to the item with this label.
    pub fn action_for(&self, label: &str) -> Option<MenuAction> {
        self.entries.iter().find_map(|entry| match entry {
            MenuEntry::Item { label: l, action } if l == label => Some(*action),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Item { label, .. } => Some(label.as_str()),
            MenuEntry::Separator => None,
        })
    }
}

pub fn calendar_menu(config: &CalendarConfig) -> Menu {
    Menu {
        title: MENU_TITLE.to_string(),
        entries: vec![
            MenuEntry::Item {
                label: format!("Create Calendar {}", config.year),
                action: MenuAction::CreateCalendar,
            },
            MenuEntry::Separator,
            MenuEntry::Item {
                label: "About".to_string(),
                action: MenuAction::About,
            },
        ],
    }
}

/// Run a menu action. Only `CreateCalendar` produces a report.
pub fn dispatch<D, N>(
    action: MenuAction,
    doc: &mut D,
    notifier: &mut N,
    config: &CalendarConfig,
) -> Result<Option<GenerationReport>>
where
    D: Document + ?Sized,
    N: Notifier + ?Sized,
{
    match action {
        MenuAction::CreateCalendar => generate_calendar(doc, notifier, config).map(Some),
        MenuAction::About => {
            notifier.alert(&about_notification(config))?;
            Ok(None)
        }
    }
}
