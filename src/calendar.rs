//! Calendar arithmetic on the proleptic Gregorian calendar.
//!
//! Months are 0-based (0 = January) and weekdays count from Sunday = 0,
//! matching the column order of the day-initial header.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, WallcalError};
use crate::types::MONTHS_PER_PAGE;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Header initials, Sunday first.
pub const DAY_INITIALS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

pub fn month_name(month_index: u32) -> Option<&'static str> {
    usize::try_from(month_index)
        .ok()
        .and_then(|i| MONTH_NAMES.get(i))
        .copied()
}

/// Sheet name for the page starting at `start_month`: `"Calendar 2026"`
/// for January, `"Calendar 2026 (Jul-Dec)"` for July.
pub fn page_surface_name(year: i32, start_month: u32) -> String {
    if start_month == 0 {
        return format!("Calendar {year}");
    }
    let short = |month: u32| month_name(month).and_then(|name| name.get(..3)).unwrap_or("?");
    let last = start_month.saturating_add(MONTHS_PER_PAGE - 1);
    format!("Calendar {year} ({}-{})", short(start_month), short(last))
}

fn first_of_month(year: i32, month_index: u32) -> Result<NaiveDate> {
    month_index
        .checked_add(1)
        .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .ok_or(WallcalError::InvalidDate { year, month_index })
}

/// Weekday of the 1st of the month, 0 = Sunday .. 6 = Saturday.
pub fn starting_weekday(year: i32, month_index: u32) -> Result<u32> {
    Ok(first_of_month(year, month_index)?
        .weekday()
        .num_days_from_sunday())
}

/// Number of days in the month: the day before the 1st of the next month.
pub fn days_in_month(year: i32, month_index: u32) -> Result<u32> {
    let first = first_of_month(year, month_index)?;
    let next = if month_index == 11 {
        year.checked_add(1)
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
    } else {
        first.with_month(month_index + 2)
    };
    next.and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .ok_or(WallcalError::InvalidDate { year, month_index })
}

/// The facts about one month the layout engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCalendar {
    pub year: i32,
    pub month_index: u32,
    pub name: &'static str,
    pub starting_weekday: u32,
    pub days_in_month: u32,
}

impl MonthCalendar {
    pub fn new(year: i32, month_index: u32) -> Result<Self> {
        let name =
            month_name(month_index).ok_or(WallcalError::InvalidDate { year, month_index })?;
        Ok(Self {
            year,
            month_index,
            name,
            starting_weekday: starting_weekday(year, month_index)?,
            days_in_month: days_in_month(year, month_index)?,
        })
    }

    /// `"<MonthName> <year>"`
    pub fn title(&self) -> String {
        format!("{} {}", self.name, self.year)
    }
}
