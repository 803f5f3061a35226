//! Layout tests: where months, weekdays and days land on a generated page.
//!
//! Geometry per spacing variant:
//! - compact (1 row between weeks, 2 between month rows): blocks are 14 rows
//!   tall, the second block row starts at row 17
//! - airy (2 and 4): blocks are 19 rows tall, the second block row starts at 24
//!
//! Block columns start at 1, 10 and 19; two spacer columns follow each of
//! the first two blocks.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use chrono::{Datelike, NaiveDate};
use common::{assert_integer, assert_text, day_numbers, generate};
use test_case::test_case;
use wallcal::orchestrator::PAGE_START_MONTHS;
use wallcal::{
    layout_page, surface_names, CalendarConfig, CellRange, CellValue, ColRole, Fill, PageGeometry,
    RowRole, SpacingVariant, WallcalError,
};

// ============================================================================
// GEOMETRY
// ============================================================================

#[test_case(SpacingVariant::Compact, 14, 17, 30; "compact")]
#[test_case(SpacingVariant::Airy, 19, 24, 42; "airy")]
fn block_geometry(variant: SpacingVariant, height: u32, second_row: u32, page_height: u32) {
    let geometry = PageGeometry::new(&CalendarConfig::new(2026, variant));
    assert_eq!(geometry.block_height(), height);
    assert_eq!(geometry.anchor_row(1), second_row);
    assert_eq!(geometry.page_height(), page_height);
    assert_eq!(
        [0, 1, 2].map(PageGeometry::anchor_col),
        [1, 10, 19],
        "block columns"
    );
}

#[test_case(SpacingVariant::Compact; "compact")]
#[test_case(SpacingVariant::Airy; "airy")]
fn blocks_never_overlap(variant: SpacingVariant) {
    let page = layout_page(&CalendarConfig::new(2026, variant)).unwrap();
    let areas: Vec<CellRange> = page.blocks.iter().map(|b| b.occupied()).collect();
    for (i, a) in areas.iter().enumerate() {
        for b in areas.iter().skip(i + 1) {
            assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn page_fits_27_columns() {
    let page = layout_page(&CalendarConfig::default()).unwrap();
    assert_eq!(page.last_col(), 27);
    assert_eq!(page.col_role(8), Some(ColRole::Spacer));
    assert_eq!(page.col_role(9), Some(ColRole::Spacer));
    assert_eq!(page.col_role(10), Some(ColRole::Day));
    assert_eq!(page.col_role(26), Some(ColRole::Spacer));
}

#[test]
fn row_roles_follow_the_block_structure() {
    let page = layout_page(&CalendarConfig::default()).unwrap();
    assert_eq!(page.row_role(1), Some(RowRole::Title));
    assert_eq!(page.row_role(2), Some(RowRole::Header));
    assert_eq!(page.row_role(3), Some(RowRole::HeaderSpacer));
    assert_eq!(page.row_role(4), Some(RowRole::Week));
    assert_eq!(page.row_role(5), Some(RowRole::WeekSpacer));
    assert_eq!(page.row_role(14), Some(RowRole::Week));
    assert_eq!(page.row_role(15), Some(RowRole::MonthSpacer));
    assert_eq!(page.row_role(16), Some(RowRole::MonthSpacer));
    assert_eq!(page.row_role(17), Some(RowRole::Title));
    assert_eq!(page.row_role(30), Some(RowRole::Week));
    assert_eq!(page.row_role(31), None);
}

// ============================================================================
// DAYS
// ============================================================================

#[test_case(SpacingVariant::Compact; "compact")]
#[test_case(SpacingVariant::Airy; "airy")]
fn every_month_lists_each_day_once(variant: SpacingVariant) {
    let (workbook, _, report) = generate(&CalendarConfig::new(2026, variant));
    for (page, outcome) in report.pages.iter().enumerate() {
        let sheet = workbook.sheet(&outcome.surface_name).unwrap();
        let layout = layout_page(
            &CalendarConfig::new(2026, variant)
                .with_start_month(wallcal::orchestrator::PAGE_START_MONTHS[page]),
        )
        .unwrap();
        for block in &layout.blocks {
            let expected: Vec<i64> = (1..=i64::from(block.days_in_month)).collect();
            assert_eq!(day_numbers(sheet, block), expected, "{}", block.name);
        }
    }
}

#[test_case(SpacingVariant::Compact; "compact")]
#[test_case(SpacingVariant::Airy; "airy")]
fn first_day_sits_under_its_weekday(variant: SpacingVariant) {
    let config = CalendarConfig::new(2026, variant);
    let (workbook, _, _) = generate(&config);

    for (name, start_month) in surface_names(2026).iter().zip(PAGE_START_MONTHS) {
        let page = layout_page(&config.with_start_month(start_month)).unwrap();
        let sheet = workbook.sheet(name).unwrap();
        assert_eq!(page.blocks.len(), 6, "{name}");

        for block in &page.blocks {
            let first = NaiveDate::from_ymd_opt(2026, block.month_index + 1, 1).unwrap();
            assert_eq!(
                block.starting_weekday,
                first.weekday().num_days_from_sunday(),
                "{}",
                block.name
            );

            let first_week = (block.anchor_row..)
                .find(|&row| page.row_role(row) == Some(RowRole::Week))
                .unwrap();
            let offset = (0..7)
                .find(|&offset| {
                    !matches!(
                        sheet.value_at(first_week, block.anchor_col + offset),
                        None | Some(CellValue::Empty)
                    )
                })
                .unwrap();
            assert_eq!(offset, block.starting_weekday, "{} on {name}", block.name);
            assert_integer(sheet, first_week, block.anchor_col + offset, 1);
        }
    }
}

#[test]
fn february_2026_leaves_two_blank_week_rows() {
    let (workbook, _, _) = generate(&CalendarConfig::default());
    let sheet = workbook.sheet("Calendar 2026").unwrap();
    // February is block (0, 1); week rows are 4, 6, .., 14
    assert_integer(sheet, 10, 16, 28);
    for row in [12, 14] {
        for col in 10..=16 {
            assert_eq!(sheet.value_at(row, col), Some(&CellValue::Empty), "row {row}");
        }
    }
}

#[test]
fn leap_february_has_29_days() {
    let page = layout_page(&CalendarConfig::new(2024, SpacingVariant::Compact)).unwrap();
    let feb = page.block_for_month(1).unwrap();
    assert_eq!(feb.days_in_month, 29);
    assert_eq!(feb.starting_weekday, 4);
}

// ============================================================================
// STYLING
// ============================================================================

#[test]
fn header_and_title_bands() {
    let (workbook, _, _) = generate(&CalendarConfig::default());
    let sheet = workbook.sheet("Calendar 2026").unwrap();

    assert_text(sheet, 1, 10, "February 2026");
    assert_eq!(sheet.merge_at(1, 16), Some(&CellRange::new(1, 10, 1, 16)));
    let title = sheet.cell(1, 10).unwrap().style;
    assert!(title.bold);
    assert_eq!(title.fill, Fill::LightBlue);

    for (col, initial) in (19..).zip(["S", "M", "T", "W", "T", "F", "S"]) {
        assert_text(sheet, 18, col, initial);
        let style = sheet.cell(18, col).unwrap().style;
        assert!(style.bold);
        assert_eq!(style.fill, Fill::Gray);
    }
}

#[test]
fn every_calendar_cell_uses_font_14() {
    let (workbook, _, _) = generate(&CalendarConfig::default());
    let sheet = workbook.sheet("Calendar 2026").unwrap();
    assert!(sheet.cells.values().all(|c| c.style.font_size == 14));
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn page_running_past_december_is_an_invalid_date() {
    let config = CalendarConfig::default().with_start_month(9);
    match layout_page(&config) {
        Err(WallcalError::InvalidDate { year, month_index }) => {
            assert_eq!((year, month_index), (2026, 12));
        }
        other => panic!("expected InvalidDate, got {other:?}"),
    }
}
