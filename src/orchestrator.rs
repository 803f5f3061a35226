//! Page orchestration: the single "create calendar" action.

use serde::Serialize;
use tracing::{debug, info};

use crate::calendar::page_surface_name;
use crate::error::Result;
use crate::format::{apply_print_formatting, format_page, FormatSettings, PrintSettings};
use crate::layout::layout_page;
use crate::notify::{success_notification, Notifier};
use crate::surface::{Document, Surface, SurfaceId};
use crate::types::{CalendarConfig, MONTHS_PER_PAGE};

/// First month of each generated page.
pub const PAGE_START_MONTHS: [u32; 2] = [0, MONTHS_PER_PAGE];

/// Names of the two calendar sheets for `year`, in page order.
pub fn surface_names(year: i32) -> [String; 2] {
    PAGE_START_MONTHS.map(|start_month| page_surface_name(year, start_month))
}

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOutcome {
    pub surface_name: String,
    #[serde(skip)]
    pub surface: SurfaceId,
    /// An existing sheet was cleared and rebuilt rather than inserted.
    pub reused: bool,
    pub months: Vec<String>,
    pub mutations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub year: i32,
    pub pages: Vec<PageOutcome>,
}

/// Generate both calendar pages into `doc` and report success through `notifier`.
///
/// Pages are produced one after the other; the first page's surface ends up
/// active. Any failure aborts immediately: mutations already applied stay on
/// the surface and no notification is sent.
pub fn generate_calendar<D, N>(
    doc: &mut D,
    notifier: &mut N,
    config: &CalendarConfig,
) -> Result<GenerationReport>
where
    D: Document + ?Sized,
    N: Notifier + ?Sized,
{
    config.validate()?;
    let names = surface_names(config.year);
    let format_settings = FormatSettings::default();
    let print_settings = PrintSettings::default();

    let mut pages = Vec::with_capacity(PAGE_START_MONTHS.len());
    for (name, start_month) in names.iter().zip(PAGE_START_MONTHS) {
        let page_config = config.with_start_month(start_month);
        let (id, reused) = doc.obtain_cleared_surface(name)?;
        debug!(sheet = %name, reused, "obtained calendar sheet");

        let page = layout_page(&page_config)?;
        let surface = doc.surface_mut(id)?;
        for mutation in &page.mutations {
            surface.apply(mutation)?;
        }
        format_page(surface, &page, &format_settings)?;
        apply_print_formatting(surface, &print_settings)?;

        pages.push(PageOutcome {
            surface_name: name.clone(),
            surface: id,
            reused,
            months: page.blocks.iter().map(|b| b.name.clone()).collect(),
            mutations: page.mutations.len(),
        });
    }

    if let Some(first) = pages.first() {
        doc.activate(first.surface)?;
    }

    info!(year = config.year, pages = pages.len(), "calendar generated");
    notifier.alert(&success_notification(config, &names))?;

    Ok(GenerationReport {
        year: config.year,
        pages,
    })
}
