//! CLI for wallcal - generates a two-page wall calendar workbook
//!
//! Usage:
//!   wallcal_cli                               # calendar-2026.xlsx, compact spacing
//!   wallcal_cli --year 2027 --variant airy    # pick year and spacing
//!   wallcal_cli --config cal.json -o out.xlsx # settings from JSON, into an existing file
//!   wallcal_cli --layout-json                 # print both page layouts as JSON
//!   wallcal_cli --menu | --about              # show the host menu / about box
//!
//! Log verbosity follows `RUST_LOG` (default `wallcal=info`). Logs go to stderr.

#![allow(clippy::exit)]

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wallcal::export::save_xlsx;
use wallcal::import::load_xlsx;
use wallcal::menu::{calendar_menu, dispatch, MenuAction, MenuEntry};
use wallcal::orchestrator::PAGE_START_MONTHS;
use wallcal::{
    layout_page, CalendarConfig, ConsoleNotifier, Result, SpacingVariant, WallcalError, Workbook,
};

const USAGE: &str = "Usage: wallcal_cli [--year N] [--variant compact|airy] [--config FILE.json] \
                     [--about] [--menu] [--layout-json] [-o OUT.xlsx]";

#[derive(Debug, Default)]
struct CliArgs {
    year: Option<i32>,
    variant: Option<SpacingVariant>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    about: bool,
    menu: bool,
    layout_json: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| WallcalError::Config(format!("{arg} needs a value")))
        };
        match arg.as_str() {
            "--year" => {
                let raw = value()?;
                let year = raw
                    .parse()
                    .map_err(|_| WallcalError::Config(format!("invalid year '{raw}'")))?;
                parsed.year = Some(year);
            }
            "--variant" => parsed.variant = Some(value()?.parse()?),
            "--config" => parsed.config = Some(PathBuf::from(value()?)),
            "-o" | "--output" => parsed.output = Some(PathBuf::from(value()?)),
            "--about" => parsed.about = true,
            "--menu" => parsed.menu = true,
            "--layout-json" => parsed.layout_json = true,
            other => return Err(WallcalError::Config(format!("unknown argument '{other}'"))),
        }
    }
    Ok(parsed)
}

fn build_config(args: &CliArgs) -> Result<CalendarConfig> {
    let mut config = match &args.config {
        Some(path) => CalendarConfig::load(path)?,
        None => CalendarConfig::default(),
    };
    if let Some(year) = args.year {
        config = config.with_year(year);
    }
    if let Some(variant) = args.variant {
        config = config.with_variant(variant);
    }
    config.validate()?;
    Ok(config)
}

fn open_workbook(path: &Path) -> Result<Workbook> {
    if path.exists() {
        load_xlsx(path)
    } else {
        Ok(Workbook::new())
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = build_config(args)?;
    let mut notifier = ConsoleNotifier::new(io::stdout());

    if args.menu {
        let menu = calendar_menu(&config);
        println!("{}", menu.title);
        for entry in &menu.entries {
            match entry {
                MenuEntry::Item { label, .. } => println!("  {label}"),
                MenuEntry::Separator => println!("  ----"),
            }
        }
        return Ok(());
    }

    if args.about {
        let mut workbook = Workbook::new();
        dispatch(MenuAction::About, &mut workbook, &mut notifier, &config)?;
        return Ok(());
    }

    if args.layout_json {
        let pages = PAGE_START_MONTHS
            .iter()
            .map(|&start| layout_page(&config.with_start_month(start)))
            .collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("calendar-{}.xlsx", config.year)));
    let mut workbook = open_workbook(&output)?;
    dispatch(MenuAction::CreateCalendar, &mut workbook, &mut notifier, &config)?;
    save_xlsx(&workbook, &output)?;
    eprintln!("Written: {}", output.display());
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wallcal=info,wallcal_cli=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    info!(version = wallcal::version(), "wallcal starting");
    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
