use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dialoguer::MultiSelect;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use timetabler::catalog::{self, models::{Catalog, CatalogEntry}};
use timetabler::config::Config;
use timetabler::filter::SearchOptions;
use timetabler::schedule::{self, models::Day};
use timetabler::search::{ResultWindow, SearchEngine};
use timetabler::timetable::{self, TimetableCollection, FIRST_TABLE};

const DISCLAIMER: &str = "(select with SPACE, ENTER to confirm)";

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Config file, defaults to ./timetabler.toml when it exists
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog source (URL or file), replaces the configured ones
    #[clap(short, long, value_name = "URL OR PATH")]
    source: Vec<String>,

    /// Part of the course's name or code
    #[clap(short, long)]
    query: Option<String>,

    /// Year of study, can be repeated
    #[clap(short, long = "grade", value_name = "GRADE")]
    grades: Vec<u32>,

    /// Day of the week (월, 화, ...), can be repeated
    #[clap(short, long = "day", value_name = "DAY")]
    days: Vec<Day>,

    /// Period of the day, starting at 1, can be repeated
    #[clap(short, long = "period", value_name = "PERIOD")]
    periods: Vec<u32>,

    /// Major, can be repeated
    #[clap(short, long = "major", value_name = "MAJOR")]
    majors: Vec<String>,

    /// Number of credits
    #[clap(long)]
    credits: Option<u32>,

    /// Number of results to show, default to the configured page size
    #[clap(short, long)]
    limit: Option<usize>,

    /// Pick courses among the results and show the timetable
    #[clap(long)]
    pick: bool,

    /// Width of a day in the printed timetable
    #[clap(long, default_value_t = 12)]
    cell_length: usize,
}

impl Args {
    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            query: self.query.clone(),
            grades: self.grades.iter().copied().collect(),
            days: self.days.iter().copied().collect(),
            periods: self.periods.iter().copied().collect(),
            majors: self.majors.iter().cloned().collect::<BTreeSet<_>>(),
            credits: self.credits,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log level from RUST_LOG, info by default
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|level| level.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if !args.source.is_empty() {
        config.catalog.sources.clone_from(&args.source);
    }

    // The search starts right away, the catalog joins it once fetched
    let options = args.search_options();
    let engine = SearchEngine::spawn(
        Catalog::from(Vec::new()),
        options.clone(),
        config.search.chunk_size,
    );

    println!("Fetching the catalog...");
    let catalog = catalog::load(&config.catalog).await;
    let catalog_len = catalog.len();
    engine.set_catalog(catalog);

    let results = engine
        .wait_for(&options)
        .await
        .context("search stopped before publishing results")?;
    println!("{} course(s) found out of {catalog_len}", results.courses.len());

    let window = ResultWindow::new(args.limit.unwrap_or(config.search.page_size));
    let shown = window.window(&results.courses);
    for entry in shown {
        println!("{}", describe(entry));
    }
    if shown.len() < results.courses.len() {
        println!("... and {} more", results.courses.len() - shown.len());
    }

    if !args.pick {
        return Ok(());
    }
    if shown.is_empty() {
        println!("Nothing to pick from.");
        return Ok(());
    }

    let mut tables = TimetableCollection::new();
    pick(&mut tables, shown)?;

    println!("Displaying...");
    let sessions = tables.get(FIRST_TABLE).unwrap_or_else(|| Vec::new().into());
    timetable::display(&sessions, config.grid.periods, args.cell_length);

    Ok(())
}

/// Add the chosen courses to the first table, warning about overlaps
fn pick(tables: &mut TimetableCollection, entries: &[Arc<CatalogEntry>]) -> anyhow::Result<()> {
    let items: Vec<String> = entries.iter().map(|entry| describe(entry)).collect();
    let selections = MultiSelect::new()
        .with_prompt(format!("Pick your courses {DISCLAIMER}"))
        .items(&items[..])
        .interact()?;

    for i in selections {
        let entry = &entries[i];
        let course = &entry.course;

        let clashes = tables.conflicts(FIRST_TABLE, course);
        if !clashes.is_empty() {
            let with: Vec<_> = clashes
                .iter()
                .map(|session| format!("{} ({}{})", session.course.title, session.day, session.start()))
                .collect();
            println!("Warning: {} overlaps {}", course.title, with.join(", "));
        }

        if entry.blocks.is_empty() {
            tracing::warn!(course = %course.id, "course has no readable schedule, skipped");
            continue;
        }
        tables.append_sessions(FIRST_TABLE, entry.blocks.clone(), course);
    }

    Ok(())
}

/// One line summary of a course
fn describe(entry: &CatalogEntry) -> String {
    let course = &entry.course;
    format!(
        "{} - {} ({}, grade {}) {} [{}]",
        course.id,
        course.title,
        course.credits,
        course.grade,
        course.major_label(),
        schedule::format(&entry.blocks)
    )
}
