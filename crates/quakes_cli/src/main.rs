//! Command-line host for the quake browser.
//!
//! # Responsibility
//! - Map subcommands onto `QuakeApp` queries, selection and toolbar commands.
//! - Load configuration and start logging before touching the store.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use quakes_core::db::{open_db, open_db_in_memory};
use quakes_core::{
    init_logging, parse_toolbar_command, toolbar_for_platform, AppConfig, CommandOutcome,
    DetailLayout, JsonFileFeed, Platform, QuakeApp, QuakeId, SortKey, SortOrder,
    SqliteQuakeRepository, ToolbarProvider,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "quakes", version, about = "Browse, search and generate earthquake records")]
struct Cli {
    /// JSON config file; missing files fall back to defaults.
    #[arg(long, env = "QUAKES_CONFIG", default_value = "quakes.json")]
    config: PathBuf,

    /// SQLite store path (overrides config).
    #[arg(long, env = "QUAKES_DB")]
    db: Option<PathBuf>,

    /// Absolute log directory (overrides config).
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Toolbar platform: desktop or compact (overrides config).
    #[arg(long, value_parser = parse_platform)]
    platform: Option<Platform>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List quakes matching a search.
    List {
        /// Case-insensitive substring of the location name.
        #[arg(long, default_value = "")]
        search: String,
        /// Only quakes on this UTC day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "time", value_parser = parse_sort_key)]
        sort: SortKey,
        #[arg(long, default_value = "desc", value_parser = parse_sort_order)]
        order: SortOrder,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Select a quake and print the detail pane.
    Show {
        code: String,
        /// Select through the map surface instead of the list.
        #[arg(long)]
        from_map: bool,
        /// Render the wide layout with location and date.
        #[arg(long)]
        wide: bool,
    },
    /// Generate random quakes into the store.
    AddRandom {
        /// Defaults to the configured batch size.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Delete one quake by code.
    Delete { code: String },
    /// Refresh the store from a GeoJSON feature collection.
    Refresh {
        /// Feature collection file (overrides config).
        #[arg(long)]
        feed: Option<PathBuf>,
    },
    /// Show toolbar commands for the active platform, or run one.
    Toolbar {
        #[arg(long)]
        run: Option<String>,
        /// Quake to select before running the command.
        #[arg(long)]
        select: Option<String>,
    },
    /// Print store-wide aggregates.
    Summary,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }
    if let Some(platform) = cli.platform {
        config.platform = Some(platform);
    }
    if let Command::Refresh { feed: Some(feed) } = &cli.command {
        config.feed_path = Some(feed.clone());
    }
    config.validate()?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    let platform = config.effective_platform();
    let mut app = QuakeApp::new(
        SqliteQuakeRepository::new(&conn),
        toolbar_for_platform(platform),
        config.random_batch_size,
    )?;
    if let Some(feed_path) = &config.feed_path {
        app = app.with_feed(Box::new(JsonFileFeed::new(feed_path)));
    }
    info!(
        "event=cli_start module=cli status=ok platform={} db={}",
        platform.as_str(),
        config
            .db_path
            .as_ref()
            .map_or_else(|| "memory".to_string(), |path| path.display().to_string())
    );

    match cli.command {
        Command::List {
            search,
            date,
            sort,
            order,
            limit,
        } => {
            app.set_search_text(search);
            app.set_search_date(date);
            app.set_sort(sort, order);
            let quakes = app.quakes()?;
            let shown = limit.unwrap_or(quakes.len());
            for quake in quakes.iter().take(shown) {
                println!(
                    "{}\t{:>4}\t{:<8}\t{}\t{}",
                    quake.code,
                    quake.magnitude_label(),
                    quake.magnitude_band().as_str(),
                    quake.time_rfc3339(),
                    quake.location.name
                );
            }
            println!(
                "{} of {} earthquakes ({})",
                shown.min(quakes.len()),
                app.summary().total,
                app.query().sort_label()
            );
        }
        Command::Show {
            code,
            from_map,
            wide,
        } => {
            let id = Some(QuakeId::new(code));
            if from_map {
                app.select_from_map(id);
            } else {
                app.select_from_list(id);
            }
            let layout = if wide {
                DetailLayout::Wide
            } else {
                DetailLayout::Compact
            };
            println!("{}", app.detail(layout)?);
        }
        Command::AddRandom { count } => {
            let count = count.unwrap_or(config.random_batch_size);
            let report = app.add_random(count)?;
            println!(
                "inserted {} random quakes ({} failed); store holds {}",
                report.inserted,
                report.failed,
                app.summary().total
            );
        }
        Command::Delete { code } => {
            app.delete(&QuakeId::new(code))?;
            println!("deleted; store holds {}", app.summary().total);
        }
        Command::Refresh { .. } => {
            let report = app.refresh()?;
            println!(
                "fetched {} quakes ({} skipped, {} stored, {} failed); store holds {}",
                report.fetched,
                report.skipped,
                report.stored.inserted,
                report.stored.failed,
                app.summary().total
            );
        }
        Command::Toolbar { run, select } => {
            if let Some(code) = select {
                app.select_from_list(Some(QuakeId::new(code)));
            }
            match run {
                Some(value) => {
                    let command = parse_toolbar_command(&value)?;
                    print_outcome(&app.run_command(command)?);
                }
                None => {
                    for command in app.toolbar().commands() {
                        println!("{}\t{}", command.as_str(), command.label());
                    }
                }
            }
        }
        Command::Summary => {
            let summary = app.recompute()?;
            println!("total: {}", summary.total);
            if let (Some(earliest), Some(latest)) = (summary.earliest, summary.latest) {
                println!("earliest: {}", earliest.to_rfc3339());
                println!("latest: {}", latest.to_rfc3339());
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Refreshed(report) => println!(
            "refreshed: fetched {} ({} skipped)",
            report.fetched, report.skipped
        ),
        CommandOutcome::Deleted(Some(id)) => println!("deleted {id}"),
        CommandOutcome::Deleted(None) => println!("nothing selected"),
        CommandOutcome::Sorted { key, order } => {
            println!("sort: {} {}", key.as_str(), order.as_str())
        }
        CommandOutcome::Added(report) => println!(
            "added {} random quakes ({} failed)",
            report.inserted, report.failed
        ),
    }
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    Platform::parse(value).ok_or_else(|| format!("unknown platform `{value}`"))
}

fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    SortKey::parse(value).ok_or_else(|| format!("unknown sort key `{value}`"))
}

fn parse_sort_order(value: &str) -> Result<SortOrder, String> {
    SortOrder::parse(value).ok_or_else(|| format!("unknown sort order `{value}`"))
}
