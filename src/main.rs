use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use mqh::config::DashboardConfig;
use mqh::data::loader::list_csv_files;
use mqh::data::model::parse_user_date;
use mqh::forecast::{load_anomalies, ForecastTable};
use mqh::pipeline::{combined_span, summarize, year_view};
use mqh::report::{render_file_summary, render_year_view};
use mqh::DateWindow;

#[derive(Parser, Debug)]
#[command(name = "mqh", version, about = "Windowed summaries of wide multi-year CSV series")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the CSV datasets in the data directory
    Files {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Reshape and summarize one or more files over a date window
    Compare {
        /// Files to compare (default: every CSV in the data directory)
        files: Vec<PathBuf>,
        #[arg(long, value_parser = parse_user_date)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_user_date)]
        end: Option<NaiveDate>,
    },
    /// Show one year of one file, gaps interpolated
    Year {
        file: PathBuf,
        #[arg(long)]
        year: Option<u16>,
        #[arg(long, value_parser = parse_user_date)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_user_date)]
        end: Option<NaiveDate>,
    },
    /// Look up the precomputed forecast for a date
    Forecast {
        #[arg(long, value_parser = parse_user_date)]
        date: NaiveDate,
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// List dates flagged as anomalies in the forecast period
    Anomalies {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long, value_parser = parse_user_date)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_user_date)]
        end: Option<NaiveDate>,
    },
}

fn window_or(default: DateWindow, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateWindow {
    DateWindow::new(start.unwrap_or(default.start), end.unwrap_or(default.end))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serializing output")?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DashboardConfig::load_or_default(cli.config.as_deref())?;
    let schema = config.schema();

    match cli.command {
        Command::Files { dir } => {
            let dir = dir.unwrap_or_else(|| config.data_dir.clone());
            let files = list_csv_files(&dir)?;
            if cli.json {
                return print_json(&files);
            }
            for f in files {
                println!("{}", f.display());
            }
        }

        Command::Compare { files, start, end } => {
            let files = if files.is_empty() {
                list_csv_files(&config.data_dir)?
            } else {
                files
            };
            if files.is_empty() {
                println!("No CSV files selected.");
                return Ok(());
            }

            let window = window_or(config.compare_window, start, end);
            log::info!("Comparing {} files over {window}", files.len());
            let summaries = summarize(&files, &schema, &window)?;

            if cli.json {
                return print_json(&summaries);
            }
            let spans = summaries.iter().filter_map(|s| s.available.as_ref());
            if let Some(span) = combined_span(spans) {
                println!("Data available: {span}");
            }
            println!("Window: {window}\n");
            for (i, s) in summaries.iter().enumerate() {
                println!("{}", render_file_summary(i, s));
            }
        }

        Command::Year { file, year, start, end } => {
            let year = year.unwrap_or(config.default_year);
            let window = window_or(config.year_window, start, end);
            let view = year_view(&file, &schema, year, &window)?;
            if cli.json {
                return print_json(&view);
            }
            print!("{}", render_year_view(&view));
        }

        Command::Forecast { date, path } => {
            let path = path.unwrap_or_else(|| config.forecast_path.clone());
            let table = ForecastTable::load(&path)?;
            let prediction = table.prediction_for(date);
            if cli.json {
                return print_json(&prediction);
            }
            match prediction {
                Some(p) => println!("{}", p.describe()),
                None => {
                    println!("No prediction available for the selected date.");
                    if let Some(span) = table.span() {
                        println!("Forecast covers {span}");
                    }
                }
            }
        }

        Command::Anomalies { path, start, end } => {
            let path = path.unwrap_or_else(|| config.anomaly_path.clone());
            let window = match (start, end) {
                (None, None) => None,
                (s, e) => Some(DateWindow::new(
                    s.unwrap_or(NaiveDate::MIN),
                    e.unwrap_or(NaiveDate::MAX),
                )),
            };
            let events = load_anomalies(&path, window.as_ref())?;
            if cli.json {
                return print_json(&events);
            }
            if events.is_empty() {
                println!("No anomalies flagged.");
            }
            for e in events {
                println!("⚠ {}", e.message);
            }
        }
    }

    Ok(())
}
