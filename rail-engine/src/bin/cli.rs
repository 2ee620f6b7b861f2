//! CLI wrapper: loads a dataset directory and either prints the assembly
//! report or answers one query (spec.md §6 "Exit codes"). Deliberately
//! thin — no routing logic lives here.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use rail_engine::dataset;
use rail_engine::loader::load_line_document;
use rail_engine::network::Network;
use rail_engine::query::{self, Query, QueryWhen, SystemClock};
use rail_engine::router::SearchConfig;

#[derive(Parser)]
#[command(name = "rail-engine-cli", about = "Rail journey planning engine CLI")]
struct Cli {
    /// Dataset directory of line documents (spec.md §6).
    #[arg(long)]
    dataset: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the dataset and print the assembly report.
    Report,
    /// Load the dataset and answer one journey query.
    Plan {
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        /// Depart at or after this local time, `YYYY-MM-DDTHH:MM`. Defaults
        /// to now.
        #[arg(long)]
        depart_after: Option<String>,
        #[arg(long, default_value_t = 4)]
        max_transfers: u32,
        #[arg(long, default_value_t = 5)]
        max_results: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let files = match dataset::discover(&cli.dataset) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("failed to read dataset directory: {err}");
            return ExitCode::from(2);
        }
    };

    let mut specs = Vec::new();
    let mut load_warnings = Vec::new();
    let mut rejected_documents = Vec::new();
    for file in files {
        match load_line_document(&file.contents) {
            Ok((spec, warnings)) => {
                for warning in warnings {
                    eprintln!("warning in {}: {warning:?}", file.path.display());
                    load_warnings.push(format!("{}: {warning:?}", file.path.display()));
                }
                specs.push(spec);
            }
            Err(err) => {
                eprintln!("rejected {}: {err}", file.path.display());
                rejected_documents.push(format!("{}: {err}", file.path.display()));
            }
        }
    }

    let (network, mut report) = match Network::build(specs) {
        Ok(built) => built,
        Err(err) => {
            eprintln!("dataset load error: {err}");
            return ExitCode::from(2);
        }
    };
    report.load_warnings.extend(load_warnings);
    report.rejected_documents.extend(rejected_documents);

    match cli.command {
        Command::Report => {
            println!("{report:#?}");
            ExitCode::SUCCESS
        }
        Command::Plan { origin, destination, depart_after, max_transfers, max_results } => {
            let when = match depart_after {
                Some(text) => match parse_local_datetime(&text) {
                    Ok(dt) => QueryWhen::DepartAfter(dt),
                    Err(message) => {
                        eprintln!("invalid --depart-after value: {message}");
                        return ExitCode::from(3);
                    }
                },
                None => QueryWhen::DepartAfter(Local::now()),
            };

            let query = Query {
                origin,
                destination,
                when,
                config: SearchConfig { max_transfers, max_results, ..SearchConfig::default() },
                day_class_override: None,
            };

            match query::plan(&network, &query, &SystemClock) {
                Ok(response) => {
                    if response.trivial_journey.is_some() {
                        println!("origin and destination are the same station; nothing to travel");
                    } else if let Some(reason) = response.no_path_reason {
                        println!("no journey found: {reason:?}");
                    } else {
                        for journey in &response.journeys {
                            print_journey(journey);
                        }
                    }
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("query error: {err}");
                    ExitCode::from(3)
                }
            }
        }
    }
}

fn parse_local_datetime(text: &str) -> Result<chrono::DateTime<Local>, String> {
    let naive = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
        .map_err(|e| e.to_string())?;
    Local.from_local_datetime(&naive).single().ok_or_else(|| "ambiguous local time".to_string())
}

fn print_journey(journey: &rail_engine::domain::Journey) {
    println!(
        "{} legs, {} transfers, arrives at effective minute {}",
        journey.legs().len(),
        journey.transfer_count(),
        journey.arrival_time()
    );
    for leg in journey.legs() {
        println!(
            "  line {} pattern {}: board {} at {} -> alight {} at {}",
            leg.line(),
            leg.pattern(),
            leg.board_station(),
            leg.board_time(),
            leg.alight_station(),
            leg.alight_time()
        );
    }
    if let Some(walk) = journey.trailing_walk() {
        println!("  walk to {} arriving at {}", walk.to_station, walk.arrival_time);
    }
}
