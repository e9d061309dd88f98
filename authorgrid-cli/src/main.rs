mod app;
mod commands;
mod error;
mod paths;
mod render;
mod settings;
mod sink;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use authorgrid_lib::Session;
use authorgrid_lib::suggest::CachedSource;
use authorgrid_lib::suggest::StaticSuggestions;
use authorgrid_lib::suggest::SuggestionSource;
use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::app::App;
use crate::app::Outcome;
use crate::commands::Command;
use crate::error::CliError;
use crate::sink::JsonFileSink;

/// How long institution lookups stay cached.
const SUGGESTION_TTL: Duration = Duration::from_secs(300);

#[derive(Parser)]
#[command(name = "authorgrid")]
#[command(about = "Edit an author list and its affiliations from the terminal", long_about = None)]
struct Args {
    /// Author list to edit: a JSON array of rows or a saved payload
    input: Option<PathBuf>,

    /// Grid settings file (defaults to config.json in the config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Record the author list belongs to
    #[arg(long)]
    record_id: Option<u64>,

    /// JSON array of institution names used for suggestions
    #[arg(long)]
    institutions: Option<PathBuf>,

    /// Where `submit` writes the author list
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log file (defaults to latest.log in the cache directory)
    #[arg(long)]
    log: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Args::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    init_logging(args.log.as_deref())?;

    let config = settings::load_config(args.config.as_deref())?;
    let (records, stored_id) = match &args.input {
        Some(path) => settings::load_authors(path)?,
        None => (Vec::new(), None),
    };
    let record_id = args.record_id.or(stored_id);
    let session = Session::load(records, config);

    let source: Option<Box<dyn SuggestionSource>> = match &args.institutions {
        Some(path) => {
            let names = settings::load_institutions(path)?;
            log::info!("Loaded {} institutions", names.len());
            let names = StaticSuggestions::new(names).with_usage(session.grid().column_usage());
            let source = CachedSource::new(names, SUGGESTION_TTL);
            Some(Box::new(source))
        }
        None => None,
    };

    let output = args
        .output
        .or_else(|| paths::default_output(record_id))
        .unwrap_or_else(|| PathBuf::from("authors.json"));
    let sink = JsonFileSink::new(output);
    log::info!("Submissions go to {}", sink.path().display());

    let mut app = App::new(session, source, Box::new(sink), record_id);
    print!("{}", app.render());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };
        match app.execute(command).await {
            Ok(Outcome::Continue(text)) => print!("{}", text),
            Ok(Outcome::Quit) => break,
            Err(e) if e.is_recoverable() => eprintln!("Error: {}", e),
            Err(e) => return Err(e),
        }
    }

    log::info!("Session ended with {} rows", app.session().grid().len());
    Ok(())
}

fn init_logging(explicit: Option<&Path>) -> Result<(), CliError> {
    paths::rotate_logs();
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(paths::log_file)
        .unwrap_or_else(|| PathBuf::from("authorgrid.log"));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = File::create(&path)?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;
    Ok(())
}
