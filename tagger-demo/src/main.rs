mod keys;
mod terminal;

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::{debug, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use tagger::suggest::suggestions_from_json;
use tagger::{
    ConfigError, Driver, DriverError, FieldInput, Suggestion, SuggestConfig, TagConfig, TagField,
};

use crate::keys::{convert_key_event, is_quit};
use crate::terminal::TerminalGuard;

const DEFAULT_CANDIDATES: &[&str] = &[
    "async", "borrow", "cargo", "clippy", "closure", "crate", "enum", "generic", "iterator",
    "lifetime", "macro", "module", "ownership", "pattern", "rustfmt", "serde", "slice", "tokio",
    "trait", "unsafe",
];

#[derive(Parser, Debug)]
#[command(name = "tagger-demo")]
#[command(about = "Edit a tag list with suggestions in the terminal", long_about = None)]
struct Cli {
    /// JSON array of candidates: strings or {"value", "label"} records
    #[arg(short, long)]
    candidates: Option<PathBuf>,

    /// Initial serialized value, e.g. "a,b,c"
    #[arg(short, long, default_value = "")]
    value: String,

    /// Tag separator
    #[arg(short, long, default_value = ",")]
    separator: char,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("terminal: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("driver task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn load_candidates(cli: &Cli) -> Result<Vec<Suggestion>, DemoError> {
    match &cli.candidates {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(suggestions_from_json(&json)?)
        }
        None => Ok(DEFAULT_CANDIDATES.iter().map(|c| Suggestion::new(*c)).collect()),
    }
}

async fn run(cli: Cli) -> Result<String, DemoError> {
    let candidates = load_candidates(&cli)?;
    info!("Loaded {} candidates", candidates.len());

    let (width, _) = crossterm::terminal::size()?;
    let tag_config = TagConfig::default()
        .with_separator(cli.separator)
        .with_input_width(2, None);
    let field = TagField::new(tag_config, SuggestConfig::default(), cli.value)?
        .with_candidates(candidates)
        .with_container_width(width);

    let (driver, handle) = Driver::new(field);
    let task = tokio::spawn(driver.run());

    let mut guard = TerminalGuard::new()?;
    let mut snapshots = handle.subscribe();
    let mut events = EventStream::new();

    handle.send(FieldInput::Focus).await?;
    guard.draw(&handle.snapshot())?;

    loop {
        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if is_quit(&key) {
                        debug!("Quit requested");
                        break;
                    }
                    if let Some(combo) = convert_key_event(key) {
                        handle.send(FieldInput::Key(combo)).await?;
                    }
                }
                Some(Ok(Event::Resize(width, _))) => {
                    handle.send(FieldInput::SetContainerWidth(Some(width))).await?;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },

            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                guard.draw(&snapshot)?;
            }
        }
    }

    drop(snapshots);
    drop(handle);
    drop(guard);

    let field = task.await?;
    Ok(field.tags().form_value().to_string())
}

#[tokio::main]
async fn main() {
    let log_file = File::create("tagger-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
