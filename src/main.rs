use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use viewstate::config::Config;
use viewstate::logging::init_tracing;
use viewstate::replay::{replay, ReplayOptions};
use viewstate::store::ViewStore;
use viewstate::view::types::{FormedView, View};
use viewstate::view::ViewState;

#[derive(Parser, Debug)]
#[command(name = "viewstate", version, about = "Replay and inspect view slice state")]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an event log and print the final snapshot
    Replay {
        /// Newline-delimited JSON events, or '-' for stdin
        file: PathBuf,
        /// Start from a saved snapshot instead of the initial state
        #[arg(long, value_name = "STATE")]
        from: Option<PathBuf>,
        /// Skip lines that fail to parse
        #[arg(long)]
        skip_invalid: bool,
        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Decode one stored view and print its decoded form
    Decode {
        /// JSON file with a single view record
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    match cli.command {
        Command::Replay {
            file,
            from,
            skip_invalid,
            compact,
        } => {
            let options = ReplayOptions {
                skip_invalid: skip_invalid || config.replay.skip_invalid,
                sql_limit: config.replay.sql_limit,
            };
            let reader = open_input(&file)?;
            let mut store = match from {
                Some(path) => ViewStore::with_state(load_snapshot(&path)?),
                None => ViewStore::new(),
            };
            replay(reader, &mut store, &options)
                .with_context(|| format!("replaying {}", file.display()))?;
            print_json(store.state(), config.output.pretty && !compact)
        }
        Command::Decode { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let view: View = serde_json::from_str(&content)
                .with_context(|| format!("parsing view record in {}", file.display()))?;
            let formed = FormedView::try_from_view(&view)?;
            print_json(&formed, config.output.pretty)
        }
    }
}

fn load_snapshot(path: &Path) -> Result<ViewState> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing view state in {}", path.display()))
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}
