//! Command-line scorekeeper for 立禅の会 competitions.
//!
//! Each invocation loads the saved session from the data directory,
//! runs one command and persists the result.

use std::time::Instant;

use anyhow::{Context, Result};
use pico_args::Arguments;
use ritsuzen::storage::{FileStorage, StorageManager};

mod commands;
mod config;
mod logging;
mod render;

use commands::{Command, Session};
use config::AppConfig;

const HELP: &str = "\
Keep score for a 立禅の会 competition

USAGE:
  rz_cli <COMMAND> [ARGS]

COMPETITION:
  show                              Summary of the current competition [default]
  new NAME [--date YYYY-MM-DD] [--rounds N] [--handicap|--no-handicap]
           [--rotation|--no-rotation]
  add NAME RANK                     Add a participant (rank 1-8)
  add-master NAME|ID                Add a participant from the roster
  remove|up|down PARTICIPANT        Remove or reorder a participant
  group [SIZE]                      Split participants into groups
  ungroup                           Clear grouping
  group-move PARTICIPANT up|down    Move a participant to a neighbouring group
  finish --yes                      Finish and save to history
  reset --yes                       Discard the current competition

SCORING:
  shot PARTICIPANT ROUND SHOT hit|miss|clear
  cycle PARTICIPANT ROUND SHOT      Step a shot: - → × → ○ → -
  round N                           Score sheet of round N
  next [--round N]                  Who shoots next
  order [ROUND]                     Firing order per group
  results                           Ranked results

DATA:
  export-json [--all] [--out DIR]
  export-csv [--ranking] [--out DIR]
  import FILE                       Import competitions into history
  history                           Finished competitions
  masters [list|add NAME RANK|remove ID|toggle ID|export [FILE]|import FILE]
          [--sort usage|name|rank]
  info                              Storage usage

PARTICIPANT may be an id, an exact name or a 1-based position.

ENVIRONMENT:
  RITSUZEN_DATA_DIR        Data directory  [default: ./ritsuzen-data]
  RITSUZEN_DEFAULT_ROUNDS  Rounds for new competitions  [default: 5]
  RITSUZEN_GROUP_SIZE      Default group size  [default: 5]
  RITSUZEN_ROTATION        Rotate firing order  [default: true]
  RITSUZEN_HANDICAP        Enable handicap  [default: false]
  RITSUZEN_LOG             Log filter when RUST_LOG is unset  [default: info]

FLAGS:
  -h, --help               Print help information
";

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    logging::init(&config.log_filter);

    let command = Command::parse(pargs).context("Invalid command line")?;

    let storage = FileStorage::open(&config.data_dir)
        .with_context(|| format!("Failed to open data directory {}", config.data_dir.display()))?;
    let mut session = Session::new(config, StorageManager::new(storage));

    let name = command.name();
    let start = Instant::now();
    let output = commands::execute(command, &mut session).await;
    logging::log_command(name, start.elapsed().as_millis() as u64);

    print!("{}", output?);
    Ok(())
}
