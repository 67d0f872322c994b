//! `dwgrec` - CLI for dwgtracker
//!
//! This binary provides the command-line interface for adding, editing,
//! listing and clearing drawing records on this machine.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use dwgtracker::cli::{self, Cli, Command};
use dwgtracker::{init_logging, Config, RecordStore, SqliteBackend, TerminalPrompt, Tracker};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let mut stdout = std::io::stdout();

    // Configuration commands load the config themselves and never open the database
    let command = match cli.command {
        Command::Config(config_cmd) => {
            cli::handle_config(cli.config, config_cmd, &mut stdout)?;
            return Ok(());
        }
        other => other,
    };

    let config = Config::load_from(cli.config).context("failed to load configuration")?;

    let db_path = config.database_path();
    debug!("Opening record database at {}", db_path.display());
    let backend = SqliteBackend::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    let mut tracker = Tracker::new(RecordStore::with_key(backend, &config.storage.slot_key));

    let assume_yes = match &command {
        Command::Add(cmd) => cmd.yes,
        Command::Clear(cmd) => cmd.yes,
        _ => false,
    };
    let mut prompt = TerminalPrompt::stdio(assume_yes);

    cli::execute(command, &mut tracker, &config, &mut prompt, &mut stdout)?;
    Ok(())
}
