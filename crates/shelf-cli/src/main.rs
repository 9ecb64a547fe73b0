//! Shelf CLI - shelf command

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::{Parser, Subcommand};
use shelf_cli::cmd;
use shelf_cli::cmd::listen::{ListenOptions, SourceKind};
use std::path::PathBuf;

/// Shelf - shake-to-open and due-date reminders for the library companion
#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the assistant whenever the device is shaken
    Listen {
        /// Raw signal source
        #[arg(long, value_enum, default_value_t = SourceKind::Signal)]
        source: SourceKind,
        /// Override shake.cooldown_ms
        #[arg(long)]
        cooldown_ms: Option<u64>,
        /// Override shake.settle_delay_ms
        #[arg(long)]
        settle_delay_ms: Option<u64>,
        /// Ask before navigating
        #[arg(long)]
        confirm: bool,
        /// Override shake.target_screen
        #[arg(long)]
        target: Option<String>,
        /// Don't ring the terminal bell on accepted shakes
        #[arg(long)]
        no_bell: bool,
        /// Stop after this many milliseconds instead of waiting for Ctrl-C
        #[arg(long)]
        run_for_ms: Option<u64>,
    },
    /// Show the reminders scheduled for a loan
    Remind {
        /// Book title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,
        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        now: Option<DateTime<FixedOffset>>,
        /// Include the "book issued" notice
        #[arg(long)]
        issued: bool,
    },
    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Print one value
    Get {
        /// Key, e.g. shake.cooldown_ms
        key: String,
    },
    /// Change one value
    Set {
        /// Key, e.g. shake.cooldown_ms
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an annotated example config
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = shelf_cli::logging::init(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Listen {
            source,
            cooldown_ms,
            settle_delay_ms,
            confirm,
            target,
            no_bell,
            run_for_ms,
        } => {
            cmd::listen::run(ListenOptions {
                source,
                cooldown_ms,
                settle_delay_ms,
                confirm,
                target,
                bell: !no_bell,
                run_for_ms,
            })
            .await
        }
        Commands::Remind { title, due, now, issued } => {
            cmd::remind::run(&title, due, now, issued).await
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list().await,
            ConfigCommands::Get { key } => cmd::config::run_get(&key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(&key, &value).await,
            ConfigCommands::Path { create } => cmd::config::run_path(create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        },
    }
}
