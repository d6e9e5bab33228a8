//! i18nsync CLI
//!
//! Keeps `messages/en.json` and `messages/zh-TW.json` in step with an
//! Airtable translation table.
//!
//! # Commands
//!
//! - `pull` - Overwrite local message files from the table, backing up
//!   changed files first
//! - `push` - Create and update table records from the local message files
//! - `version` - Show version information

mod commands;

use clap::{Args, Parser, Subcommand};
use i18nsync_engine::{
    SyncConfig, SyncError, DEFAULT_API_URL, DEFAULT_MESSAGES_DIR, DEFAULT_TABLE_NAME,
    DEFAULT_VIEW, MAX_BATCH_SIZE,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Two-way sync between an Airtable table and local translation files.
#[derive(Parser, Debug)]
#[command(name = "i18nsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding en.json and zh-TW.json
    #[arg(global = true, short, long, default_value = DEFAULT_MESSAGES_DIR)]
    messages_dir: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(flatten)]
    remote: RemoteArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where the table lives and how to reach it.
#[derive(Args, Debug)]
struct RemoteArgs {
    /// Airtable API token
    #[arg(global = true, long, env = "AIRTABLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Airtable base id
    #[arg(global = true, long, env = "AIRTABLE_BASE_ID")]
    base_id: Option<String>,

    /// Table name
    #[arg(global = true, long, env = "AIRTABLE_TABLE_NAME", default_value = DEFAULT_TABLE_NAME)]
    table: String,

    /// View used when listing records
    #[arg(global = true, long, env = "AIRTABLE_VIEW", default_value = DEFAULT_VIEW)]
    view: String,

    /// API root URL
    #[arg(global = true, long, default_value = DEFAULT_API_URL, hide = true)]
    api_url: String,

    /// HTTP request timeout in seconds
    #[arg(global = true, long, default_value = "30")]
    timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Overwrite local message files from the table
    Pull {
        /// Dry run - show what would change
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Create and update table records from local message files
    Push {
        /// Dry run - show what would be sent
        #[arg(short, long)]
        dry_run: bool,

        /// Records per request (1-10)
        #[arg(short, long, default_value_t = MAX_BATCH_SIZE)]
        batch_size: usize,

        /// Pause between requests in milliseconds
        #[arg(long, default_value = "200")]
        delay_ms: u64,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Builds the run configuration from flags and environment.
    fn config(&self) -> SyncConfig {
        let mut config = SyncConfig::new(self.remote.base_id.clone().unwrap_or_default())
            .with_table_name(self.remote.table.clone())
            .with_view(self.remote.view.clone())
            .with_api_url(self.remote.api_url.clone())
            .with_messages_dir(self.messages_dir.clone())
            .with_timeout(Duration::from_secs(self.remote.timeout));

        if let Some(key) = self.remote.api_key.as_deref().filter(|k| !k.is_empty()) {
            config = config.with_api_key(key);
        }

        match self.command {
            Commands::Pull { dry_run } => config.with_dry_run(dry_run),
            Commands::Push {
                dry_run,
                batch_size,
                delay_ms,
            } => config
                .with_dry_run(dry_run)
                .with_batch_size(batch_size)
                .with_batch_delay(Duration::from_millis(delay_ms)),
            Commands::Version => config,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), SyncError> {
    let config = cli.config();
    if config.api_key.is_none() {
        warn!("AIRTABLE_API_KEY is not set, requests will be unauthenticated");
    }

    match cli.command {
        Commands::Pull { .. } => commands::pull::run(&config),
        Commands::Push { .. } => commands::push::run(&config),
        Commands::Version => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too; only real usage errors fail.
            if let Err(io) = e.print() {
                eprintln!("{io}");
            }
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Commands::Version = cli.command {
        println!("i18nsync v{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            if let Some(hint) = e.hint() {
                error!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}
