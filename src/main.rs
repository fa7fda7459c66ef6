mod cli;

use crate::cli::app::App;
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use nestkv::SessionConfig;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nestkv")]
#[command(about = "In-memory key-value store with nested transactions")]
struct Cli {
    /// Read commands line by line from stdin instead of the terminal UI
    #[arg(long)]
    plain: bool,

    /// Run commit/rollback without asking for confirmation
    #[arg(long)]
    no_confirm: bool,

    /// Lines kept in the operations log
    #[arg(long, default_value_t = 15)]
    log_capacity: usize,

    #[arg(long, default_value_t = 64)]
    mailbox_capacity: usize,

    /// Default filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this file (required for logging in terminal UI mode)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .log_capacity(self.log_capacity)
            .mailbox_capacity(self.mailbox_capacity)
            .confirm_transactions(!self.no_confirm)
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!("failed to initialize tracing subscriber: {}", e))?;
        }
        // the terminal UI owns stdout and stderr
        None if !cli.plain => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("failed to initialize tracing subscriber: {}", e))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    info!(version = env!("CARGO_PKG_VERSION"), plain = cli.plain, "nestkv starting");

    let config = cli.session_config();
    if cli.plain {
        cli::repl::run(config).await
    } else {
        App::new(config)
            .run()
            .await
            .map_err(|e| anyhow!("terminal UI failed: {}", e))
    }
}
