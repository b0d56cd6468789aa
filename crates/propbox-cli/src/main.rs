use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use propbox_cli::{CacheLocation, ChunkCommands, OutputFormat, commands};

#[derive(Parser)]
#[command(
    name = "propbox",
    about = "Inspect and manage cached world prop chunks",
    version,
    author
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base directory holding chunk stores
    #[arg(long, global = true, env = "PROPBOX_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Name of the store inside the base directory
    #[arg(long, global = true)]
    store: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Chunks(ChunkCommands),

    /// Decode a prop pack file and print its props and hash
    Inspect {
        /// Pack or single record file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let location = CacheLocation {
        config: cli.config,
        cache_dir: cli.cache_dir,
        store: cli.store,
    };

    match cli.command {
        Commands::Chunks(cmd) => commands::chunks::handle(cmd, &location, cli.format).await?,
        Commands::Inspect { file } => commands::inspect::handle(&file, cli.format).await?,
    }

    Ok(())
}
