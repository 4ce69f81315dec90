use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use billview::config;
use billview::tui;

/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "billview")]
#[command(
    about = "Incremental viewer for very large markup documents",
    long_about = "Incremental viewer for very large markup documents\n\nOnly a prefix of the document is laid out at first; scrolling near the end\nof the rendered portion materializes more. Press ':' to jump to an element\nby its id attribute."
)]
struct Cli {
    /// Document to view
    file: PathBuf,

    /// Target chunk size in characters (overrides the config file)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a config::Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

async fn run(cli: Cli, mut config: config::Config) -> anyhow::Result<()> {
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size.max(1);
    }

    let raw = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    tracing::info!(
        file = %cli.file.display(),
        bytes = raw.len(),
        chunk_size = config.chunk_size,
        "opening document"
    );

    tui::run(raw, config).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = config::read();
    let cli = Cli::parse();

    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("viewer failed: {:#}", e);
        std::process::exit(1);
    }
}
