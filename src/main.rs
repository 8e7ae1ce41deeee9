//! keypad-gw - keyboard to virtual game controller gateway
//!
//! Drives the mapping engine from a REPL or a replay script, logging every
//! committed pad state.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keypad_gw::cli;
use keypad_gw::config::{self, AppConfig};
use keypad_gw::mapper::KeyMapper;
use keypad_gw::pad::{ConsoleSink, PadSnapshot};
use keypad_gw::queue::EngineQueue;

/// keypad-gw - play a game controller layout from the keyboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: keypad-gw.yaml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Replay key events from a script file instead of starting the REPL
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print the key binding table and exit
    #[arg(long)]
    list_bindings: bool,

    /// Print the final pad state as JSON after a script run
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match args.config.clone().or_else(config::discover) {
        Some(path) => AppConfig::load(&path).await?,
        None => AppConfig::default(),
    };

    let level = args
        .log_level
        .clone()
        .or_else(|| config.log_level().map(str::to_string))
        .unwrap_or_else(|| "info".to_string());
    let _log_guard = init_logging(&level, config.log_file())?;

    info!("Starting keypad-gw...");

    let bindings = config.build_bindings().await?;
    info!("{} key bindings loaded", bindings.len());

    if args.list_bindings {
        cli::print_bindings(&bindings);
        return Ok(());
    }

    let (pad_tx, pad_rx) = watch::channel(PadSnapshot::default());
    let sink = ConsoleSink::new("pad").with_publisher(pad_tx);
    let mapper = KeyMapper::new(bindings.clone(), config.tuning);
    let queue = EngineQueue::spawn(mapper, sink);

    match &args.script {
        Some(path) => {
            let replay = cli::run_script(path, &queue).await;
            let sink = queue.shutdown().await.context("Engine stopped")?;
            let sent = replay?;
            info!("Script finished: {} events, {} commits", sent, sink.commit_count());

            if args.json {
                println!("{}", serde_json::to_string_pretty(sink.pad())?);
            } else {
                println!("{}", sink.pad());
            }
        }
        None => {
            let session = cli::run_repl(&queue, &pad_rx, &bindings).await;
            queue.shutdown().await.context("Engine stopped")?;
            session?;
        }
    }

    info!("keypad-gw shutdown complete");
    Ok(())
}

fn init_logging(level: &str, file: Option<PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (file_layer, guard) = match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
