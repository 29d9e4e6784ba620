use anyhow::Context;
use caphub::domain::config::{ApiConfig, LoggingConfig, RuntimeConfig};
use caphub::kernel::config::{DEFAULT_CONFIG_PATH, load_config};
use caphub_logger::{LevelFilter, Logger};
use caphub_server::Server;
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::{Builder, Runtime};

/// Capabilities Hub HTTP server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file; the extension may be omitted.
    #[arg(short, long, env = "CAPHUB_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Overrides `server.port`.
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg: ApiConfig =
        load_config(Some(&args.config)).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;
    let runtime = build_runtime(&cfg.runtime)?;

    runtime.block_on(async move {
        let mut builder = Server::builder().config(cfg);
        if let Some(port) = args.port {
            builder = builder.port(port);
        }
        builder.build()?.run().await
    })
}

fn init_logger(cfg: &LoggingConfig) -> anyhow::Result<Logger> {
    let level: LevelFilter =
        cfg.level.parse().with_context(|| format!("Invalid log level '{}'", cfg.level))?;

    let mut builder =
        Logger::builder(env!("CARGO_PKG_NAME")).level(level).console(cfg.console).json(cfg.json);
    if let Some(filter) = &cfg.filter {
        builder = builder.env_filter(filter.as_str());
    }
    if let Some(directory) = &cfg.directory {
        builder = builder.directory(directory.clone());
    }

    builder.init().context("Failed to initialize logging")
}

fn build_runtime(cfg: &RuntimeConfig) -> anyhow::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();
    builder.enable_all().thread_name(&cfg.thread_name);
    if let Some(threads) = cfg.worker_threads.filter(|n| *n > 0) {
        builder.worker_threads(threads);
    }

    let runtime = builder.build().context("Failed to build tokio runtime")?;
    tracing::debug!(worker_threads = ?cfg.worker_threads, "Tokio runtime ready");
    Ok(runtime)
}
