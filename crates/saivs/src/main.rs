//! `saiserver` entry point.
//!
//! Reads newline-delimited JSON requests from a file or stdin, executes them
//! against one in-memory switch engine and writes one JSON response per
//! request to stdout.

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use sonic_saivs::bulk::BulkMode;
use sonic_saivs::config::{ServerConfig, DEFAULT_CONFIG_PATH};
use sonic_saivs::server::{serve, Session};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};

/// Software SAI switch object server
#[derive(Parser, Debug)]
#[command(name = "saiserver")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Request script; stdin when omitted
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Requests executed concurrently
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Bucket count of fine-grained groups without a configured size
    #[arg(long)]
    fine_grained_size: Option<u32>,

    /// Default bulk failure policy (stop_on_error, ignore_error)
    #[arg(long)]
    bulk_mode: Option<BulkMode>,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = ServerConfig::load_or_default(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if let Some(workers) = self.workers {
            config.server.workers = workers;
        }
        if let Some(ref level) = self.log_level {
            config.server.log_level = level.clone();
        }
        if let Some(size) = self.fine_grained_size {
            config.engine.fine_grained_default_size = size;
        }
        if let Some(mode) = self.bulk_mode {
            config.engine.default_bulk_mode = mode;
        }
        config.validate()?;
        Ok(config)
    }
}

async fn run(args: Args, config: ServerConfig) -> anyhow::Result<usize> {
    let session = Arc::new(Session::new(config.engine));

    let cancel = session.cancel_token();
    let shutdown_handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Received SIGINT, shutting down gracefully...");
                cancel.cancel();
            }
            Err(err) => {
                error!("Failed to listen for ctrl-c: {}", err);
            }
        }
    });

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match args.input {
        Some(ref path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let handled = serve(
        Arc::clone(&session),
        reader,
        tokio::io::stdout(),
        config.server.workers,
    )
    .await?;

    shutdown_handle.abort();
    info!(
        "Store holds {} objects at exit",
        session.engine().store().len()
    );
    Ok(handled)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("saiserver: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.server.log_level),
    )
    .init();

    info!("====================================================================");
    info!("Starting saiserver");
    info!("====================================================================");
    info!("Workers: {}", config.server.workers);
    info!(
        "Fine-grained default size: {}",
        config.engine.fine_grained_default_size
    );
    info!("Default bulk mode: {:?}", config.engine.default_bulk_mode);
    info!("Object limit: {}", config.engine.max_objects);
    match args.input {
        Some(ref path) => info!("Input: {}", path.display()),
        None => info!("Input: stdin"),
    }

    match run(args, config).await {
        Ok(handled) => {
            info!("saiserver exiting after {} requests", handled);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("saiserver failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
