//! `mirrorlist` binary: configuration, logging, and the server.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mirrorlist::{Config, Server, config};

/// Serve the mirror list API and static front end.
#[derive(Debug, Parser)]
#[command(name = "mirrorlist", version, about)]
struct Args {
    /// Socket address to listen on (overrides MIRRORLIST_BIND).
    #[arg(long)]
    bind: Option<String>,

    /// Mirror list JSON file (overrides MIRRORLIST_DATA).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Static asset directory (overrides MIRRORLIST_STATIC).
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mirrorlist=info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), mirrorlist::Error> {
    let mut config = Config::from_env()?;
    if let Some(bind) = args.bind {
        config.bind = config::parse_bind(&bind)?;
    }
    if let Some(data) = args.data {
        config.mirrors_path = data;
    }
    if let Some(static_dir) = args.static_dir {
        config.static_dir = static_dir;
    }

    tracing::info!(
        mirrors = %config.mirrors_path.display(),
        assets = %config.static_dir.display(),
        "mirrorlist starting up",
    );

    let app = mirrorlist::app(&config)?;
    Server::new(config.bind).serve(app).await
}
