use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use launchwatch::{
    arguments::{env_path_arg, is_help_requested, print_help},
    config::load_config,
    logger::{self, LogTag},
    rpc::RpcClient,
    shutdown::ShutdownSignal,
    tokens::HttpUriFetcher,
    TokenMonitor,
};

/// Main entry point for launchwatch
///
/// Loads `.env` and the TOML configuration, starts the token monitor and runs
/// until Ctrl+C. A second Ctrl+C exits immediately.
#[tokio::main]
async fn main() {
    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    match env_path_arg() {
        Some(path) => {
            if let Err(e) = dotenv::from_path(&path) {
                eprintln!("❌ Failed to load env file {}: {}", path, e);
                std::process::exit(1);
            }
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    logger::init();
    logger::info(LogTag::System, "🚀 launchwatch starting up...");

    if let Err(e) = run().await {
        logger::error(LogTag::System, &format!("❌ launchwatch failed: {:#}", e));
        std::process::exit(1);
    }

    logger::info(LogTag::System, "✅ launchwatch stopped");
}

async fn run() -> anyhow::Result<()> {
    let config = load_config().context("loading configuration")?;

    let chain = Arc::new(RpcClient::from_config(&config.rpc).context("building RPC client")?);
    logger::info(LogTag::Rpc, &format!("🌐 RPC endpoint: {}", chain.url()));
    let fetcher = Arc::new(HttpUriFetcher::from_config(&config.metadata).context("building metadata fetcher")?);

    let monitor = TokenMonitor::new(config, chain.clone(), fetcher).context("building token monitor")?;
    let shutdown = monitor.shutdown_signal();
    install_ctrlc_handler(shutdown.clone())?;

    monitor.start().context("starting token monitor")?;

    logger::info(
        LogTag::System,
        "Waiting for shutdown signal (press Ctrl+C twice to force kill)",
    );
    shutdown.wait().await;

    monitor.stop().await;

    let stats = monitor.stats();
    logger::info(
        LogTag::System,
        &format!(
            "📊 {} events received, {} tokens enriched, {} published, {} RPC calls",
            stats.events_received,
            stats.token_count,
            stats.events_published,
            chain.total_calls()
        ),
    );

    if let Some(latest) = monitor.latest_event() {
        logger::info(
            LogTag::System,
            &format!("Latest token: {} ({}) {}", latest.name, latest.symbol, latest.mint),
        );
    }

    Ok(())
}

fn install_ctrlc_handler(shutdown: ShutdownSignal) -> anyhow::Result<()> {
    let received = AtomicBool::new(false);

    ctrlc::set_handler(move || {
        if received.swap(true, Ordering::SeqCst) {
            logger::error(LogTag::System, "Second Ctrl+C detected, forcing immediate exit.");
            // 130 is the conventional exit code for SIGINT
            std::process::exit(130);
        }

        logger::warning(
            LogTag::System,
            "Shutdown signal received. Press Ctrl+C again to force kill.",
        );
        shutdown.trigger();
    })
    .context("installing Ctrl+C handler")
}
