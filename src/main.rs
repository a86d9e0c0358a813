//! AXXIS presale terminal client - Main executable
//!
//! Connects a local wallet to the sale chain and walks the user through
//! approving a stablecoin and buying AXXIS with it.
use anyhow::Context;
use axxis_presale::chain::signer_from_hex;
use axxis_presale::{
    parse_intent, ChainConfig, ConsoleView, Event, PresalePresenter, PresaleView, ServiceContainer,
    UserIntent,
};
use dotenv::dotenv;
use log::{error, info};
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting AXXIS presale client v{}", axxis_presale::VERSION);

    let config = ChainConfig::load().context("Failed to load configuration")?;

    let private_key = env::var("PRESALE_PRIVATE_KEY")
        .context("PRESALE_PRIVATE_KEY must be set in environment variables")?;
    let signer = signer_from_hex(&private_key)?;

    info!("Connecting to {}...", config.rpc_url);
    let services = ServiceContainer::new(config, signer).context("Failed to create services")?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let view = Arc::new(ConsoleView::new());
    let mut presenter = services.presenter(view.clone(), events_tx.clone());

    let mut wallet_watcher = services.wallet_watcher();
    wallet_watcher.start(events_tx.clone())?;

    // Forward terminal input to the session loop
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(intent) = parse_intent(&line) {
                        if events_tx.send(Event::Intent(intent)).is_err() {
                            break;
                        }
                    }
                }
                Ok(None) => {
                    let _ = events_tx.send(Event::Intent(UserIntent::Quit));
                    break;
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    let _ = events_tx.send(Event::Intent(UserIntent::Quit));
                    break;
                }
            }
        }
    });

    view.display_help().await?;
    presenter.run(events_rx).await?;

    info!("Stopping wallet watcher...");
    wallet_watcher.stop().await;

    Ok(())
}
