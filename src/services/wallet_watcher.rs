use crate::chain::WalletConnector;
use crate::entity::Event;
use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::interval;

/// Reports the connected account and chain to the session loop on a timer.
/// Unchanged reports are ignored by the session.
pub struct WalletWatcher {
    connector: Arc<dyn WalletConnector>,
    poll_interval: Duration,
    stop_tx: Option<mpsc::Sender<()>>,
}

impl WalletWatcher {
    pub fn new(connector: Arc<dyn WalletConnector>, poll_interval: Duration) -> Self {
        Self {
            connector,
            poll_interval,
            stop_tx: None,
        }
    }

    pub fn start(&mut self, events: UnboundedSender<Event>) -> Result<()> {
        if self.stop_tx.is_some() {
            warn!("Wallet watcher is already running");
            return Ok(());
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        self.stop_tx = Some(stop_tx);

        let connector = self.connector.clone();
        let mut ticker = interval(self.poll_interval);

        tokio::spawn(async move {
            loop {
                select! {
                    _ = ticker.tick() => {
                        match connector.connection().await {
                            Ok(connection) => {
                                let event = Event::WalletChanged {
                                    account: connection.account,
                                    chain_id: connection.chain_id,
                                };
                                if events.send(event).is_err() {
                                    debug!("Session closed, stopping wallet watcher");
                                    break;
                                }
                            }
                            Err(e) => warn!("Failed to read wallet connection: {}", e),
                        }
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping wallet watcher");
                        break;
                    }
                }
            }
        });

        info!("Wallet watcher started");
        Ok(())
    }

    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Connection;
    use alloy::primitives::Address;
    use async_trait::async_trait;

    struct FixedConnector(Connection);

    #[async_trait]
    impl WalletConnector for FixedConnector {
        async fn connection(&self) -> Result<Connection> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn reports_connection_until_stopped() {
        let account = Address::new([0xa1; 20]);
        let connector = Arc::new(FixedConnector(Connection {
            account: Some(account),
            chain_id: 1,
        }));
        let mut watcher = WalletWatcher::new(connector, Duration::from_millis(1));
        let (tx, mut rx) = mpsc::unbounded_channel();

        watcher.start(tx).unwrap();

        match rx.recv().await {
            Some(Event::WalletChanged { account: seen, chain_id }) => {
                assert_eq!(seen, Some(account));
                assert_eq!(chain_id, 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        watcher.stop().await;
    }
}
