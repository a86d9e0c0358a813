use crate::chain::ReceiptService;
use crate::entity::{Event, TxKind, TxStatus};
use alloy::primitives::TxHash;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};

/// Polls receipts of submitted transactions until they are mined
pub struct ConfirmationService {
    receipt_service: Arc<dyn ReceiptService>,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl ConfirmationService {
    pub fn new(
        receipt_service: Arc<dyn ReceiptService>,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            receipt_service,
            poll_interval,
            timeout,
        }
    }

    /// Poll until the transaction has a final status. Without a timeout this
    /// waits for as long as the receipt stays missing.
    pub async fn wait_for(&self, hash: TxHash) -> TxStatus {
        let mut ticker = interval(self.poll_interval);
        let started = Instant::now();

        loop {
            ticker.tick().await;

            match self.receipt_service.status(hash).await {
                Ok(TxStatus::Pending) => {
                    debug!("{} still pending ({:.2?})", hash, started.elapsed())
                }
                Ok(status) => return status,
                Err(e) => warn!("Receipt poll for {} failed: {}", hash, e),
            }

            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    warn!("Gave up waiting for {} after {:.2?}", hash, timeout);
                    return TxStatus::TimedOut;
                }
            }
        }
    }

    /// Watch a transaction in the background and report its final status to
    /// the session loop. The watch ends early once the loop has gone away.
    pub fn watch(
        self: &Arc<Self>,
        kind: TxKind,
        hash: TxHash,
        events: UnboundedSender<Event>,
    ) -> JoinHandle<()> {
        let service = Arc::clone(self);

        tokio::spawn(async move {
            select! {
                status = service.wait_for(hash) => {
                    info!("{:?} transaction {} finished: {:?}", kind, hash, status);
                    if events.send(Event::TxStatusChanged { kind, hash, status }).is_err() {
                        debug!("Session closed before {} was reported", hash);
                    }
                }
                _ = events.closed() => {
                    debug!("Stopped watching {}: session closed", hash);
                }
            }
        })
    }
}
