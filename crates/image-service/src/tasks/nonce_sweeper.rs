//! Expired nonce sweeper.
//!
//! Lookups already ignore expired nonces. This task bounds the size of the
//! active set when issued nonces are never presented.
//!
//! # Graceful Shutdown
//!
//! The task exits when the cancellation token is triggered.

use crate::services::NonceManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Start the nonce sweeper background task.
///
/// # Arguments
///
/// * `nonces` - The shared active nonce set
/// * `interval` - Time between sweeps
/// * `cancel_token` - Token for graceful shutdown
///
/// # Returns
///
/// Returns when the cancellation token is triggered.
#[instrument(skip_all, name = "image.task.nonce_sweeper")]
pub async fn start_nonce_sweeper(
    nonces: Arc<NonceManager>,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    info!(
        target: "image.task.nonce_sweeper",
        interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        "Starting nonce sweeper task"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let purged = nonces.purge_expired();
                if purged > 0 {
                    debug!(
                        target: "image.task.nonce_sweeper",
                        purged,
                        active = nonces.active_count(),
                        "Purged expired nonces"
                    );
                }
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "image.task.nonce_sweeper",
                    "Nonce sweeper received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(target: "image.task.nonce_sweeper", "Nonce sweeper task stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(1_000);
    const SWEEP: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_expired_nonces() {
        let nonces = Arc::new(NonceManager::new(TIMEOUT));
        for _ in 0..5 {
            nonces.issue().unwrap();
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(start_nonce_sweeper(
            Arc::clone(&nonces),
            SWEEP,
            cancel_token.clone(),
        ));

        tokio::time::sleep(TIMEOUT + SWEEP * 2).await;
        assert_eq!(nonces.active_count(), 0);

        cancel_token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_keeps_live_nonces() {
        let nonces = Arc::new(NonceManager::new(TIMEOUT));
        let nonce = nonces.issue().unwrap();

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(start_nonce_sweeper(
            Arc::clone(&nonces),
            SWEEP,
            cancel_token.clone(),
        ));

        tokio::time::sleep(TIMEOUT / 2).await;
        assert_eq!(nonces.active_count(), 1);
        assert!(nonces.validate_and_consume(&nonce));

        cancel_token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_exits_on_cancel() {
        let nonces = Arc::new(NonceManager::new(TIMEOUT));
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(start_nonce_sweeper(
            nonces,
            Duration::from_secs(3600),
            cancel_token.clone(),
        ));

        cancel_token.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper should stop promptly")
            .unwrap();
    }
}
