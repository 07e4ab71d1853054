//! Single-use, time-boxed nonce store.
//!
//! A nonce is a 20-byte CSPRNG value, hex-encoded. It is in the active set
//! iff it has been issued and has neither been consumed nor passed its
//! deadline.
//!
//! # Concurrency
//!
//! Every operation (issue, consume, remove, purge) runs under one
//! `std::sync::Mutex`. Critical sections are short and never await, so a
//! blocking mutex is used rather than an async one.
//!
//! # Expiry
//!
//! Each entry carries a monotonic deadline (`tokio::time::Instant`). Expired
//! entries are purged at the start of every locked operation, so a lookup
//! never honours an expired nonce. The background sweeper in
//! `tasks::nonce_sweeper` bounds memory for nonces nobody comes back for.

use crate::observability::metrics::{
    record_nonce_consumed, record_nonce_issued, record_nonces_expired, set_active_nonces,
};
use ring::rand::{SecureRandom, SystemRandom};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Number of random bytes in a nonce (40 hex characters once encoded).
pub const NONCE_BYTES: usize = 20;

#[derive(Debug, Error)]
pub enum NonceError {
    #[error("Failed to generate random nonce bytes")]
    RandomGeneration,
}

/// Process-wide active nonce set.
pub struct NonceManager {
    active: Mutex<HashMap<String, Instant>>,
    timeout: Duration,
    rng: SystemRandom,
}

impl NonceManager {
    /// Create an empty manager whose nonces live for `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
            timeout,
            rng: SystemRandom::new(),
        }
    }

    /// Mint a nonce valid until `now + timeout`.
    ///
    /// # Errors
    ///
    /// Returns `NonceError::RandomGeneration` if the system RNG fails.
    pub fn issue(&self) -> Result<String, NonceError> {
        let mut bytes = [0u8; NONCE_BYTES];
        self.rng.fill(&mut bytes).map_err(|_| {
            tracing::error!(target: "image.services.nonce", "Failed to generate random bytes");
            NonceError::RandomGeneration
        })?;
        let nonce = hex::encode(bytes);

        let now = Instant::now();
        let mut active = self.lock();
        Self::purge_locked(&mut active, now);
        active.insert(nonce.clone(), now + self.timeout);
        let remaining = active.len();
        drop(active);

        record_nonce_issued();
        set_active_nonces(remaining);
        tracing::debug!(target: "image.services.nonce", active = remaining, "Nonce issued");

        Ok(nonce)
    }

    /// Atomically check and remove `value`.
    ///
    /// Returns `true` exactly once for a nonce that was issued and has not
    /// expired. Every later call with the same value returns `false`.
    pub fn validate_and_consume(&self, value: &str) -> bool {
        if value.is_empty() {
            record_nonce_consumed(false);
            return false;
        }

        let mut active = self.lock();
        Self::purge_locked(&mut active, Instant::now());
        let accepted = active.remove(value).is_some();
        let remaining = active.len();
        drop(active);

        record_nonce_consumed(accepted);
        set_active_nonces(remaining);
        if accepted {
            tracing::debug!(target: "image.services.nonce", active = remaining, "Nonce consumed");
        } else {
            tracing::debug!(target: "image.services.nonce", "Nonce rejected: unknown, used or expired");
        }

        accepted
    }

    /// Remove `value` if present. No-op otherwise.
    pub fn remove(&self, value: &str) {
        let mut active = self.lock();
        active.remove(value);
        set_active_nonces(active.len());
    }

    /// Drop every entry whose deadline has passed and return how many went.
    pub fn purge_expired(&self) -> usize {
        let mut active = self.lock();
        let purged = Self::purge_locked(&mut active, Instant::now());
        set_active_nonces(active.len());
        purged
    }

    /// Number of nonces currently in the active set, expired ones included
    /// until the next purge.
    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        // A panic while holding the lock cannot leave the map half-updated;
        // every mutation is a single HashMap call.
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn purge_locked(active: &mut HashMap<String, Instant>, now: Instant) -> usize {
        let before = active.len();
        active.retain(|_, deadline| *deadline > now);
        let purged = before - active.len();
        record_nonces_expired(purged);
        purged
    }
}
