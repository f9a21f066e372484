//! # session-store
//!
//! Per-customer session map with per-key mutual exclusion and TTL eviction.
//! Locking is per customer identity only; operations for distinct customers
//! never block each other. The store itself cannot fail.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use kasibot_core::Session;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Default time-to-live since last touch for abandoned sessions.
pub const DEFAULT_TTL_SECS: i64 = 30 * 60;

/// Session store keyed by customer channel address.
///
/// Each entry holds its own async mutex, so one customer's in-flight
/// mutation serializes that customer's messages (at-most-one-in-flight) while
/// leaving every other customer fully parallel. Entries are cleared in place
/// on reset (an in-flight guard stays valid) and removed only by the TTL
/// sweep, which skips entries that are currently locked.
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }

    fn slot(&self, customer_id: &str, business_id: i64) -> Arc<Mutex<Session>> {
        self.sessions
            .entry(customer_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new(business_id))))
            .clone()
    }

    /// Acquires the per-customer lock, creating the session on first use.
    /// The guard is owned so the caller can hold it across a whole
    /// classification + module step and release it before any outbound send.
    pub async fn lock(&self, customer_id: &str, business_id: i64) -> OwnedMutexGuard<Session> {
        let mut guard = self.slot(customer_id, business_id).lock_owned().await;
        guard.touch();
        guard
    }

    /// Applies a transformation under the per-customer lock.
    pub async fn mutate<F, R>(&self, customer_id: &str, business_id: i64, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut guard = self.lock(customer_id, business_id).await;
        f(&mut guard)
    }

    /// Snapshot of the customer's session, if one exists.
    pub async fn get(&self, customer_id: &str) -> Option<Session> {
        let slot = self.sessions.get(customer_id).map(|e| e.value().clone())?;
        let guard = slot.lock().await;
        Some(guard.clone())
    }

    /// True when the customer currently has a module-owned flow.
    pub async fn has_active_flow(&self, customer_id: &str) -> bool {
        match self.get(customer_id).await {
            Some(s) => s.in_flow(),
            None => false,
        }
    }

    /// Clears the customer's session back to the no-flow state.
    pub async fn reset(&self, customer_id: &str) {
        if let Some(slot) = self.sessions.get(customer_id).map(|e| e.value().clone()) {
            let mut guard = slot.lock().await;
            guard.clear();
            guard.touch();
        }
    }

    /// Removes entries idle for longer than the TTL. Entries whose lock is
    /// currently held are left alone. Returns the number evicted.
    pub fn evict_expired(&self) -> usize {
        let cutoff = Utc::now() - self.ttl;
        // Counted inside the closure: a len() diff is wrong when another
        // task inserts a session while the sweep is mid-retain.
        let mut evicted = 0;
        self.sessions.retain(|_, slot| match slot.try_lock() {
            Ok(guard) => {
                let keep = guard.last_touch >= cutoff;
                if !keep {
                    evicted += 1;
                }
                keep
            }
            Err(_) => true,
        });
        if evicted > 0 {
            debug!(evicted, "evicted expired sessions");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
