//! Time-to-live cache around a [`WhitelistSource`].

use quadfund_types::{Address, Clock, SystemClock, Timestamp};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::source::WhitelistSource;

/// Default lifetime of a fetched allow-list.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// After a failed fetch, lookups serve what is cached for this long (capped at
/// the TTL) before another fetch is attempted.
pub const FAILURE_BACKOFF_SECS: u64 = 30;

struct Snapshot {
    members: HashSet<String>,
    fetched_at: Timestamp,
}

/// Process-wide allow-list.
///
/// Lookups read the cached set. After the TTL the next lookup refreshes it;
/// concurrent lookups during a refresh wait for that one fetch rather than
/// issuing their own. A failed fetch is not retried until the backoff passes,
/// so waiters queued behind it reuse the last known list.
pub struct Whitelist<S> {
    source: S,
    clock: Arc<dyn Clock>,
    ttl_secs: u64,
    enabled: bool,
    snapshot: RwLock<Option<Snapshot>>,
    /// Held while fetching; holds the time of the last failed fetch.
    refresh: Mutex<Option<Timestamp>>,
}

impl<S: WhitelistSource> Whitelist<S> {
    pub fn new(source: S) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), DEFAULT_TTL_SECS)
    }

    pub fn with_clock(source: S, clock: Arc<dyn Clock>, ttl_secs: u64) -> Self {
        Self {
            source,
            clock,
            ttl_secs,
            enabled: true,
            snapshot: RwLock::new(None),
            refresh: Mutex::new(None),
        }
    }

    /// A whitelist that admits everyone and never calls its source.
    pub fn disabled(source: S) -> Self {
        Self {
            enabled: false,
            ..Self::new(source)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether `address` is on the allow-list.
    pub async fn is_allowed(&self, address: &Address) -> bool {
        if !self.enabled {
            return true;
        }
        let key = address.normalized();

        if let Some(hit) = self.lookup_fresh(&key).await {
            return hit;
        }

        let mut last_failure = self.refresh.lock().await;
        // Another task may have refreshed while we waited.
        if let Some(hit) = self.lookup_fresh(&key).await {
            return hit;
        }
        let backoff = FAILURE_BACKOFF_SECS.min(self.ttl_secs);
        let now = self.clock.now();
        let backing_off = last_failure.is_some_and(|at| !at.has_expired(backoff, now));
        if !backing_off {
            *last_failure = self.refresh_snapshot().await.then_some(now);
        }

        self.snapshot
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.members.contains(&key))
    }

    /// Number of addresses currently cached.
    pub async fn cached_len(&self) -> usize {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map_or(0, |s| s.members.len())
    }

    /// Drop the cached list so the next lookup refetches.
    pub async fn invalidate(&self) {
        *self.refresh.lock().await = None;
        if let Some(snapshot) = self.snapshot.write().await.as_mut() {
            snapshot.fetched_at = Timestamp::EPOCH;
        }
    }

    async fn lookup_fresh(&self, key: &str) -> Option<bool> {
        let now = self.clock.now();
        let guard = self.snapshot.read().await;
        let snapshot = guard.as_ref()?;
        if snapshot.fetched_at.has_expired(self.ttl_secs, now) {
            return None;
        }
        Some(snapshot.members.contains(key))
    }

    /// Fetch and swap in a new list. Returns true if the fetch failed.
    async fn refresh_snapshot(&self) -> bool {
        let failed = match self.source.fetch().await {
            Ok(list) => {
                let members: HashSet<String> = list
                    .iter()
                    .map(|a| a.trim().to_lowercase())
                    .filter(|a| !a.is_empty())
                    .collect();
                info!(count = members.len(), "whitelist refreshed");
                *self.snapshot.write().await = Some(Snapshot {
                    members,
                    fetched_at: self.clock.now(),
                });
                false
            }
            Err(e) => {
                if self.snapshot.read().await.is_some() {
                    warn!(error = %e, "whitelist refresh failed, serving last known list");
                } else {
                    warn!(error = %e, "whitelist fetch failed and no list cached, denying");
                }
                true
            }
        };
        debug!(ttl_secs = self.ttl_secs, failed, "whitelist refresh attempt finished");
        failed
    }
}
