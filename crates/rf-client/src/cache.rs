//! Memoized async resource store.
//!
//! Each resource kind gets its own cache instance; entries are keyed by
//! the request parameters (the composite key) and hold the last fetched
//! value together with its fetch instant. Reads within the freshness
//! window short-circuit the fetch; stale reads serve the last value and
//! revalidate in the background; failed fetches are never stored.
//!
//! Concurrent reads of the same key are deduplicated by a per-key lock:
//! waiters re-check the slot once the holder has stored, so one network
//! request serves them all. The stale-response guard is structural:
//! every request writes only to the slot of its own key, so a late
//! response for an abandoned key can never contaminate another key's
//! slot.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::ClientResult;

/// How a read treats an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPolicy {
    /// Serve a fresh entry without fetching; revalidate stale entries
    /// in the background while serving the last value.
    Cached,
    /// Fetch unconditionally, replacing whatever is stored.
    Refresh,
}

struct Slot<V> {
    value: V,
    fetched_at: Instant,
}

pub struct ResourceCache<K, V> {
    name: &'static str,
    ttl: Duration,
    slots: Mutex<HashMap<K, Slot<V>>>,
    inflight: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K, V> ResourceCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            ttl,
            slots: Mutex::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
        })
    }

    /// Read through the cache.
    ///
    /// `fetch` is invoked at most once per concurrent read of the same
    /// key; with [`ReadPolicy::Refresh`] the freshness window is
    /// ignored but in-flight dedup still applies.
    pub async fn read<F, Fut>(
        self: &Arc<Self>,
        key: K,
        policy: ReadPolicy,
        fetch: F,
    ) -> ClientResult<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<V>> + Send + 'static,
    {
        let requested_at = Instant::now();

        if policy == ReadPolicy::Cached {
            let stale = {
                let slots = self.slots.lock().await;
                match slots.get(&key) {
                    Some(slot) if slot.fetched_at.elapsed() < self.ttl => {
                        debug!(cache = self.name, "fresh hit");
                        return Ok(slot.value.clone());
                    }
                    Some(slot) => Some(slot.value.clone()),
                    None => None,
                }
            };
            if let Some(value) = stale {
                // Stale-while-revalidate: hand back the old value and
                // refresh off the caller's path.
                debug!(cache = self.name, "stale hit, revalidating");
                let me = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(err) = me.fetch_and_store(key, true, requested_at, fetch).await {
                        warn!(cache = me.name, "background revalidation failed: {err}");
                    }
                });
                return Ok(value);
            }
            debug!(cache = self.name, "miss");
            return self.fetch_and_store(key, true, requested_at, fetch).await;
        }

        self.fetch_and_store(key, false, requested_at, fetch).await
    }

    /// Drop a stored entry, forcing the next read to fetch.
    pub async fn invalidate(&self, key: &K) {
        self.slots.lock().await.remove(key);
    }

    /// Fetch under the per-key lock and store on success.
    ///
    /// After acquiring the lock the slot is re-checked: a value stored
    /// while we waited (or, with `accept_fresh`, any value still inside
    /// the freshness window) is served instead of fetching again.
    async fn fetch_and_store<F, Fut>(
        &self,
        key: K,
        accept_fresh: bool,
        requested_at: Instant,
        fetch: F,
    ) -> ClientResult<V>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = ClientResult<V>> + Send,
    {
        let lock = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(
                inflight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        let _guard = lock.lock().await;

        {
            let slots = self.slots.lock().await;
            if let Some(slot) = slots.get(&key) {
                let fresh_enough = accept_fresh && slot.fetched_at.elapsed() < self.ttl;
                if fresh_enough || slot.fetched_at >= requested_at {
                    return Ok(slot.value.clone());
                }
            }
        }

        let value = fetch().await?;
        let mut slots = self.slots.lock().await;
        slots.insert(
            key,
            Slot {
                value: value.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(value)
    }
}
