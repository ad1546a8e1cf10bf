//! Draft transfer cache
//!
//! Carries an in-flight draft (possibly holding raw recording bytes) from
//! one screen to another across a navigation boundary where the two share
//! no memory. Entries are keyed by an opaque UUID and expire after a
//! bounded TTL so an abandoned hand-off cannot pin large payloads forever.
//!
//! Readers must treat an expired or unknown key exactly like a key that
//! never existed and route to a safe start state. Nothing here survives a
//! process restart.

use crate::domain::draft::Draft;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Default entry lifetime: long enough for a slow redirect, short enough
/// to bound memory held by abandoned drafts
pub const DEFAULT_DRAFT_TTL: Duration = Duration::from_secs(15 * 60);

struct CacheEntry {
    draft: Draft,
    stored_at: Instant,
}

/// Ephemeral keyed store for in-flight drafts
pub struct DraftTransferCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl DraftTransferCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_DRAFT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a draft, returning the opaque key the receiving screen uses
    pub fn put(&self, draft: Draft) -> String {
        let key = Uuid::new_v4().to_string();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.clone(),
            CacheEntry {
                draft,
                stored_at: Instant::now(),
            },
        );
        log::debug!("Cached draft under key {} ({} live)", key, entries.len());
        key
    }

    /// Non-destructive read. An expired entry behaves exactly like a
    /// missing one and is dropped on the way out.
    pub fn get(&self, key: &str) -> Option<Draft> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() > self.ttl => {
                entries.remove(key);
                log::debug!("Draft {} expired", key);
                None
            }
            Some(entry) => Some(entry.draft.clone()),
            None => None,
        }
    }

    /// Atomic read-and-remove for the one intended reader. A second call
    /// with the same key returns nothing.
    pub fn consume(&self, key: &str) -> Option<Draft> {
        let entry = self.entries.lock().unwrap().remove(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            log::debug!("Draft {} expired", key);
            return None;
        }
        log::debug!("Draft {} consumed", key);
        Some(entry.draft)
    }

    /// Explicit discard, e.g. when the capture flow is cancelled
    pub fn remove(&self, key: &str) {
        if self.entries.lock().unwrap().remove(key).is_some() {
            log::debug!("Discarded draft {}", key);
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() <= self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            log::debug!("Swept {} expired draft(s)", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Periodic sweep for hosts that keep the process alive. Lazy expiry
    /// on access covers correctness without it; this only bounds memory.
    pub fn spawn_sweeper(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                self.sweep();
            }
        })
    }
}

impl Default for DraftTransferCache {
    fn default() -> Self {
        Self::new()
    }
}
