//! Short-lived cache of confirmed live sessions
//!
//! Lets the access guard skip the user lookup for a subject whose session was
//! confirmed within the last `ttl`. Staleness is bounded by `ttl`, which the
//! configuration caps at `MAX_SESSION_CACHE_SECS`. Logout and login on this
//! process evict the subject immediately.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::auth::user::Identity;
use crate::constants::SESSION_CACHE_CAPACITY;

struct CachedSession {
    identity: Identity,
    confirmed_at: Instant,
}

pub struct SessionCache {
    entries: Mutex<LruCache<i64, CachedSession>>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, SESSION_CACHE_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// A cache that never holds anything
    pub fn disabled() -> Self {
        Self::with_capacity(Duration::ZERO, 1)
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Returns the cached identity if the session was confirmed within `ttl`
    pub async fn get(&self, subject: i64) -> Option<Identity> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.lock().await;
        match entries.get(&subject) {
            Some(entry) if entry.confirmed_at.elapsed() < self.ttl => Some(entry.identity.clone()),
            Some(_) => {
                entries.pop(&subject);
                None
            }
            None => None,
        }
    }

    /// Records a session confirmed against storage just now
    pub async fn confirm(&self, identity: Identity) {
        if !self.is_enabled() {
            return;
        }
        let subject = identity.id;
        self.entries.lock().await.put(
            subject,
            CachedSession {
                identity,
                confirmed_at: Instant::now(),
            },
        );
    }

    pub async fn evict(&self, subject: i64) {
        self.entries.lock().await.pop(&subject);
    }
}
