// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-use enforcement for accepted challenges.
//!
//! Keyed by the challenge hash, so the same signed challenge cannot be
//! exchanged for a second token while it is still inside its validity
//! window. Entries only need to outlive that window.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

/// In-process LRU + TTL cache of consumed challenge hashes.
pub struct ReplayGuard {
    cache: Mutex<LruCache<[u8; 32], Instant>>,
    ttl: Duration,
}

impl ReplayGuard {
    /// - `capacity`: max number of consumed challenges remembered.
    /// - `ttl`: how long a consumed challenge stays blocked.
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Record `hash` as consumed.
    ///
    /// Returns `true` the first time a hash is seen (or after its entry
    /// expired) and `false` for a replay. Check and insert happen under one
    /// lock.
    pub fn check_and_insert(&self, hash: &[u8; 32]) -> bool {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if let Some(seen_at) = cache.get(hash) {
            if now.duration_since(*seen_at) < self.ttl {
                return false;
            }
        }
        cache.put(*hash, now);
        true
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
