// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-domain policy caching
//!
//! A domain's policy is fetched at most once per TTL window.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::policy::PolicyFetch;

#[derive(Debug, Clone)]
struct CachedPolicy {
    outcome: PolicyFetch,
    fetched_at: Instant,
}

/// Policy cache statistics
#[derive(Debug)]
pub struct PolicyCacheStats {
    pub domains: usize,
    pub expired: usize,
    pub max: usize,
}

/// Policy outcomes keyed by registrable domain, expiring after a TTL
pub struct PolicyCache {
    entries: RwLock<HashMap<String, CachedPolicy>>,
    ttl: Duration,
    max_entries: usize,
}

impl PolicyCache {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        }
    }

    /// Cached outcome for `domain` if still fresh
    pub fn get(&self, domain: &str) -> Option<PolicyFetch> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(&domain.to_ascii_lowercase())?;
        if entry.fetched_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.outcome.clone())
    }

    pub fn insert(&self, domain: &str, outcome: PolicyFetch) {
        let mut entries = match self.entries.write() {
            Ok(e) => e,
            Err(_) => return,
        };

        let key = domain.to_ascii_lowercase();
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            Self::evict_oldest(&mut entries);
        }

        entries.insert(
            key,
            CachedPolicy {
                outcome,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> PolicyCacheStats {
        let (domains, expired) = match self.entries.read() {
            Ok(entries) => (
                entries.len(),
                entries
                    .values()
                    .filter(|e| e.fetched_at.elapsed() > self.ttl)
                    .count(),
            ),
            Err(_) => (0, 0),
        };
        PolicyCacheStats {
            domains,
            expired,
            max: self.max_entries,
        }
    }

    fn evict_oldest(entries: &mut HashMap<String, CachedPolicy>) {
        if let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, v)| v.fetched_at)
            .map(|(k, _)| k.clone())
        {
            entries.remove(&oldest);
        }
    }
}
