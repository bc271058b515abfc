// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-domain fetch courtesy: one in-flight request and a rate quota per domain

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use url::Url;

use crate::crawl::registrable_domain;

/// Held for the duration of one fetch; releases the domain on drop
pub type CourtesyPermit = OwnedMutexGuard<()>;

pub struct DomainCourtesy {
    limiter: DefaultKeyedRateLimiter<String>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    requests_per_minute: u32,
}

impl DomainCourtesy {
    /// Zero falls back to 60 requests per minute
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN.saturating_add(59));
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(rpm)),
            in_flight: Mutex::new(HashMap::new()),
            requests_per_minute: rpm.get(),
        }
    }

    /// Wait until `url`'s domain is idle and within quota
    pub async fn acquire(&self, url: &str) -> CourtesyPermit {
        let key = courtesy_key(url);

        let slot = {
            let mut in_flight = self.in_flight.lock().await;
            // Slots referenced only by the map have no holder or waiter
            in_flight.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };
        let permit = slot.lock_owned().await;

        self.limiter.until_key_ready(&key).await;
        permit
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}

/// Registrable domain, else the literal host, else the whole string
fn courtesy_key(url: &str) -> String {
    registrable_domain(url)
        .or_else(|| {
            Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
        })
        .unwrap_or_else(|| url.to_string())
}
