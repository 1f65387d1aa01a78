// src/services/rate_limiter.rs

//! Per-client fixed-window admission control.
//!
//! Guards outbound upstream calls: each client identity gets `capacity`
//! requests per `window`. State lives in this process only, so several proxy
//! instances each enforce their own budget.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::RateLimitConfig;

/// Identity shared by every caller whose address cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    reset_at: Instant,
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted { remaining: u32 },
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

/// Fixed-window rate limiter keyed by client identity.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    window: Duration,
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl RateLimiter {
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            capacity,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.capacity, config.window())
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject one request from `client_id`.
    pub fn admit(&self, client_id: &str) -> bool {
        self.check(client_id).is_admitted()
    }

    /// Admission check against the current time.
    pub fn check(&self, client_id: &str) -> Admission {
        self.check_at(client_id, Instant::now())
    }

    /// Admission check against an explicit instant.
    ///
    /// An expired window is overwritten in place, which is the only eviction.
    pub fn check_at(&self, client_id: &str, now: Instant) -> Admission {
        let mut windows = self.windows.lock();

        if let Some(window) = windows.get_mut(client_id) {
            if now <= window.reset_at {
                if window.count < self.capacity {
                    window.count += 1;
                    return Admission::Admitted {
                        remaining: self.capacity - window.count,
                    };
                }
                log::debug!("Rate limit exceeded for client {}", client_id);
                return Admission::Rejected {
                    retry_after: self.window,
                };
            }
        }

        windows.insert(
            client_id.to_string(),
            RateWindow {
                count: 1,
                reset_at: now + self.window,
            },
        );
        Admission::Admitted {
            remaining: self.capacity.saturating_sub(1),
        }
    }

    /// Number of client identities with a recorded window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }
}

/// Derive a client identity from proxy headers.
///
/// Takes the leftmost `X-Forwarded-For` entry, then `X-Real-IP`, then
/// [`UNKNOWN_CLIENT`].
pub fn client_identity(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    forwarded_for
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| real_ip.map(str::trim).filter(|ip| !ip.is_empty()))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
