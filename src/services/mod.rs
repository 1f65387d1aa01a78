//! Service layer for the giveaway proxy.
//!
//! This module contains:
//! - Admission control (`RateLimiter`)
//! - Query validation (`normalize`, `resolve`)
//! - The upstream gateway (`UpstreamGateway`)
//! - The client for a running proxy (`ProxyClient`)

pub mod gateway;
pub mod normalizer;
pub mod proxy_client;
pub mod rate_limiter;

pub use gateway::{
    CacheDirective, GiveawaySource, ListOutcome, NO_GIVEAWAYS_STATUS, UpstreamGateway,
};
pub use normalizer::{RawQuery, normalize, parse_id, resolve};
pub use proxy_client::ProxyClient;
pub use rate_limiter::{Admission, RateLimiter, UNKNOWN_CLIENT, client_identity};
