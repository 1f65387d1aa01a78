// src/models/mod.rs

//! Domain models for the giveaway proxy and its client pipeline.

mod config;
mod filters;
mod giveaway;
mod platform;
mod query;

// Re-export all public types
pub use config::{BrowseConfig, CacheConfig, Config, RateLimitConfig, ServerConfig, UpstreamConfig};
pub use filters::{FilterPatch, FilterState};
pub use giveaway::{
    GiveawayStats, Listing, ListingKind, NOT_AVAILABLE, PLACEHOLDER_THUMBNAIL, parse_timestamp,
    time_left,
};
pub use platform::{PLATFORM_TABLE, PlatformBadge, PlatformEntry, display_name, platform_icon};
pub use query::{ALL, ApiRequest, GiveawayType, NormalizedQuery, Platform, Selection, SortBy};
