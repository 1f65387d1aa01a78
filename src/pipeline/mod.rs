//! Client-side browsing over fetched listing batches.
//!
//! - `browser`: fetch lifecycle and last-request-wins orchestration
//! - `search`: case-insensitive substring filter
//! - `pagination`: page windows over the filtered set
//! - `debounce`: coalescing of search-text updates

pub mod browser;
pub mod debounce;
pub mod pagination;
pub mod search;

pub use browser::{
    BrowserView, FetchState, FetchTicket, GiveawayBrowser, GiveawayFetcher, SharedBrowser,
};
pub use debounce::SearchDebouncer;
