// src/lib.rs

//! Freebie: a rate-limited proxy and browsing client for free-game giveaways.

pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod utils;
