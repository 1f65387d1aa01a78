// src/models/platform.rs

//! Display-name table for the platforms listings mention.
//!
//! Listings name platforms by display name ("Epic Games Store", "Xbox Series
//! X|S"). Matching is case-sensitive; names missing from the table are still
//! shown, just without an icon.

use serde::Serialize;

use super::query::Platform;

/// One known platform display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformEntry {
    /// Display name as it appears in a listing's `platforms` field
    pub name: &'static str,
    /// Brand icon identifier, when one exists
    pub icon: Option<&'static str>,
    /// Matching query filter, when the upstream supports one
    pub slug: Option<Platform>,
}

const fn entry(
    name: &'static str,
    icon: Option<&'static str>,
    slug: Option<Platform>,
) -> PlatformEntry {
    PlatformEntry { name, icon, slug }
}

pub const PLATFORM_TABLE: &[PlatformEntry] = &[
    entry("PC", Some("windows"), Some(Platform::Pc)),
    entry("Steam", Some("steam"), Some(Platform::Steam)),
    entry("Epic Games Store", None, Some(Platform::EpicGamesStore)),
    entry("Ubisoft", None, Some(Platform::Ubisoft)),
    entry("GOG", None, Some(Platform::Gog)),
    entry("Itch.io", Some("itch-io"), Some(Platform::Itchio)),
    entry("Playstation 4", Some("playstation"), Some(Platform::Ps4)),
    entry("Playstation 5", Some("playstation"), Some(Platform::Ps5)),
    entry("Xbox One", Some("xbox"), Some(Platform::XboxOne)),
    entry("Xbox Series X|S", Some("xbox"), Some(Platform::XboxSeriesXs)),
    entry("Nintendo Switch", None, Some(Platform::Switch)),
    entry("Android", Some("android"), Some(Platform::Android)),
    entry("iOS", Some("apple"), Some(Platform::Ios)),
    entry("VR", None, Some(Platform::Vr)),
    entry("Battle.net", None, Some(Platform::Battlenet)),
    entry("Origin", None, Some(Platform::Origin)),
    entry("DRM-Free", None, Some(Platform::DrmFree)),
    entry("Xbox 360", Some("xbox"), Some(Platform::Xbox360)),
];

/// Look up a display name in the platform table.
pub fn lookup(name: &str) -> Option<&'static PlatformEntry> {
    PLATFORM_TABLE.iter().find(|e| e.name == name)
}

/// Icon for a platform display name.
pub fn platform_icon(name: &str) -> Option<&'static str> {
    lookup(name).and_then(|e| e.icon)
}

/// Display name for a query platform, falling back to its slug.
pub fn display_name(platform: Platform) -> &'static str {
    PLATFORM_TABLE
        .iter()
        .find(|e| e.slug == Some(platform))
        .map_or(platform.as_str(), |e| e.name)
}

/// A platform name paired with its icon, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformBadge {
    pub name: String,
    pub icon: Option<&'static str>,
}
