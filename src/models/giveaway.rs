// src/models/giveaway.rs

//! Giveaway listing and aggregate stats.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::platform::{PlatformBadge, platform_icon};

/// Image shown when a listing carries no thumbnail.
pub const PLACEHOLDER_THUMBNAIL: &str = "/placeholder-game.svg";

/// Marker the upstream uses for "no value" in worth and date fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// A giveaway record.
///
/// Field names on the wire are the upstream's own; the proxy forwards them
/// verbatim, including any field this struct does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,

    #[serde(default)]
    pub title: String,

    /// Localized currency string or "N/A"
    #[serde(default)]
    pub worth: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub instructions: String,

    #[serde(rename = "open_giveaway_url", default)]
    pub claim_url: String,

    #[serde(default)]
    pub published_date: String,

    /// End timestamp, or "N/A" when the giveaway does not expire
    #[serde(default)]
    pub end_date: String,

    /// Comma-joined platform display names
    #[serde(default)]
    pub platforms: String,

    #[serde(rename = "users", default)]
    pub claim_count: u64,

    /// Free-text upstream type ("Game", "DLC", "Early Access", ...)
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing {
    /// Platform display names in wire order.
    pub fn platform_names(&self) -> Vec<&str> {
        self.platforms
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Platform names paired with their icons. Unknown names are kept.
    pub fn platform_badges(&self) -> Vec<PlatformBadge> {
        self.platform_names()
            .into_iter()
            .map(|name| PlatformBadge {
                name: name.to_string(),
                icon: platform_icon(name),
            })
            .collect()
    }

    /// Display category derived from the free-text type.
    pub fn kind(&self) -> ListingKind {
        ListingKind::from_upstream(&self.kind)
    }

    /// Publication time, if it parses.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.published_date)
    }

    /// Expiry time, if present and parseable.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.end_date)
    }

    /// Countdown badge text, or `None` when there is nothing to count down to.
    pub fn time_left(&self, now: DateTime<Utc>) -> Option<String> {
        time_left(self.ends_at()?, now)
    }

    pub fn thumbnail_or_placeholder(&self) -> &str {
        match self.thumbnail.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => PLACEHOLDER_THUMBNAIL,
        }
    }
}

/// Display refinement of the upstream's free-text giveaway type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingKind {
    Game,
    Dlc,
    EarlyAccess,
    Other,
}

impl ListingKind {
    pub fn from_upstream(raw: &str) -> Self {
        let kind = raw.trim().to_lowercase();
        if kind.contains("early access") || kind.contains("early-access") || kind == "beta" {
            ListingKind::EarlyAccess
        } else if kind.contains("dlc") || kind.contains("loot") {
            ListingKind::Dlc
        } else if kind.contains("game") {
            ListingKind::Game
        } else {
            ListingKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Game => "game",
            ListingKind::Dlc => "dlc",
            ListingKind::EarlyAccess => "early-access",
            ListingKind::Other => "other",
        }
    }
}

/// Parse an upstream timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC) and bare dates.
/// Empty, "N/A" and malformed values yield `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// Countdown text from `now` until `ends_at`; `None` once the end has passed.
pub fn time_left(ends_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
    let remaining = ends_at.signed_duration_since(now);
    if remaining.num_seconds() <= 0 {
        return None;
    }

    let days = remaining.num_days();
    if days > 0 {
        return Some(format!("{} day{} left", days, plural(days)));
    }
    let hours = remaining.num_hours();
    Some(format!("{} hour{} left", hours, plural(hours)))
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Aggregate totals across every live giveaway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiveawayStats {
    #[serde(alias = "worth_estimation_usd", deserialize_with = "string_or_number")]
    pub total_worth: String,

    #[serde(alias = "active_giveaways_number")]
    pub total_count: u64,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
