// src/models/query.rs

//! Query enumerations shared by the proxy and its clients.
//!
//! The server validates incoming parameters against these tables and the
//! client builds its filter state from the same types, so both sides agree on
//! what the proxy will accept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AppError, Result};

/// Sentinel meaning "no restriction" for platform and type filters.
pub const ALL: &str = "all";

/// Declares a closed enumeration with a fixed wire slug per variant.
macro_rules! slug_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $slug:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Query parameter name this value travels under.
            pub const FIELD: &'static str = $field;

            /// Wire slug for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }

            /// All wire slugs, in declaration order.
            pub fn slugs() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($slug => Ok($name::$variant),)+
                    _ => Err(AppError::invalid_option($field, &Self::slugs())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

slug_enum! {
    /// Platforms the upstream can filter by.
    Platform, "platform" {
        Pc => "pc",
        Steam => "steam",
        EpicGamesStore => "epic-games-store",
        Ubisoft => "ubisoft",
        Gog => "gog",
        Itchio => "itchio",
        Ps4 => "ps4",
        Ps5 => "ps5",
        XboxOne => "xbox-one",
        XboxSeriesXs => "xbox-series-xs",
        Switch => "switch",
        Android => "android",
        Ios => "ios",
        Vr => "vr",
        Battlenet => "battlenet",
        Origin => "origin",
        DrmFree => "drm-free",
        Xbox360 => "xbox-360",
    }
}

slug_enum! {
    /// Giveaway categories the upstream can filter by.
    GiveawayType, "type" {
        Game => "game",
        Loot => "loot",
        Beta => "beta",
    }
}

slug_enum! {
    /// Upstream ordering of the list endpoint.
    SortBy, "sort-by" {
        Date => "date",
        Value => "value",
        Popularity => "popularity",
    }
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::Date
    }
}

/// A filter that is either unrestricted or pinned to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    One(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: Copy> Selection<T> {
    /// The pinned value, if any.
    pub fn value(&self) -> Option<T> {
        match self {
            Selection::All => None,
            Selection::One(v) => Some(*v),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::One(v) => v.fmt(f),
        }
    }
}

impl<T: FromStr<Err = AppError>> FromStr for Selection<T> {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s == ALL {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::One)
        }
    }
}

impl<T> From<T> for Selection<T> {
    fn from(value: T) -> Self {
        Selection::One(value)
    }
}

/// A validated list query, ready to be forwarded upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NormalizedQuery {
    pub platform: Selection<Platform>,
    pub kind: Selection<GiveawayType>,
    pub sort_by: SortBy,
}

impl NormalizedQuery {
    /// Query pairs to send, omitting every parameter left at its default.
    pub fn params(&self) -> Vec<(&'static str, &'static str)> {
        let mut params = Vec::with_capacity(3);
        if let Some(platform) = self.platform.value() {
            params.push((Platform::FIELD, platform.as_str()));
        }
        if let Some(kind) = self.kind.value() {
            params.push((GiveawayType::FIELD, kind.as_str()));
        }
        if self.sort_by != SortBy::default() {
            params.push((SortBy::FIELD, self.sort_by.as_str()));
        }
        params
    }
}

/// Which proxy operation an incoming request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRequest {
    /// Filtered, sorted listing batch
    List(NormalizedQuery),
    /// Single listing by id
    Detail(u64),
    /// Aggregate totals
    Stats,
}
