// src/services/normalizer.rs

//! Validation of incoming query parameters.
//!
//! Every value is checked against its fixed enumeration; anything else is a
//! validation error naming the field and the allowed values. Nothing is
//! coerced.

use crate::error::{AppError, Result};
use crate::models::{ApiRequest, GiveawayType, NormalizedQuery, Platform, Selection, SortBy};

/// Query parameters exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    pub platform: Option<String>,
    /// The `type` parameter
    pub kind: Option<String>,
    /// The `sort-by` parameter
    pub sort_by: Option<String>,
    pub id: Option<String>,
    pub stats: Option<String>,
}

impl RawQuery {
    /// Read the known parameters from a raw query string. The first
    /// occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_query_string(query: &str) -> Self {
        let mut raw = RawQuery::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "platform" => &mut raw.platform,
                "type" => &mut raw.kind,
                "sort-by" => &mut raw.sort_by,
                "id" => &mut raw.id,
                "stats" => &mut raw.stats,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        raw
    }
}

/// Treat missing and empty parameters alike.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Validate the list filters.
pub fn normalize(raw: &RawQuery) -> Result<NormalizedQuery> {
    let platform = match present(&raw.platform) {
        Some(value) => value.parse::<Selection<Platform>>()?,
        None => Selection::All,
    };
    let kind = match present(&raw.kind) {
        Some(value) => value.parse::<Selection<GiveawayType>>()?,
        None => Selection::All,
    };
    let sort_by = match present(&raw.sort_by) {
        Some(value) => value.parse::<SortBy>()?,
        None => SortBy::default(),
    };
    Ok(NormalizedQuery {
        platform,
        kind,
        sort_by,
    })
}

/// Parse a detail-lookup id.
pub fn parse_id(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation(
            "id",
            format!("Invalid id '{raw}'. Expected a positive integer"),
        )),
    }
}

/// Decide which operation a request asks for: id, then stats, then list.
pub fn resolve(raw: &RawQuery) -> Result<ApiRequest> {
    if let Some(id) = present(&raw.id) {
        return parse_id(id).map(ApiRequest::Detail);
    }
    if matches!(present(&raw.stats), Some("true" | "1")) {
        return Ok(ApiRequest::Stats);
    }
    normalize(raw).map(ApiRequest::List)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(platform: Option<&str>, kind: Option<&str>, sort_by: Option<&str>) -> RawQuery {
        RawQuery {
            platform: platform.map(String::from),
            kind: kind.map(String::from),
            sort_by: sort_by.map(String::from),
            ..RawQuery::default()
        }
    }

    #[test]
    fn accepts_every_valid_combination() {
        let platforms = Platform::slugs().into_iter().chain(["all"]);
        for platform in platforms {
            for kind in ["all", "game", "loot", "beta"] {
                for sort_by in SortBy::slugs() {
                    let query = normalize(&raw(Some(platform), Some(kind), Some(sort_by)));
                    assert!(query.is_ok(), "{platform}/{kind}/{sort_by} rejected");
                }
            }
        }
    }

    #[test]
    fn absent_and_empty_mean_default() {
        assert_eq!(normalize(&RawQuery::default()).unwrap(), NormalizedQuery::default());
        assert_eq!(
            normalize(&raw(Some(""), Some(""), Some(""))).unwrap(),
            NormalizedQuery::default()
        );
    }

    #[test]
    fn rejects_out_of_range_values_by_field() {
        let cases = [
            (raw(Some("dreamcast"), None, None), "platform"),
            (raw(None, Some("dlc"), None), "type"),
            (raw(None, None, Some("newest")), "sort-by"),
            (raw(Some("Steam"), None, None), "platform"),
        ];
        for (query, expected_field) in cases {
            match normalize(&query) {
                Err(AppError::Validation { field, message }) => {
                    assert_eq!(field, expected_field);
                    assert!(message.contains("Valid options"));
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn sort_by_all_is_not_accepted() {
        assert!(normalize(&raw(None, None, Some("all"))).is_err());
    }

    #[test]
    fn resolve_prefers_id_then_stats() {
        let mut query = RawQuery {
            id: Some("525".into()),
            stats: Some("true".into()),
            ..RawQuery::default()
        };
        assert_eq!(resolve(&query).unwrap(), ApiRequest::Detail(525));

        query.id = None;
        assert_eq!(resolve(&query).unwrap(), ApiRequest::Stats);

        query.stats = Some("false".into());
        assert!(matches!(resolve(&query).unwrap(), ApiRequest::List(_)));
    }

    #[test]
    fn invalid_ids_are_rejected() {
        for bad in ["abc", "-3", "0", "1.5"] {
            let err = parse_id(bad).unwrap_err();
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn query_string_first_value_wins() {
        let raw = RawQuery::from_query_string("platform=pc&platform=steam&sort-by=value&utm=x");
        assert_eq!(raw.platform.as_deref(), Some("pc"));
        assert_eq!(raw.sort_by.as_deref(), Some("value"));
        assert_eq!(raw.kind, None);

        let raw = RawQuery::from_query_string("type=early%20access&id=");
        assert_eq!(raw.kind.as_deref(), Some("early access"));
        assert_eq!(raw.id.as_deref(), Some(""));
        assert!(resolve(&raw).is_err());
    }
}
