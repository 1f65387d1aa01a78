// src/models/filters.rs

//! Client-side filter state.

use super::query::{GiveawayType, NormalizedQuery, Platform, Selection, SortBy};

/// Everything the user has chosen about what to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub platform: Selection<Platform>,
    pub kind: Selection<GiveawayType>,
    pub sort_by: SortBy,
    pub search_text: String,
    /// 1-based page number
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            platform: Selection::All,
            kind: Selection::All,
            sort_by: SortBy::Date,
            search_text: String::new(),
            page: 1,
        }
    }
}

impl FilterState {
    /// The part of the state that is sent to the proxy.
    pub fn query(&self) -> NormalizedQuery {
        NormalizedQuery {
            platform: self.platform,
            kind: self.kind,
            sort_by: self.sort_by,
        }
    }

    /// Apply a partial update. Returns true if a fetch-relevant field changed.
    pub fn apply(&mut self, patch: &FilterPatch) -> bool {
        let before = self.query();
        if let Some(platform) = patch.platform {
            self.platform = platform;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        self.query() != before
    }
}

/// Partial update of the fetch-relevant filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub platform: Option<Selection<Platform>>,
    pub kind: Option<Selection<GiveawayType>>,
    pub sort_by: Option<SortBy>,
}

impl FilterPatch {
    pub fn platform(mut self, platform: impl Into<Selection<Platform>>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<Selection<GiveawayType>>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Reset every fetch filter to its default.
    pub fn reset() -> Self {
        Self {
            platform: Some(Selection::All),
            kind: Some(Selection::All),
            sort_by: Some(SortBy::Date),
        }
    }
}
