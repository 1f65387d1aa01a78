// src/pipeline/browser.rs

//! Client fetch orchestration.
//!
//! `GiveawayBrowser` owns the filter state, the fetched batch and the fetch
//! lifecycle (`Idle -> Loading -> Ready | Failed`). Only platform, type and
//! sort changes start a fetch; search text and page changes re-derive the
//! visible list from the batch already held.
//!
//! Every fetch gets a ticket carrying a monotonically increasing token. A
//! result is committed only if its token is still the newest one issued, so a
//! slow response for superseded filters can never overwrite fresher state.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::models::{FilterPatch, FilterState, Listing, NormalizedQuery};

use super::pagination::{clamp_page, total_pages, window_for};
use super::search;

/// Where the browser reads listing batches from.
#[async_trait]
pub trait GiveawayFetcher: Send + Sync {
    async fn fetch_giveaways(&self, query: &NormalizedQuery) -> Result<Vec<Listing>>;
}

/// Fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Handle for one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: u64,
    pub query: NormalizedQuery,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct BrowserView<'a> {
    /// Listings on the current page
    pub listings: Vec<&'a Listing>,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub filters: &'a FilterState,
    pub current_page: usize,
    pub total_pages: usize,
    /// Listings left after search
    pub total_filtered: usize,
    /// Listings in the fetched batch
    pub total_fetched: usize,
}

/// Filter state, fetched batch and fetch lifecycle for one browsing session.
#[derive(Debug, Clone)]
pub struct GiveawayBrowser {
    filters: FilterState,
    state: FetchState,
    batch: Vec<Listing>,
    page_size: usize,
    latest_token: u64,
}

impl GiveawayBrowser {
    pub fn new(page_size: usize) -> Self {
        Self::with_filters(FilterState::default(), page_size)
    }

    pub fn with_filters(filters: FilterState, page_size: usize) -> Self {
        Self {
            filters,
            state: FetchState::Idle,
            batch: Vec::new(),
            page_size,
            latest_token: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The batch as fetched, before search.
    pub fn batch(&self) -> &[Listing] {
        &self.batch
    }

    /// Enter `Loading` for the current filters and supersede any fetch in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_token += 1;
        self.state = FetchState::Loading;
        FetchTicket {
            token: self.latest_token,
            query: self.filters.query(),
        }
    }

    /// Whether `ticket` is the newest fetch issued.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.token == self.latest_token
    }

    /// Commit a fetch result if its ticket is still current.
    ///
    /// Either outcome resets the page to 1; failure also clears the batch.
    /// Returns whether the result was committed.
    pub fn commit(&mut self, ticket: FetchTicket, result: Result<Vec<Listing>>) -> bool {
        if !self.is_current(&ticket) {
            log::debug!(
                "Discarding stale result for token {} (latest {})",
                ticket.token,
                self.latest_token
            );
            return false;
        }

        match result {
            Ok(listings) => {
                log::debug!("Fetched {} giveaways for {:?}", listings.len(), ticket.query);
                self.batch = listings;
                self.state = FetchState::Ready;
                self.filters.page = 1;
            }
            Err(e) => {
                log::warn!("Failed to fetch giveaways: {}", e);
                self.batch.clear();
                self.state = FetchState::Failed(e.to_string());
                self.filters.page = 1;
            }
        }
        true
    }

    /// Apply a partial filter update.
    ///
    /// Returns a ticket when a fetch-relevant filter actually changed; the
    /// page is reset to 1 in that case.
    pub fn update_filters(&mut self, patch: FilterPatch) -> Option<FetchTicket> {
        if !self.filters.apply(&patch) {
            return None;
        }
        self.filters.page = 1;
        Some(self.begin_fetch())
    }

    /// Change the search text. Never fetches; resets the page when the text changes.
    pub fn search(&mut self, text: &str) {
        if self.filters.search_text != text {
            self.filters.search_text = text.to_string();
            self.filters.page = 1;
        }
    }

    /// Move to `page`. Pages past the end show an empty window.
    pub fn set_page(&mut self, page: usize) {
        self.filters.page = page.max(1);
    }

    /// The batch after search, in batch order.
    pub fn filtered(&self) -> Vec<&Listing> {
        search::filter(&self.batch, &self.filters.search_text)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.page_size)
    }

    /// Fetch with the current filters and commit the result.
    pub async fn refresh<F>(&mut self, fetcher: &F) -> bool
    where
        F: GiveawayFetcher + ?Sized,
    {
        let ticket = self.begin_fetch();
        let result = fetcher.fetch_giveaways(&ticket.query).await;
        self.commit(ticket, result)
    }

    /// Derive the current page of results.
    pub fn view(&self) -> BrowserView<'_> {
        let filtered = self.filtered();
        let total_pages = total_pages(filtered.len(), self.page_size);
        let listings = window_for(&filtered, self.filters.page, self.page_size).to_vec();
        BrowserView {
            listings,
            loading: self.is_loading(),
            error: self.error(),
            filters: &self.filters,
            current_page: self.filters.page,
            total_pages,
            total_filtered: filtered.len(),
            total_fetched: self.batch.len(),
        }
    }

    /// Pull the page back to 1 if the result set shrank beneath it.
    pub fn settle_page(&mut self) {
        let total = self.total_pages();
        if total > 0 {
            self.filters.page = clamp_page(self.filters.page, total);
        } else {
            self.filters.page = 1;
        }
    }
}

/// A browser shared between a UI loop and background fetch tasks.
#[derive(Debug, Clone)]
pub struct SharedBrowser {
    inner: Arc<Mutex<GiveawayBrowser>>,
}

impl SharedBrowser {
    pub fn new(browser: GiveawayBrowser) -> Self {
        Self {
            inner: Arc::new(Mutex::new(browser)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, GiveawayBrowser> {
        self.inner.lock()
    }

    /// Refetch with the current filters on a background task.
    pub fn spawn_refresh(&self, fetcher: Arc<dyn GiveawayFetcher>) -> JoinHandle<bool> {
        let ticket = self.inner.lock().begin_fetch();
        self.spawn_fetch(ticket, fetcher)
    }

    /// Apply a filter update and, if it changed anything, fetch in the background.
    pub fn update_filters(
        &self,
        patch: FilterPatch,
        fetcher: Arc<dyn GiveawayFetcher>,
    ) -> Option<JoinHandle<bool>> {
        let ticket = self.inner.lock().update_filters(patch)?;
        Some(self.spawn_fetch(ticket, fetcher))
    }

    fn spawn_fetch(&self, ticket: FetchTicket, fetcher: Arc<dyn GiveawayFetcher>) -> JoinHandle<bool> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = fetcher.fetch_giveaways(&ticket.query).await;
            inner.lock().commit(ticket, result)
        })
    }
}
