// src/pipeline/search.rs

//! Case-insensitive substring search over a fetched batch.
//!
//! Runs entirely on data already held by the client: no I/O, no state, and the
//! input is never modified.

use crate::models::Listing;

/// Keep listings whose title, description, platforms or type contain
/// `search_text`, ignoring case. Blank text keeps everything.
pub fn filter<'a>(listings: &'a [Listing], search_text: &str) -> Vec<&'a Listing> {
    if search_text.trim().is_empty() {
        return listings.iter().collect();
    }

    let term = search_text.to_lowercase();
    let result: Vec<&Listing> = listings.iter().filter(|l| matches(l, &term)).collect();
    log::debug!(
        "Filtered {} giveaways to {} results for query: {:?}",
        listings.len(),
        result.len(),
        search_text
    );
    result
}

/// Whether `listing` matches an already-lowercased term.
pub fn matches(listing: &Listing, term: &str) -> bool {
    [
        &listing.title,
        &listing.description,
        &listing.platforms,
        &listing.kind,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(term))
}
