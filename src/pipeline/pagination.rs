// src/pipeline/pagination.rs

//! Deterministic windowing over a result set. Pages are 1-based.

/// Number of pages needed for `n` items.
pub fn total_pages(n: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    n.div_ceil(page_size)
}

/// Items shown on `page`. Out-of-range pages yield an empty slice.
pub fn window_for<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Bring `page` back to 1 when it falls outside `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    if page == 0 || page > total_pages {
        1
    } else {
        page
    }
}
