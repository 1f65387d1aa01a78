// src/pipeline/debounce.rs

//! Coalescing of rapid search-text updates.

use std::time::{Duration, Instant};

/// Releases the latest search text once typing has paused for `delay`.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    last_released: Option<String>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_released: None,
        }
    }

    /// Record a keystroke's worth of text, replacing anything still pending.
    pub fn push(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    /// When the pending text becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    /// Release the pending text if the quiet period has elapsed.
    ///
    /// Text equal to the last released value is swallowed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.deadline().is_some_and(|deadline| now >= deadline);
        if !due {
            return None;
        }
        self.release()
    }

    /// Release the pending text immediately (e.g. when the search is cleared).
    pub fn flush(&mut self) -> Option<String> {
        self.release()
    }

    fn release(&mut self) -> Option<String> {
        let (text, _) = self.pending.take()?;
        if self.last_released.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last_released = Some(text.clone());
        Some(text)
    }
}
