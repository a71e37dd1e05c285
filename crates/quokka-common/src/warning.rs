//! Engine warnings routed through the `log` facade.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Each layout pass owns its own [`Warnings`] set, so passes running side by
//! side never see each other's reports and no state outlives a pass.

use std::sync::{Mutex, PoisonError};

/// Warnings already emitted during one pass (to deduplicate).
#[derive(Debug, Default)]
pub struct Warnings {
    seen: Mutex<Vec<String>>,
}

impl Warnings {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn about degraded input (logged once per unique message)
    ///
    /// The component name becomes the log target, so hosts can filter with
    /// `RUST_LOG=layout=warn` and similar.
    ///
    /// # Example
    /// ```
    /// use quokka_common::warning::Warnings;
    ///
    /// let warnings = Warnings::new();
    /// warnings.warn_once("image", "image 'logo.png' not found");
    /// warnings.warn_once("image", "image 'logo.png' not found");
    /// assert_eq!(warnings.messages().len(), 1);
    /// ```
    pub fn warn_once(&self, component: &str, message: &str) {
        let key = format!("[{component}] {message}");
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(&key) {
            return;
        }
        seen.push(key);
        drop(seen);
        log::warn!(target: component, "{message}");
    }

    /// Returns true if `message` has already been reported for `component`.
    #[must_use]
    pub fn was_warned(&self, component: &str, message: &str) -> bool {
        let key = format!("[{component}] {message}");
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
    }

    /// Every distinct warning in the order it was first reported, each
    /// prefixed with its component as `[component] message`.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
