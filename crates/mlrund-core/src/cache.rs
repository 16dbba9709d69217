// ABOUTME: Process-wide cache for the resolved nuclio version string.
// ABOUTME: Explicit get-or-compute/invalidate semantics so tests and config reloads can reset state.

use std::sync::{Mutex, PoisonError};

/// Caches a resolved version string for the lifetime of the process.
///
/// The nuclio version is stable across a deployment, so it is resolved once
/// and pinned until someone explicitly calls [`VersionCache::invalidate`]
/// (config reload, test isolation). Concurrent resolutions race benignly:
/// the first successful compute wins and later requests read it.
#[derive(Debug, Default)]
pub struct VersionCache {
    cached: Mutex<Option<String>>,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value, computing and pinning it if unset.
    ///
    /// A compute returning `None` leaves the cache unset, so the value is
    /// re-derived on the next call rather than caching the absence.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> Option<String>) -> Option<String> {
        let mut guard = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = compute();
            if let Some(version) = guard.as_deref() {
                tracing::debug!(version, "pinned resolved nuclio version");
            }
        }
        guard.clone()
    }

    /// Clear the cached value so the next lookup recomputes it.
    pub fn invalidate(&self) {
        let mut guard = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}
