// ABOUTME: Shared application state for the mlrund HTTP server.
// ABOUTME: Holds process configuration, the identity client handle, and the nuclio version cache.

use std::sync::Arc;

use mlrund_core::{MlrunConfig, VersionCache};

use crate::identity::IdentityClient;

/// Shared application state accessible by all Axum handlers.
///
/// Configuration is immutable after startup; the only mutable piece is the
/// nuclio version cache, which is resolved once and pinned until invalidated.
pub struct AppState {
    pub config: MlrunConfig,
    pub identity: Arc<dyn IdentityClient>,
    pub nuclio_version: VersionCache,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create a new AppState from configuration and an identity client.
    pub fn new(config: MlrunConfig, identity: Arc<dyn IdentityClient>) -> Self {
        Self {
            config,
            identity,
            nuclio_version: VersionCache::new(),
        }
    }
}
