//! Shared application state for the state API.
//!
//! [`AppState`] holds the bridge onto the engine thread. It carries no
//! world data of its own: every document is produced fresh, on the engine
//! thread, for the request that asked for it.

use std::time::Duration;

use worldtap_core::bridge::{EngineBridge, EngineContext};
use worldtap_core::projection::ProjectionError;

use crate::error::ApiError;

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    bridge: EngineBridge,
    query_timeout: Option<Duration>,
}

impl AppState {
    /// Create state around a bridge. `query_timeout` bounds how long a
    /// request waits for the engine; `None` waits indefinitely.
    pub const fn new(bridge: EngineBridge, query_timeout: Option<Duration>) -> Self {
        Self {
            bridge,
            query_timeout,
        }
    }

    /// Run `op` on the engine thread on behalf of `endpoint`.
    pub async fn query<T, F>(&self, endpoint: &'static str, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&EngineContext) -> Result<T, ProjectionError> + Send + 'static,
    {
        self.bridge
            .run(op, self.query_timeout)
            .await
            .map_err(|source| ApiError::Engine { endpoint, source })
    }
}
