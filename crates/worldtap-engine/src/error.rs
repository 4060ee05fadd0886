//! Error types for the Worldtap binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, serving, and shutdown.

/// Top-level error for the Worldtap binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: worldtap_core::config::ConfigError,
    },

    /// The engine thread failed to start or stopped with an error.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: worldtap_core::runner::RunnerError,
    },

    /// The state API server failed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: worldtap_api::ServerError,
    },

    /// Waiting for the engine thread to stop failed.
    #[error("shutdown error: {message}")]
    Shutdown {
        /// Description of the failure.
        message: String,
    },
}
