//! Error types for the shop binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the run itself.

/// Top-level error for the shop binary.
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
        source: bazaar_core::ConfigError,
    },

    /// The starting shelves could not be stocked.
    #[error("stock error: {source}")]
    Stock {
        /// The underlying stock error.
        #[from]
        source: bazaar_customers::StockError,
    },

    /// The run loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: bazaar_core::RunnerError,
    },

    /// The autopilot section of the config is invalid.
    #[error("autopilot error: {message}")]
    Autopilot {
        /// Description of the autopilot config failure.
        message: String,
    },
}
