//! Error types for the Terraform client

use std::time::Duration;
use thiserror::Error;

/// Unified error type for client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing setup, caught before any process is launched
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The worker pool failed to terminate within the shutdown bound
    #[error("worker pool did not terminate within {timeout:?}")]
    Shutdown {
        /// The bound that elapsed
        timeout: Duration,
    },

    /// Error from the process invocation layer
    #[error(transparent)]
    Invoker(#[from] process_invoker::Error),

    /// I/O error (worker thread setup)
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
