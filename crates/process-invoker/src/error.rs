//! Error types for process invocation

use thiserror::Error;

/// Unified error type for launching and controlling processes
#[derive(Error, Debug)]
pub enum Error {
    /// The executable could not be started (not found, not executable)
    #[error("failed to launch {program}: {reason}")]
    Launch {
        /// The program that failed to start
        program: String,
        /// The reason reported by the operating system
        reason: String,
    },

    /// Setting up output capture for a child process failed
    #[error("failed to set up output capture: {reason}")]
    IoCapture {
        /// The reason capture setup failed
        reason: String,
    },

    /// Failed to send a signal to a process
    #[error("failed to send signal {signal}: {reason}")]
    SignalFailed {
        /// The signal number that failed to send
        signal: i32,
        /// The reason for the signal failure
        reason: String,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Nix error (Unix signal handling)
    #[cfg(unix)]
    #[error(transparent)]
    Nix(#[from] nix::Error),
}

impl Error {
    /// Create a launch error for the given program
    pub fn launch(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Launch {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Create a signal failure error
    pub fn signal_failed(signal: i32, reason: impl Into<String>) -> Self {
        Self::SignalFailed {
            signal,
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
