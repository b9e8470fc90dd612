//! Run handles: control over one in-flight invocation

use crate::error::Result;
use async_trait::async_trait;

/// A handle to one launched invocation
///
/// The handle is exclusively owned by the operation that launched it. `wait`
/// resolves once the process has exited; `cancel` forcefully terminates it
/// and is a no-op after exit, so a cancelled `wait` resolves instead of
/// hanging.
#[async_trait]
pub trait RunHandle: Send {
    /// Get the OS process ID, if the process started
    fn pid(&self) -> Option<u32>;

    /// Wait for the process to complete and return its exit status
    async fn wait(&mut self) -> Result<ExitStatus>;

    /// Request graceful shutdown (SIGTERM or equivalent)
    async fn terminate(&mut self) -> Result<()>;

    /// Forcefully terminate the process; idempotent after exit
    async fn cancel(&mut self) -> Result<()>;
}

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    /// Exit code if the process exited normally
    pub code: Option<i32>,
    /// Signal that terminated the process (Unix only)
    #[cfg(unix)]
    pub signal: Option<i32>,
}

impl ExitStatus {
    /// Returns true if the process exited with code 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Returns true if the process was killed by a signal
    pub fn terminated_by_signal(&self) -> bool {
        #[cfg(unix)]
        {
            self.signal.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }
}
