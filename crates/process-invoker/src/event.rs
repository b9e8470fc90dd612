//! Line-oriented output events from a captured process

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One complete line written by a child process to stdout or stderr
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputEvent {
    /// When the line was read from the pipe
    pub timestamp: DateTime<Utc>,
    /// Which stream the line arrived on
    pub source: OutputSource,
    /// The line content, without the trailing newline
    pub line: String,
}

impl OutputEvent {
    /// Create a new event stamped with the current time
    pub fn new(source: OutputSource, line: String) -> Self {
        Self {
            timestamp: Utc::now(),
            source,
            line,
        }
    }

    /// True if this line arrived on stdout
    pub fn is_stdout(&self) -> bool {
        self.source == OutputSource::Stdout
    }
}

/// Source stream of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputSource {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}
