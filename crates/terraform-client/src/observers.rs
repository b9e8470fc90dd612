//! Per-operation output and error observers
//!
//! Each operation takes its own `Observers` bundle instead of the client
//! holding globally mutable listeners, so concurrent operations on one
//! client cannot race on shared observer state.

/// Line observers for one operation
///
/// Both callbacks are optional; an empty bundle discards all lines. Lines
/// are delivered without their trailing newline, in the order the tool
/// wrote them.
#[derive(Default)]
pub struct Observers {
    output: Option<Box<dyn FnMut(&str) + Send>>,
    error: Option<Box<dyn FnMut(&str) + Send>>,
}

impl Observers {
    /// Create an empty bundle that discards all lines
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the stdout observer
    pub fn on_output(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.output = Some(Box::new(f));
        self
    }

    /// Register the stderr observer
    pub fn on_error(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Deliver one stdout line
    pub(crate) fn emit_output(&mut self, line: &str) {
        if let Some(f) = &mut self.output {
            f(line);
        }
    }

    /// Deliver one stderr line
    pub(crate) fn emit_error(&mut self, line: &str) {
        if let Some(f) = &mut self.error {
            f(line);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("output", &self.output.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}
