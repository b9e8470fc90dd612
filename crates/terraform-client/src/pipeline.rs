//! Fail-fast sequencing of invocations
//!
//! A pipeline is an ordered list of invocation specs sharing one boolean
//! outcome. Steps run strictly in order; step N's output is fully drained to
//! the observers before step N+1 launches, and the first failing step (non-zero
//! exit, signal termination, or launch failure) short-circuits the rest.

use crate::observers::Observers;
use futures::StreamExt;
use process_invoker::{InvocationSpec, Launcher, OutputSource, RunHandle};
use tracing::debug;

/// Result of one pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step exited with code 0
    Success,
    /// The step failed: its exit code, or `None` if it never produced one
    /// (launch failure or signal termination)
    Failure(Option<i32>),
}

impl StepOutcome {
    /// True for [`StepOutcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Success)
    }
}

/// Run the specs in order, short-circuiting on the first failure
///
/// Resolves to `true` iff every step exited with code 0. A failed step's
/// successors are never launched.
pub async fn run_sequence<L: Launcher>(
    launcher: &L,
    specs: &[InvocationSpec],
    observers: &mut Observers,
) -> bool {
    for (index, spec) in specs.iter().enumerate() {
        let outcome = run_step(launcher, spec, observers, None).await;
        if let StepOutcome::Failure(code) = outcome {
            debug!(
                step = index,
                program = spec.get_program(),
                ?code,
                "pipeline short-circuited"
            );
            return false;
        }
    }
    true
}

/// Run one spec, additionally returning the first captured stdout line
pub async fn run_single<L: Launcher>(
    launcher: &L,
    spec: &InvocationSpec,
    observers: &mut Observers,
) -> (StepOutcome, Option<String>) {
    let (outcome, mut lines) = run_capture(launcher, spec, observers).await;
    let first = if lines.is_empty() {
        None
    } else {
        Some(lines.remove(0))
    };
    (outcome, first)
}

/// Run one spec, additionally returning every captured stdout line
pub async fn run_capture<L: Launcher>(
    launcher: &L,
    spec: &InvocationSpec,
    observers: &mut Observers,
) -> (StepOutcome, Vec<String>) {
    let mut lines = Vec::new();
    let outcome = run_step(launcher, spec, observers, Some(&mut lines)).await;
    (outcome, lines)
}

/// Launch one spec, drain its output to the observers, and wait for exit
///
/// The returned outcome is ordinary data, not an error: the composer turns
/// launch failures and non-zero exits alike into `Failure` and lets the
/// caller decide what that means for the aggregate result.
async fn run_step<L: Launcher>(
    launcher: &L,
    spec: &InvocationSpec,
    observers: &mut Observers,
    mut capture: Option<&mut Vec<String>>,
) -> StepOutcome {
    let (mut events, mut handle) = match launcher.launch(spec).await {
        Ok(launched) => launched,
        Err(e) => {
            observers.emit_error(&e.to_string());
            return StepOutcome::Failure(None);
        }
    };

    while let Some(event) = events.next().await {
        match event.source {
            OutputSource::Stdout => {
                observers.emit_output(&event.line);
                if let Some(lines) = capture.as_mut() {
                    lines.push(event.line);
                }
            }
            OutputSource::Stderr => observers.emit_error(&event.line),
        }
    }

    match handle.wait().await {
        Ok(status) if status.success() => StepOutcome::Success,
        Ok(status) => StepOutcome::Failure(status.code),
        Err(e) => {
            observers.emit_error(&e.to_string());
            StepOutcome::Failure(None)
        }
    }
}
