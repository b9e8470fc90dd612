//! Launcher trait: the seam between invocation specs and running processes

use crate::error::Result;
use crate::event::OutputEvent;
use crate::handle::RunHandle;
use crate::spec::InvocationSpec;
use async_trait::async_trait;
use futures::stream::Stream;

/// Turns an [`InvocationSpec`] into a running process
///
/// `launch` must not block: it returns as soon as the process has been
/// spawned (or failed to spawn), handing back a stream of captured output
/// lines and a handle that resolves to the exit status. Draining the stream
/// to completion and then awaiting the handle observes every line the
/// process wrote before its exit status is reported.
#[async_trait]
pub trait Launcher: Send + Sync + 'static {
    /// The stream of output lines this launcher produces
    type OutputStream: Stream<Item = OutputEvent> + Send + Unpin;

    /// The run handle type this launcher produces
    type Handle: RunHandle;

    /// Launch one invocation, returning its output stream and control handle
    async fn launch(&self, spec: &InvocationSpec) -> Result<(Self::OutputStream, Self::Handle)>;
}
