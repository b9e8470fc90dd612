//! Local process launcher

use async_process::{Child, Stdio};
use async_trait::async_trait;
use futures::stream::Stream;
use futures_lite::io::{AsyncBufReadExt, BufReader, Lines};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{OutputEvent, OutputSource};
use crate::handle::{ExitStatus, RunHandle};
use crate::launcher::Launcher;
use crate::spec::{InvocationSpec, IoMode};

/// Launcher that spawns processes on the local machine
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLauncher;

impl LocalLauncher {
    /// Create a local launcher
    pub fn new() -> Self {
        Self
    }
}

/// A handle to control a locally spawned process
pub struct LocalRunHandle {
    child: Child,
    /// Cached status once the process has been observed to exit
    exited: Option<ExitStatus>,
}

/// Stream of captured output lines from one local process
///
/// Both pipes are polled from a single `poll_next` so the child cannot block
/// writing to one pipe while the other is being drained. In inherit mode both
/// readers are absent and the stream is exhausted immediately.
pub struct OutputStream {
    stdout: Option<Lines<BufReader<async_process::ChildStdout>>>,
    stderr: Option<Lines<BufReader<async_process::ChildStderr>>>,
}

#[async_trait]
impl Launcher for LocalLauncher {
    type OutputStream = OutputStream;
    type Handle = LocalRunHandle;

    async fn launch(&self, spec: &InvocationSpec) -> Result<(Self::OutputStream, Self::Handle)> {
        let mut cmd = spec.prepare();
        match spec.get_io_mode() {
            IoMode::Capture => {
                cmd.stdin(Stdio::null());
                cmd.stdout(Stdio::piped());
                cmd.stderr(Stdio::piped());
            }
            IoMode::Inherit => {
                cmd.stdin(Stdio::inherit());
                cmd.stdout(Stdio::inherit());
                cmd.stderr(Stdio::inherit());
            }
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::launch(spec.get_program(), e.to_string()))?;

        debug!(
            program = spec.get_program(),
            args = ?spec.get_args(),
            pid = child.id(),
            "launched process"
        );

        let (stdout, stderr) = match spec.get_io_mode() {
            IoMode::Capture => {
                let stdout = child.stdout.take().ok_or_else(|| Error::IoCapture {
                    reason: "child stdout pipe missing".into(),
                })?;
                let stderr = child.stderr.take().ok_or_else(|| Error::IoCapture {
                    reason: "child stderr pipe missing".into(),
                })?;
                (
                    Some(BufReader::new(stdout).lines()),
                    Some(BufReader::new(stderr).lines()),
                )
            }
            IoMode::Inherit => (None, None),
        };

        let events = OutputStream { stdout, stderr };
        let handle = LocalRunHandle {
            child,
            exited: None,
        };

        Ok((events, handle))
    }
}

#[async_trait]
impl RunHandle for LocalRunHandle {
    fn pid(&self) -> Option<u32> {
        Some(self.child.id())
    }

    async fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.exited {
            return Ok(status);
        }
        let status = self.child.status().await?;
        let status = ExitStatus {
            code: status.code(),
            #[cfg(unix)]
            signal: {
                use std::os::unix::process::ExitStatusExt;
                status.signal()
            },
        };
        self.exited = Some(status);
        Ok(status)
    }

    async fn terminate(&mut self) -> Result<()> {
        if self.exited.is_some() {
            return Ok(());
        }
        #[cfg(unix)]
        {
            use nix::sys::signal::{self, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            match signal::kill(pid, Signal::SIGTERM) {
                Ok(()) | Err(nix::errno::Errno::ESRCH) => Ok(()),
                Err(e) => Err(Error::signal_failed(15, e.to_string())),
            }
        }
        #[cfg(not(unix))]
        {
            self.child
                .kill()
                .map_err(|e| Error::signal_failed(-1, e.to_string()))
        }
    }

    async fn cancel(&mut self) -> Result<()> {
        if self.exited.is_some() {
            return Ok(());
        }
        #[cfg(unix)]
        {
            use nix::sys::signal::{self, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            // ESRCH means the process already exited between our check and
            // the kill, which is exactly the idempotent no-op case.
            match signal::kill(pid, Signal::SIGKILL) {
                Ok(()) | Err(nix::errno::Errno::ESRCH) => Ok(()),
                Err(e) => Err(Error::signal_failed(9, e.to_string())),
            }
        }
        #[cfg(not(unix))]
        {
            match self.child.kill() {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
                Err(e) => Err(Error::signal_failed(-1, e.to_string())),
            }
        }
    }
}

impl Drop for LocalRunHandle {
    fn drop(&mut self) {
        // An abandoned handle must not leak its process.
        if self.exited.is_none() {
            let _ = self.child.kill();
        }
    }
}

impl Stream for OutputStream {
    type Item = OutputEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(stdout) = &mut self.stdout {
            match Pin::new(stdout).poll_next(cx) {
                Poll::Ready(Some(Ok(line))) => {
                    return Poll::Ready(Some(OutputEvent::new(OutputSource::Stdout, line)));
                }
                Poll::Ready(Some(Err(_))) | Poll::Ready(None) => {
                    self.stdout = None;
                }
                Poll::Pending => {}
            }
        }

        if let Some(stderr) = &mut self.stderr {
            match Pin::new(stderr).poll_next(cx) {
                Poll::Ready(Some(Ok(line))) => {
                    return Poll::Ready(Some(OutputEvent::new(OutputSource::Stderr, line)));
                }
                Poll::Ready(Some(Err(_))) | Poll::Ready(None) => {
                    self.stderr = None;
                }
                Poll::Pending => {}
            }
        }

        if self.stdout.is_none() && self.stderr.is_none() {
            return Poll::Ready(None);
        }

        Poll::Pending
    }
}
