//! Asynchronous subprocess invocation with line-oriented output streaming
//!
//! This crate owns exactly one concern: running an external process and making
//! its completion and its output observable without blocking the caller. An
//! [`InvocationSpec`] describes what to run (program, arguments, working
//! directory, environment overlay, I/O mode); a [`Launcher`] turns a spec into
//! a stream of [`OutputEvent`]s plus a [`RunHandle`] that resolves to the exit
//! status and supports cancellation.
//!
//! The crate is runtime-agnostic: it spawns through `async-process` and
//! returns futures/streams that any executor can drive.

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod handle;
pub mod launcher;
pub mod local;
pub mod spec;

pub use error::{Error, Result};
pub use event::{OutputEvent, OutputSource};
pub use handle::{ExitStatus, RunHandle};
pub use launcher::Launcher;
pub use local::{LocalLauncher, LocalRunHandle, OutputStream};
pub use spec::{InvocationSpec, IoMode};
