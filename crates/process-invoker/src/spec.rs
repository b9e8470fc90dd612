//! Invocation specs: immutable descriptions of one process to run

use async_process::Command as AsyncCommand;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// How the child process's stdout/stderr are wired up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoMode {
    /// Intercept stdout and stderr and deliver them line by line
    #[default]
    Capture,
    /// Share the caller's standard streams; no lines are captured
    Inherit,
}

/// A description of one process invocation
///
/// Built once with the chaining methods below, then handed to a
/// [`Launcher`](crate::Launcher); never mutated after launch. Unlike
/// `async_process::Command`, a spec is `Clone` and can be inspected.
#[derive(Debug, Clone)]
pub struct InvocationSpec {
    /// The program to execute
    program: String,
    /// The arguments to pass to the program
    args: Vec<String>,
    /// Environment overlay merged into the inherited environment
    env: HashMap<String, String>,
    /// Working directory; `None` inherits the caller's
    current_dir: Option<PathBuf>,
    /// How stdout/stderr are handled
    io_mode: IoMode,
}

impl InvocationSpec {
    /// Create a new spec for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            current_dir: None,
            io_mode: IoMode::default(),
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arg in args {
            self.args.push(arg.into());
        }
        self
    }

    /// Set an overlay variable; a later write for the same key wins
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set multiple overlay variables
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            self.env.insert(key.into(), value.into());
        }
        self
    }

    /// Append `value` to an existing value for `key` rather than replacing it
    ///
    /// The prior value is taken from the overlay if present, otherwise from
    /// the calling process's inherited environment. With a prior value the
    /// entry becomes `prior + delimiter + value`; without one it is just
    /// `value`.
    pub fn env_append(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        delimiter: &str,
    ) -> Self {
        let key = key.into();
        let value = value.into();
        let prior = self
            .env
            .get(&key)
            .cloned()
            .or_else(|| std::env::var(&key).ok());
        let merged = match prior {
            Some(prior) => format!("{prior}{delimiter}{value}"),
            None => value,
        };
        self.env.insert(key, merged);
        self
    }

    /// Set the working directory
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_owned());
        self
    }

    /// Set the I/O mode
    pub fn io_mode(mut self, mode: IoMode) -> Self {
        self.io_mode = mode;
        self
    }

    /// Get the program name
    pub fn get_program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the environment overlay
    pub fn get_envs(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Get the working directory, if set
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Get the I/O mode
    pub fn get_io_mode(&self) -> IoMode {
        self.io_mode
    }

    /// Convert to an `async_process::Command`, ready to spawn
    pub fn prepare(&self) -> AsyncCommand {
        let mut cmd = AsyncCommand::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}
