//! The Terraform client: public operations over the pipeline composer

use crate::commands;
use crate::error::{Error, Result};
use crate::observers::Observers;
use crate::options::TerraformOptions;
use crate::output;
use crate::pipeline;
use crate::pool::WorkerPool;
use process_invoker::{InvocationSpec, IoMode, Launcher, LocalLauncher};
use serde_json::Value;
use smol::Task;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const EXECUTABLE_NAME: &str = "terraform";
const USER_AGENT_VAR: &str = "AZURE_HTTP_USER_AGENT";
const USER_AGENT_VALUE: &str = "rust-terraform-client";
const USER_AGENT_DELIMITER: &str = ";";
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Asynchronous client for one Terraform working directory
///
/// Every operation builds its invocation specs up front (merged environment,
/// working directory, I/O mode, non-interactive flags), spawns the pipeline
/// onto the client's worker pool, and returns the task handle immediately.
/// Dropping a returned task cancels the pipeline: the running step's process
/// is killed and no later step launches.
///
/// Generic over the [`Launcher`] so tests can substitute a fake; production
/// code uses the default [`LocalLauncher`].
pub struct TerraformClient<L: Launcher = LocalLauncher> {
    launcher: Arc<L>,
    pool: WorkerPool,
    options: TerraformOptions,
    working_dir: Option<PathBuf>,
    io_mode: IoMode,
    executable: String,
}

impl TerraformClient<LocalLauncher> {
    /// Create a client that spawns local processes, with a default-sized pool
    pub fn new(options: TerraformOptions) -> Result<Self> {
        Self::with_launcher(LocalLauncher::new(), options)
    }
}

impl<L: Launcher> TerraformClient<L> {
    /// Create a client over an explicit launcher
    pub fn with_launcher(launcher: L, options: TerraformOptions) -> Result<Self> {
        Ok(Self {
            launcher: Arc::new(launcher),
            pool: WorkerPool::with_default_size()?,
            options,
            working_dir: None,
            io_mode: IoMode::Capture,
            executable: EXECUTABLE_NAME.to_string(),
        })
    }

    /// Set the working directory Terraform runs in
    pub fn with_working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_owned());
        self
    }

    /// Share the caller's terminal with the child instead of capturing lines
    ///
    /// In inherit mode no observer callbacks fire; it is mutually exclusive
    /// with output capture, so `version` and `output` see no captured text.
    pub fn with_inherit_io(mut self) -> Self {
        self.io_mode = IoMode::Inherit;
        self
    }

    /// Override the executable name (nonstandard installs, test doubles)
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// The configured working directory, if any
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// The credential/configuration options
    pub fn options(&self) -> &TerraformOptions {
        &self.options
    }

    /// Query the tool version: the first output line when it exits 0
    pub fn version(&self, observers: Observers) -> Result<Task<Option<String>>> {
        let launcher = Arc::clone(&self.launcher);
        let spec = self.spec_for(commands::VERSION);
        Ok(self.pool.spawn(async move {
            let mut observers = observers;
            let (outcome, first) = pipeline::run_single(&*launcher, &spec, &mut observers).await;
            if outcome.is_success() { first } else { None }
        }))
    }

    /// Run `init` then `plan` as one fail-fast pipeline
    pub fn plan(&self, observers: Observers) -> Result<Task<bool>> {
        self.run(&[commands::INIT, commands::PLAN], observers)
    }

    /// Run `init` then `apply -auto-approve` as one fail-fast pipeline
    pub fn apply(&self, observers: Observers) -> Result<Task<bool>> {
        self.run(&[commands::INIT, commands::APPLY], observers)
    }

    /// Run `init` then `destroy -force` as one fail-fast pipeline
    pub fn destroy(&self, observers: Observers) -> Result<Task<bool>> {
        self.run(&[commands::INIT, commands::DESTROY], observers)
    }

    /// Read the declared output values as a name-to-value map
    ///
    /// Runs `output -json` and flattens the result. A non-zero exit or a
    /// malformed document yields an empty map; the parse failure is reported
    /// to the error observer instead of failing the operation.
    pub fn output(&self, observers: Observers) -> Result<Task<HashMap<String, Value>>> {
        let launcher = Arc::clone(&self.launcher);
        let spec = self.spec_for(commands::OUTPUT);
        Ok(self.pool.spawn(async move {
            let mut observers = observers;
            let (outcome, lines) = pipeline::run_capture(&*launcher, &spec, &mut observers).await;
            if !outcome.is_success() {
                return HashMap::new();
            }
            output::extract_values(&lines.join("\n"), &mut observers)
        }))
    }

    /// Shut the client down, waiting up to 5 seconds for in-flight pipelines
    pub fn close(self) -> Result<()> {
        self.close_with_timeout(DEFAULT_SHUTDOWN_TIMEOUT)
    }

    /// Shut the client down with an explicit bound on the wait
    ///
    /// Returns [`Error::Shutdown`] if in-flight work does not finish within
    /// the bound.
    pub fn close_with_timeout(self, timeout: Duration) -> Result<()> {
        self.pool.shutdown(timeout)
    }

    /// Build one fully configured invocation spec for a logical command
    fn spec_for(&self, command: &str) -> InvocationSpec {
        let mut spec = InvocationSpec::new(&self.executable)
            .arg(command)
            .env_append(USER_AGENT_VAR, USER_AGENT_VALUE, USER_AGENT_DELIMITER)
            .envs(
                self.options
                    .env_vars()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            )
            .io_mode(self.io_mode);
        if let Some(dir) = &self.working_dir {
            spec = spec.current_dir(dir);
        }
        if let Some(flag) = commands::non_interactive_flag(command) {
            spec = spec.arg(flag);
        }
        spec
    }

    /// Spawn a fail-fast pipeline for the given logical commands
    fn run(&self, steps: &[&str], observers: Observers) -> Result<Task<bool>> {
        self.check_running_parameters()?;
        let specs: Vec<InvocationSpec> = steps.iter().map(|step| self.spec_for(step)).collect();
        info!(steps = ?steps, "starting terraform pipeline");
        let launcher = Arc::clone(&self.launcher);
        Ok(self.pool.spawn(async move {
            let mut observers = observers;
            pipeline::run_sequence(&*launcher, &specs, &mut observers).await
        }))
    }

    /// Reject operations that need a working directory before any launch
    fn check_running_parameters(&self) -> Result<()> {
        if self.working_dir.is_none() {
            return Err(Error::configuration("working directory is not set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_without_working_dir_fails_before_launch() {
        let client = TerraformClient::new(TerraformOptions::new()).unwrap();
        match client.plan(Observers::new()) {
            Err(Error::Configuration(reason)) => {
                assert!(reason.contains("working directory"));
            }
            other => panic!("expected configuration error, got {:?}", other.map(|_| ())),
        }
        client.close().unwrap();
    }

    #[test]
    fn spec_carries_merged_environment_and_flags() {
        let mut options = TerraformOptions::new();
        options.set_arm_client_id("client-id");
        let client = TerraformClient::new(options)
            .unwrap()
            .with_working_dir("/deploy");

        let spec = client.spec_for(commands::APPLY);

        assert_eq!(spec.get_program(), "terraform");
        assert_eq!(spec.get_args(), ["apply", "-auto-approve"]);
        assert_eq!(spec.get_envs()["ARM_CLIENT_ID"], "client-id");
        assert!(
            spec.get_envs()["AZURE_HTTP_USER_AGENT"].ends_with(USER_AGENT_VALUE),
            "user agent value must be present"
        );
        assert_eq!(
            spec.get_current_dir(),
            Some(std::path::Path::new("/deploy"))
        );
        client.close().unwrap();
    }

    #[test]
    fn options_snapshot_is_not_mutated() {
        let mut options = TerraformOptions::new();
        options.set_arm_tenant_id("tenant");
        let before = options.clone();

        let client = TerraformClient::new(options)
            .unwrap()
            .with_working_dir("/deploy");
        let _ = client.spec_for(commands::PLAN);

        assert_eq!(client.options().env_vars(), before.env_vars());
        client.close().unwrap();
    }
}
