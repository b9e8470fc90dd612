//! Asynchronous Terraform CLI client
//!
//! Wraps the `terraform` binary as a set of non-blocking operations
//! (`version`, `plan`, `apply`, `destroy`, `output`). Multi-step operations
//! run as fail-fast pipelines: `plan` is `terraform init` followed by
//! `terraform plan`, and the second step never launches if the first exits
//! non-zero. Captured output is streamed line by line to per-operation
//! observers, and `terraform output -json` is flattened into a plain
//! name-to-value map.
//!
//! The client owns a small worker pool that drives process waits and output
//! draining; every operation returns a task handle immediately and the pool
//! is shut down with a bounded wait when the client is closed.
//!
//! ```no_run
//! use terraform_client::{Observers, TerraformClient, TerraformOptions};
//!
//! # fn main() -> Result<(), terraform_client::Error> {
//! let mut options = TerraformOptions::new();
//! options.set_arm_client_id("client-id");
//!
//! let client = TerraformClient::new(options)?.with_working_dir("/deploy/stack");
//! let apply = client.apply(Observers::new().on_output(|line| println!("{line}")))?;
//! let succeeded = smol::block_on(apply);
//! client.close()?;
//! # assert!(succeeded);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod commands;
pub mod error;
pub mod observers;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod pool;

pub use client::TerraformClient;
pub use error::{Error, Result};
pub use observers::Observers;
pub use options::TerraformOptions;
pub use pipeline::StepOutcome;
pub use pool::WorkerPool;
