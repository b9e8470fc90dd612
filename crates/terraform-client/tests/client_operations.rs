//! End-to-end client tests against a scripted fake `terraform` binary
//!
//! Each test writes a small shell script that plays the role of the tool,
//! logs which subcommand it was invoked with, and produces canned output.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use terraform_client::{Observers, TerraformClient, TerraformOptions};

struct FakeTool {
    dir: tempfile::TempDir,
    script: PathBuf,
}

impl FakeTool {
    /// Write `body` as the tool; `"$1"` holds the subcommand and every
    /// invocation appends its subcommand to `invocations.log` first.
    fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-terraform");
        let log = dir.path().join("invocations.log");
        let contents = format!(
            "#!/bin/sh\necho \"$1\" >> {}\n{}\n",
            log.display(),
            body
        );
        fs::write(&script, contents).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, script }
    }

    fn client(&self) -> TerraformClient {
        TerraformClient::new(TerraformOptions::new())
            .unwrap()
            .with_executable(self.script.to_string_lossy())
            .with_working_dir(self.dir.path())
    }

    fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("invocations.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

fn line_sink() -> (Arc<Mutex<Vec<String>>>, Observers) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    let observers =
        Observers::new().on_output(move |line| sink.lock().unwrap().push(line.to_string()));
    (lines, observers)
}

#[test]
fn version_resolves_to_first_line() {
    let tool = FakeTool::new(r#"[ "$1" = version ] && echo "1.2.3""#);
    let client = tool.client();

    let version = smol::block_on(client.version(Observers::new()).unwrap());

    assert_eq!(version.as_deref(), Some("1.2.3"));
    client.close().unwrap();
}

#[test]
fn version_is_none_on_nonzero_exit() {
    let tool = FakeTool::new("echo \"1.2.3\"\nexit 1");
    let client = tool.client();

    let version = smol::block_on(client.version(Observers::new()).unwrap());

    assert_eq!(version, None);
    client.close().unwrap();
}

#[test]
fn apply_runs_init_then_apply() {
    let tool = FakeTool::new("echo \"done $1\"");
    let client = tool.client();
    let (lines, observers) = line_sink();

    let succeeded = smol::block_on(client.apply(observers).unwrap());

    assert!(succeeded);
    assert_eq!(tool.invocations(), ["init", "apply"]);
    assert_eq!(*lines.lock().unwrap(), ["done init", "done apply"]);
    client.close().unwrap();
}

#[test]
fn failed_init_short_circuits_the_pipeline() {
    let tool = FakeTool::new(r#"[ "$1" = init ] && exit 1 || true"#);
    let client = tool.client();

    let succeeded = smol::block_on(client.plan(Observers::new()).unwrap());

    assert!(!succeeded);
    assert_eq!(tool.invocations(), ["init"]);
    client.close().unwrap();
}

#[test]
fn destroy_passes_the_force_flag() {
    let tool = FakeTool::new(r#"[ "$1" = destroy ] && [ "$2" != -force ] && exit 1 || true"#);
    let client = tool.client();

    let succeeded = smol::block_on(client.destroy(Observers::new()).unwrap());

    assert!(succeeded);
    assert_eq!(tool.invocations(), ["init", "destroy"]);
    client.close().unwrap();
}

#[test]
fn output_flattens_declared_values() {
    let tool = FakeTool::new(
        r#"echo '{"endpoint":{"type":"string","value":"https://example.net","sensitive":false},"count":{"type":"number","value":2,"sensitive":true}}'"#,
    );
    let client = tool.client();

    let values = smol::block_on(client.output(Observers::new()).unwrap());

    assert_eq!(values.len(), 2);
    assert_eq!(values["endpoint"], serde_json::json!("https://example.net"));
    assert_eq!(values["count"], serde_json::json!(2));
    assert_eq!(tool.invocations(), ["output"]);
    client.close().unwrap();
}

#[test]
fn malformed_output_yields_empty_map_and_one_error() {
    let tool = FakeTool::new("echo 'not json'");
    let client = tool.client();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let observers =
        Observers::new().on_error(move |line| sink.lock().unwrap().push(line.to_string()));

    let values = smol::block_on(client.output(observers).unwrap());

    assert!(values.is_empty());
    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("JSON parse error:"));
    client.close().unwrap();
}

#[test]
fn output_on_nonzero_exit_is_empty_without_parse_errors() {
    let tool = FakeTool::new("echo '{\"broken\"'\nexit 1");
    let client = tool.client();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let observers =
        Observers::new().on_error(move |line| sink.lock().unwrap().push(line.to_string()));

    let values = smol::block_on(client.output(observers).unwrap());

    assert!(values.is_empty());
    assert!(errors.lock().unwrap().is_empty());
    client.close().unwrap();
}

#[test]
fn stderr_reaches_the_error_observer_on_failure() {
    let tool = FakeTool::new("echo 'provider misconfigured' >&2\nexit 1");
    let client = tool.client();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let observers =
        Observers::new().on_error(move |line| sink.lock().unwrap().push(line.to_string()));

    let succeeded = smol::block_on(client.plan(observers).unwrap());

    assert!(!succeeded);
    assert_eq!(*errors.lock().unwrap(), ["provider misconfigured"]);
    client.close().unwrap();
}

#[test]
fn missing_executable_fails_the_pipeline_not_the_call() {
    let dir = tempfile::tempdir().unwrap();
    let client = TerraformClient::new(TerraformOptions::new())
        .unwrap()
        .with_executable("/nonexistent/terraform-binary")
        .with_working_dir(dir.path());

    let succeeded = smol::block_on(client.plan(Observers::new()).unwrap());

    assert!(!succeeded);
    client.close().unwrap();
}

#[test]
fn dropping_the_task_cancels_the_pipeline() {
    // init blocks long enough that cancellation must be what ends it.
    let tool = FakeTool::new(r#"[ "$1" = init ] && sleep 30 || true"#);
    let client = tool.client();

    let task = client.plan(Observers::new()).unwrap();
    std::thread::sleep(Duration::from_millis(300));
    drop(task);

    // The blocked step is killed and the second step never launches.
    client.close_with_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(tool.invocations(), ["init"]);
}

#[test]
fn close_with_short_timeout_reports_shutdown_error() {
    let tool = FakeTool::new("sleep 30");
    let client = tool.client();

    let _task = client.version(Observers::new()).unwrap();
    std::thread::sleep(Duration::from_millis(100));

    let err = client
        .close_with_timeout(Duration::from_millis(100))
        .unwrap_err();
    assert!(matches!(err, terraform_client::Error::Shutdown { .. }));
}
