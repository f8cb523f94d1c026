//! Driving the terraform CLI.
//!
//! This module provides:
//! - The [`Terraform`] trait, the seam every harness operation goes through
//! - [`TerraformCli`], which spawns the real binary in the module directory
//! - Output capture and logging of each child process
//!
//! # Example
//!
//! ```no_run
//! use tfh_core::{Options, Terraform, TerraformCli};
//!
//! let options = Options::new("demos/complete");
//! let tf = TerraformCli::new();
//! tf.init_and_apply(&options).unwrap();
//! tf.destroy(&options).unwrap();
//! ```

use crate::error::{Result, TfError};
use crate::options::{resolve_binary, Options};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use tracing::{debug, info, warn};

/// Captured result of one terraform invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

/// Provisioning operations the harness needs.
///
/// Implemented by [`TerraformCli`] for real runs; tests substitute a
/// recording implementation.
pub trait Terraform {
    /// Run `terraform init`.
    fn init(&self, options: &Options) -> Result<CommandOutput>;

    /// Run `terraform apply`.
    fn apply(&self, options: &Options) -> Result<CommandOutput>;

    /// Run `terraform destroy`.
    fn destroy(&self, options: &Options) -> Result<CommandOutput>;

    /// Init, then apply. Stops at the first failure.
    fn init_and_apply(&self, options: &Options) -> Result<CommandOutput> {
        self.init(options)?;
        self.apply(options)
    }
}

/// Terraform driven as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerraformCli;

impl TerraformCli {
    /// Create a CLI driver.
    pub fn new() -> Self {
        Self
    }

    /// Check if the configured terraform binary can be executed.
    pub fn is_available(binary: &Path) -> bool {
        Command::new(caller_relative(binary))
            .arg("version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// First line of `terraform version`, e.g. `Terraform v1.9.5`.
    pub fn version(binary: &Path) -> Result<String> {
        let output = Command::new(caller_relative(binary))
            .arg("version")
            .output()
            .map_err(|e| spawn_error(binary, e))?;
        if !output.status.success() {
            return Err(command_failed("version", output.status, &output.stderr));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Run `terraform output -json` and return every output's value.
    pub fn output_json(&self, options: &Options) -> Result<BTreeMap<String, Value>> {
        let output = self.run(options, "output", options.output_args())?;
        parse_outputs(&output.stdout)
    }

    fn run(&self, options: &Options, command: &str, args: Vec<String>) -> Result<CommandOutput> {
        options.check_dir()?;

        // The child's working directory is the module, so a relative binary
        // has to be anchored at ours first.
        let binary = caller_relative(&options.terraform_binary);
        debug!(
            dir = %options.dir().display(),
            binary = %binary.display(),
            "running terraform {}",
            args.join(" ")
        );

        let mut child = Command::new(&binary)
            .args(&args)
            .envs(&options.env)
            .env("TF_IN_AUTOMATION", "1")
            .current_dir(options.dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(&options.terraform_binary, e))?;

        let stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| TfError::SpawnFailed("stdout not captured".into()))?;
        let stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| TfError::SpawnFailed("stderr not captured".into()))?;

        let (stdout, stderr) = thread::scope(|s| {
            let stderr_reader =
                s.spawn(move || stream_lines(stderr_pipe, command, Stream::Stderr));
            let stdout = stream_lines(stdout_pipe, command, Stream::Stdout);
            (stdout, stderr_reader.join().unwrap_or_default())
        });

        let status = child.wait()?;
        if !status.success() {
            return Err(command_failed(command, status, stderr.as_bytes()));
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Log each line as it arrives and return everything read.
fn stream_lines(pipe: impl Read, command: &str, stream: Stream) -> String {
    let mut reader = BufReader::new(pipe);
    let mut collected = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let trimmed = line.trim_end();
                if !trimmed.trim().is_empty() {
                    match stream {
                        Stream::Stdout => info!(target: "tfh::terraform", command, "{}", trimmed),
                        Stream::Stderr => warn!(target: "tfh::terraform", command, "{}", trimmed),
                    }
                }
                collected.push_str(&line);
            }
            Err(e) => {
                warn!(command, "failed reading terraform output: {}", e);
                break;
            }
        }
    }

    collected
}

fn caller_relative(binary: &Path) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => resolve_binary(binary, &cwd),
        Err(_) => binary.to_path_buf(),
    }
}

impl Terraform for TerraformCli {
    fn init(&self, options: &Options) -> Result<CommandOutput> {
        self.run(options, "init", options.init_args())
    }

    fn apply(&self, options: &Options) -> Result<CommandOutput> {
        self.run(options, "apply", options.apply_args())
    }

    fn destroy(&self, options: &Options) -> Result<CommandOutput> {
        self.run(options, "destroy", options.destroy_args())
    }
}

fn spawn_error(binary: &Path, e: std::io::Error) -> TfError {
    if e.kind() == std::io::ErrorKind::NotFound {
        TfError::TerraformNotFound(binary.display().to_string())
    } else {
        TfError::SpawnFailed(e.to_string())
    }
}

fn command_failed(command: &str, status: ExitStatus, stderr: &[u8]) -> TfError {
    TfError::CommandFailed {
        command: command.to_string(),
        code: status.code(),
        stderr: String::from_utf8_lossy(stderr).trim().to_string(),
    }
}

/// Parse `terraform output -json`.
///
/// Terraform wraps each output as `{"sensitive": .., "type": .., "value": ..}`;
/// only the values are kept.
pub fn parse_outputs(json: &str) -> Result<BTreeMap<String, Value>> {
    if json.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let value: Value =
        serde_json::from_str(json).map_err(|e| TfError::OutputParse(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| TfError::OutputParse("expected a JSON object".to_string()))?;

    let mut outputs = BTreeMap::new();
    for (name, entry) in object {
        let value = entry
            .get("value")
            .cloned()
            .ok_or_else(|| TfError::OutputParse(format!("output {} has no value", name)))?;
        outputs.insert(name.clone(), value);
    }
    Ok(outputs)
}
