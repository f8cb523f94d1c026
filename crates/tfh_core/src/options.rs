//! Run configuration for a single module under test.

use crate::error::{Result, TfError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default executable name looked up on PATH.
pub const DEFAULT_TERRAFORM_BINARY: &str = "terraform";

/// Everything needed to run terraform against one module directory.
///
/// Built once at the start of a run and borrowed by every operation, so
/// apply and destroy always see the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Directory holding the module's `.tf` files.
    pub terraform_dir: PathBuf,

    /// Executable name or path.
    #[serde(default = "default_binary")]
    pub terraform_binary: PathBuf,

    /// `-var name=value` pairs.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// `-var-file` paths, passed in order.
    #[serde(default)]
    pub var_files: Vec<PathBuf>,

    /// Extra environment for the child process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// `-backend-config key=value` pairs, init only.
    #[serde(default)]
    pub backend_config: BTreeMap<String, String>,

    /// Append `-no-color` to every command.
    #[serde(default)]
    pub no_color: bool,

    /// State locking; `false` adds `-lock=false`.
    #[serde(default = "default_lock")]
    pub lock: bool,
}

fn default_binary() -> PathBuf {
    PathBuf::from(DEFAULT_TERRAFORM_BINARY)
}

fn default_lock() -> bool {
    true
}

impl Options {
    /// Options for `dir` with every other field at its default.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            terraform_dir: dir.into(),
            terraform_binary: default_binary(),
            vars: BTreeMap::new(),
            var_files: Vec::new(),
            env: BTreeMap::new(),
            backend_config: BTreeMap::new(),
            no_color: false,
            lock: true,
        }
    }

    /// Use a specific terraform executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.terraform_binary = binary.into();
        self
    }

    /// Set one input variable.
    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a variables file.
    pub fn with_var_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.var_files.push(path.into());
        self
    }

    /// Set one environment variable on the child process.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Set one backend configuration value.
    pub fn with_backend_config(mut self, key: &str, value: &str) -> Self {
        self.backend_config.insert(key.to_string(), value.to_string());
        self
    }

    /// Toggle `-no-color`.
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Toggle state locking.
    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    /// Module directory.
    pub fn dir(&self) -> &Path {
        &self.terraform_dir
    }

    /// Fails with [`TfError::ModuleDirNotFound`] unless the module directory exists.
    pub fn check_dir(&self) -> Result<()> {
        if self.terraform_dir.is_dir() {
            Ok(())
        } else {
            Err(TfError::ModuleDirNotFound(self.terraform_dir.clone()))
        }
    }

    /// Arguments for `terraform init`.
    pub fn init_args(&self) -> Vec<String> {
        let mut args = vec![
            "init".to_string(),
            "-input=false".to_string(),
            "-upgrade=false".to_string(),
        ];
        for (key, value) in &self.backend_config {
            args.push(format!("-backend-config={}={}", key, value));
        }
        self.push_color(&mut args);
        args
    }

    /// Arguments for `terraform apply`.
    pub fn apply_args(&self) -> Vec<String> {
        self.mutating_args("apply")
    }

    /// Arguments for `terraform destroy`.
    pub fn destroy_args(&self) -> Vec<String> {
        self.mutating_args("destroy")
    }

    /// Arguments for `terraform output -json`.
    pub fn output_args(&self) -> Vec<String> {
        let mut args = vec!["output".to_string(), "-json".to_string()];
        self.push_color(&mut args);
        args
    }

    fn mutating_args(&self, command: &str) -> Vec<String> {
        let mut args = vec![
            command.to_string(),
            "-input=false".to_string(),
            "-auto-approve".to_string(),
        ];
        if !self.lock {
            args.push("-lock=false".to_string());
        }
        for (name, value) in &self.vars {
            args.push("-var".to_string());
            args.push(format!("{}={}", name, value));
        }
        for file in &self.var_files {
            args.push(format!("-var-file={}", file.display()));
        }
        self.push_color(&mut args);
        args
    }

    fn push_color(&self, args: &mut Vec<String>) {
        if self.no_color {
            args.push("-no-color".to_string());
        }
    }
}

/// Anchor a relative `path` at `base`; absolute paths are returned unchanged.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Anchor a relative executable path at `base`.
///
/// A bare name such as `terraform` is left alone so the PATH lookup still
/// applies. Anything with a directory part is resolved, since the child runs
/// with the module directory as its working directory.
pub fn resolve_binary(binary: &Path, base: &Path) -> PathBuf {
    if binary.components().count() > 1 {
        resolve_path(binary, base)
    } else {
        binary.to_path_buf()
    }
}

/// Split a `NAME=VALUE` assignment.
///
/// Only the first `=` separates; values may themselves contain `=`.
pub fn parse_var(assignment: &str) -> Result<(String, String)> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(TfError::InvalidVar(assignment.to_string())),
    }
}
