//! Per-module configuration for harness runs.

use crate::error::{Result, TfError};
use crate::options::Options;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the module directory.
pub const CONFIG_FILE: &str = "tfh.toml";

/// Overrides the terraform executable.
pub const ENV_TERRAFORM_BIN: &str = "TFH_TERRAFORM_BIN";

/// When set to a truthy value, runs leave resources in place.
pub const ENV_SKIP_DESTROY: &str = "TFH_SKIP_DESTROY";

/// Configuration loaded from `tfh.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Variable files, relative to the module directory.
    #[serde(default)]
    pub var_files: Vec<PathBuf>,

    /// Terraform invocation settings.
    #[serde(default)]
    pub terraform: TerraformConfig,

    /// Input variables.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Environment for the terraform process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Backend configuration for init.
    #[serde(default)]
    pub backend_config: BTreeMap<String, String>,
}

/// Terraform invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerraformConfig {
    /// Executable name or path (default: `terraform`).
    pub binary: Option<PathBuf>,

    /// Pass `-no-color` (default: false).
    #[serde(default)]
    pub no_color: bool,

    /// State locking (default: true).
    #[serde(default = "default_lock")]
    pub lock: bool,
}

fn default_lock() -> bool {
    true
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            binary: None,
            no_color: false,
            lock: true,
        }
    }
}

impl Config {
    /// Load configuration from the module directory.
    ///
    /// A missing file yields the default configuration.
    pub fn load(module_dir: &Path) -> Result<Self> {
        let path = module_dir.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| TfError::ConfigError(format!("failed to read config: {}", e)))?;
            Self::parse(&content)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TfError::ConfigError(format!("failed to parse config: {}", e)))
    }

    /// Save configuration into the module directory.
    pub fn save(&self, module_dir: &Path) -> Result<()> {
        let path = module_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| TfError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| TfError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    /// Build run options for `module_dir`.
    ///
    /// Relative var files are resolved against the module directory, which is
    /// also terraform's working directory.
    pub fn to_options(&self, module_dir: &Path) -> Options {
        let mut options = Options::new(module_dir)
            .with_no_color(self.terraform.no_color)
            .with_lock(self.terraform.lock);
        if let Some(binary) = &self.terraform.binary {
            options = options.with_binary(binary);
        }
        options.vars = self.vars.clone();
        options.var_files = self.var_files.clone();
        options.env = self.env.clone();
        options.backend_config = self.backend_config.clone();
        options
    }
}

/// Apply environment overrides on top of `options`.
pub fn apply_env_overrides(mut options: Options) -> Options {
    if let Some(binary) = read_env_nonempty(ENV_TERRAFORM_BIN) {
        options.terraform_binary = PathBuf::from(binary);
    }
    options
}

/// Whether [`ENV_SKIP_DESTROY`] asks to keep resources.
pub fn skip_destroy_from_env() -> bool {
    read_env_nonempty(ENV_SKIP_DESTROY).is_some_and(|v| parse_bool(&v))
}

fn read_env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Serializes tests that set or read the process environment.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
