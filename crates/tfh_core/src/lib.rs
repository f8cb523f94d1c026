//! tfh Core Library
//!
//! Drives terraform against a module directory the way an integration test
//! needs it:
//! - Typed run options shared by every step
//! - `init` + `apply` through the terraform CLI
//! - A destroy guard that tears the module down on every exit path
//!
//! # Quick Start
//!
//! ```no_run
//! use tfh_core::{DestroyGuard, Options, Terraform, TerraformCli};
//!
//! let options = Options::new("demos/complete");
//! let tf = TerraformCli::new();
//!
//! let _teardown = DestroyGuard::new(&tf, &options);
//! tf.init_and_apply(&options).unwrap();
//! ```
//!
//! # Configuration
//!
//! A module directory may carry a `tfh.toml`:
//!
//! ```
//! use tfh_core::Config;
//! use std::path::Path;
//!
//! let config = Config::parse("[vars]\nname = \"demo\"\n").unwrap();
//! let options = config.to_options(Path::new("demos/complete"));
//! assert_eq!(options.vars["name"], "demo");
//! ```

mod config;
mod error;
mod guard;
mod harness;
mod options;
mod terraform;

pub use config::{
    apply_env_overrides, skip_destroy_from_env, Config, TerraformConfig, CONFIG_FILE,
    ENV_SKIP_DESTROY, ENV_TERRAFORM_BIN,
};
pub use error::{Result, TfError};
pub use guard::DestroyGuard;
pub use harness::{run_init_apply_destroy, run_with_teardown, RunReport, Teardown};
pub use options::{parse_var, resolve_binary, resolve_path, Options, DEFAULT_TERRAFORM_BINARY};
pub use terraform::{parse_outputs, CommandOutput, Terraform, TerraformCli};
