//! CLI commands.

pub mod apply;
pub mod destroy;
pub mod output;
pub mod status;

use crate::ModuleArgs;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tfh_core::{apply_env_overrides, parse_var, resolve_path, Config, Options};

/// Build run options: `tfh.toml`, then environment, then flags.
///
/// `--var-file` paths are relative to the invoking directory, not the module.
pub fn load_options(args: &ModuleArgs) -> Result<Options> {
    let config = Config::load(&args.dir)
        .with_context(|| format!("Failed to load config from {}", args.dir.display()))?;
    let mut options = apply_env_overrides(config.to_options(&args.dir));

    if let Some(binary) = &args.terraform {
        options = options.with_binary(binary);
    }
    for assignment in &args.vars {
        let (name, value) = parse_var(assignment)?;
        options = options.with_var(&name, &value);
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    for file in &args.var_files {
        options = options.with_var_file(resolve_path(file, &cwd));
    }
    if args.no_color {
        options = options.with_no_color(true);
    }

    Ok(options)
}

/// Spinner shown while terraform runs.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print an error's recovery hint, if it has one.
pub fn print_hint(err: &tfh_core::TfError) {
    if let Some(hint) = err.recovery_suggestion() {
        eprintln!("hint: {}", hint);
    }
}
