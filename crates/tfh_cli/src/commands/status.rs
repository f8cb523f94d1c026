//! Tool availability.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tfh_core::{apply_env_overrides, Options, TerraformCli};

/// Show whether terraform can be executed.
pub fn run(terraform: Option<&Path>) -> Result<()> {
    let binary: PathBuf = match terraform {
        Some(path) => path.to_path_buf(),
        None => apply_env_overrides(Options::new(".")).terraform_binary,
    };

    println!("Tool Status:");
    println!();

    if TerraformCli::is_available(&binary) {
        println!("  terraform ({}): installed ✓", binary.display());
        if let Ok(version) = TerraformCli::version(&binary) {
            println!("    Version: {}", version);
        }
    } else {
        println!("  terraform ({}): not found ✗", binary.display());
        println!();
        println!("Install terraform from https://developer.hashicorp.com/terraform/install");
        println!("or point TFH_TERRAFORM_BIN at an existing binary.");
    }

    Ok(())
}
