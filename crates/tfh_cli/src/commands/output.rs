//! Print module outputs.

use super::load_options;
use crate::ModuleArgs;
use anyhow::{Context, Result};
use tfh_core::TerraformCli;

/// Print `terraform output -json` values as a flat JSON object.
pub fn run(args: &ModuleArgs) -> Result<()> {
    let options = load_options(args)?;
    let outputs = TerraformCli::new()
        .output_json(&options)
        .context("Failed to read terraform outputs")?;
    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}
