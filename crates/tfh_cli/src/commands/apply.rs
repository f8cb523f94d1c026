//! Init and apply a module.

use super::{load_options, print_hint, spinner};
use crate::ModuleArgs;
use anyhow::Result;
use console::style;
use std::time::Instant;
use tfh_core::{Terraform, TerraformCli};

/// Run `terraform init` then `terraform apply`.
pub fn run(args: &ModuleArgs) -> Result<()> {
    let options = load_options(args)?;
    let start = Instant::now();

    let pb = spinner(&format!("Applying {}...", options.dir().display()));
    let result = TerraformCli::new().init_and_apply(&options);
    pb.finish_and_clear();

    if let Err(e) = result {
        print_hint(&e);
        return Err(e.into());
    }

    println!(
        "{} Applied {} in {:.2}s",
        style("✓").green(),
        options.dir().display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
