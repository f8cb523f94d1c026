//! Destroy a module.

use super::{load_options, print_hint, spinner};
use crate::ModuleArgs;
use anyhow::Result;
use console::style;
use tfh_core::{Terraform, TerraformCli};

/// Run `terraform destroy`.
pub fn run(args: &ModuleArgs) -> Result<()> {
    let options = load_options(args)?;

    let pb = spinner(&format!("Destroying {}...", options.dir().display()));
    let result = TerraformCli::new().destroy(&options);
    pb.finish_and_clear();

    if let Err(e) = result {
        print_hint(&e);
        return Err(e.into());
    }

    println!("{} Destroyed {}", style("✓").green(), options.dir().display());
    Ok(())
}
