//! tfh CLI - run a terraform module through init, apply and destroy.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "tfh")]
#[command(about = "Init, apply and tear down terraform modules", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run terraform init and apply
    Apply {
        #[command(flatten)]
        module: ModuleArgs,
    },
    /// Run terraform destroy
    Destroy {
        #[command(flatten)]
        module: ModuleArgs,
    },
    /// Init and apply, then always destroy
    Test {
        #[command(flatten)]
        module: ModuleArgs,
        /// Leave resources in place after apply
        #[arg(long)]
        keep: bool,
    },
    /// Print module outputs as JSON
    Output {
        #[command(flatten)]
        module: ModuleArgs,
    },
    /// Check terraform availability
    Status {
        /// Terraform executable to check
        #[arg(long)]
        terraform: Option<PathBuf>,
    },
}

/// Arguments shared by every command that targets a module.
#[derive(Args, Debug, Clone)]
pub struct ModuleArgs {
    /// Module directory
    #[arg(default_value = ".")]
    pub dir: PathBuf,
    /// Input variable (NAME=VALUE), repeatable
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,
    /// Variables file, repeatable
    #[arg(long = "var-file", value_name = "PATH")]
    pub var_files: Vec<PathBuf>,
    /// Disable color in terraform output
    #[arg(long)]
    pub no_color: bool,
    /// Terraform executable
    #[arg(long)]
    pub terraform: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=info shows terraform output)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply { module } => commands::apply::run(&module),
        Commands::Destroy { module } => commands::destroy::run(&module),
        Commands::Test { module, keep } => commands::test::run(&module, keep),
        Commands::Output { module } => commands::output::run(&module),
        Commands::Status { terraform } => commands::status::run(terraform.as_deref()),
    }
}
