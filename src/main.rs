use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tfrefactor_core::{FileOutcome, MigrateOptions, MigrationEngine, migrate_path};

/// Split legacy inline arguments out into standalone Terraform resources
#[derive(Parser)]
#[command(name = "tfrefactor")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every resource of RESOURCE_TYPE found under PATH
    Resource {
        /// Legacy resource type (only aws_s3_bucket is supported)
        resource_type: String,
        /// A .tf file or a directory of .tf files
        path: PathBuf,
        /// Also write <stem>_new_resources.csv linking new resources to their parent
        #[arg(long)]
        csv: bool,
        /// Descend into subdirectories
        #[arg(long)]
        recursive: bool,
        /// Arguments to leave on the legacy resource
        #[arg(long, value_delimiter = ',')]
        ignore_arguments: Vec<String>,
        /// Resource names to leave untouched
        #[arg(long, value_delimiter = ',')]
        ignore_names: Vec<String>,
        /// Regular expressions for paths to skip
        #[arg(long, value_delimiter = ',')]
        ignore_paths: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TFREFACTOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resource {
            resource_type,
            path,
            csv,
            recursive,
            ignore_arguments,
            ignore_names,
            ignore_paths,
        } => {
            let options = MigrateOptions::new(resource_type)
                .with_csv(csv)
                .with_recursive(recursive)
                .with_ignore_arguments(ignore_arguments)
                .with_ignore_names(ignore_names)
                .with_ignore_paths(ignore_paths);
            let engine = MigrationEngine::new(&options)?;

            let report = migrate_path(&path, &engine, &options)
                .with_context(|| format!("failed to migrate {}", path.display()))?;

            for (input, outcome) in &report.migrated {
                if let FileOutcome::Migrated {
                    output, resources, ..
                } = outcome
                {
                    println!(
                        "{} -> {} ({} new resources)",
                        input.display(),
                        output.display(),
                        resources.len()
                    );
                }
            }
            for (input, err) in &report.failed {
                eprintln!("{}: {err}", input.display());
            }

            Ok(if report.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}
