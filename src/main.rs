//! Catalog migration CLI.
//!
//! Thin driver around the engine: argument parsing, logging setup, and a
//! final console summary. All migration behavior lives in the library.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use catalog_migrate::batch::{self, BatchOptions};
use catalog_migrate::engine::{CatalogMigrator, MigrationTarget, RuleSet};

/// Migrate game-content JSON catalogs to the v5.1 schema
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a single catalog file to migrate
    path: Option<PathBuf>,

    /// Migrate every catalog found under the data root
    #[arg(long, conflicts_with = "path")]
    all: bool,

    /// Data root searched with --all
    #[arg(long, default_value = "data")]
    root: PathBuf,

    /// Overwrite catalogs instead of writing side-by-side copies
    #[arg(long)]
    in_place: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    tracing::info!("catalog-migrate v{} starting", catalog_migrate::VERSION);

    let target = MigrationTarget::v5_1(chrono::Local::now().format("%Y-%m-%d").to_string());
    let migrator = CatalogMigrator::new(RuleSet::v5(), target);
    let options = BatchOptions {
        in_place: args.in_place,
    };

    let summary = if args.all {
        batch::run(&migrator, &args.root, &options)
    } else if let Some(path) = args.path {
        batch::run_files(&migrator, &[path], &options)
    } else {
        anyhow::bail!("provide a catalog path or --all");
    };

    println!("{}", summary.report.summary());
    if summary.report.failed_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}
