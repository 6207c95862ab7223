//! CLI entry point for qkd-hal
//!
//! # Usage
//!
//! List every known driver and whether it can be constructed here:
//! ```bash
//! qkd-hal list
//! qkd-hal list --config bench.toml
//! ```
//!
//! Build, open and close every instrument of a bench file:
//! ```bash
//! qkd-hal check bench.toml
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qkd_hal::check::check_bench;
use qkd_hal::logging::{self, LogFormat, LoggingConfig};
use qkd_hal::{DriverRegistry, HalConfig};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "qkd-hal")]
#[command(about = "Instrument catalog and bench checks for the QKD hardware layer", long_about = None)]
struct Cli {
    /// Default log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit log events as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the driver catalog grouped by family
    List {
        /// Bench file whose `[dependencies]` section feeds the capability gates
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build, open and close every instrument of a bench file
    Check {
        /// Path to the bench TOML file
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    logging::init(LoggingConfig::from_level_name(&cli.log_level)?.with_format(format))?;

    match cli.command {
        Commands::List { config } => list(config.as_deref()),
        Commands::Check { config } => check(&config),
    }
}

/// Load a bench file and install its dependency resolver for the process.
fn load_bench(path: &Path) -> Result<HalConfig> {
    let config = HalConfig::load(path)
        .with_context(|| format!("failed to load bench file {}", path.display()))?;
    hal_core::install_resolver(config.resolver())
        .context("failed to install the dependency resolver")?;
    Ok(config)
}

fn list(config: Option<&Path>) -> Result<()> {
    if let Some(path) = config {
        load_bench(path)?;
    }
    let registry = DriverRegistry::with_fakes();
    print!("{}", registry.catalog_report());
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let config = load_bench(path)?;
    let registry = DriverRegistry::with_fakes();

    let report = check_bench(&registry, &config);
    for result in &report.results {
        println!("{}", result);
    }

    if !report.all_passed() {
        bail!(
            "{} of {} instruments failed",
            report.failures(),
            report.results.len()
        );
    }
    info!(instruments = report.results.len(), "bench check passed");
    println!("{} instruments ok", report.results.len());
    Ok(())
}
