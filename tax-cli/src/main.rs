use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use tax_cli::{
    input::load_return,
    logging::init_logging,
    report::{OutputFormat, render},
};
use tax_core::{TaxEngine, TaxYearTables};
use tax_data::TaxBracketLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Federal income tax calculator for Form 1040 and its schedules.
///
/// Reads a return from a TOML file, computes it against the built-in rate
/// tables for its tax year, and prints the result.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Tax return to compute (TOML).
    return_file: PathBuf,

    /// CSV of bracket schedules (X, Y-1, Y-2, Z) replacing the built-in ones.
    #[arg(long)]
    brackets: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level or filter directive. `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let ret = load_return(&cli.return_file)?;
    let mut tables = TaxYearTables::for_year(ret.tax_year)?;

    if let Some(path) = &cli.brackets {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open '{}'", path.display()))?;
        let records = TaxBracketLoader::parse(file)?;
        let written = TaxBracketLoader::load(&mut tables, &records)?;
        info!(path = %path.display(), written, "loaded bracket schedules");
    }

    let engine = TaxEngine::new(tables)?;
    debug!(tax_year = engine.tax_year(), "engine ready");

    let calc = engine.calculate(&ret)?;
    print!("{}", render(&calc, cli.format)?);

    Ok(())
}
