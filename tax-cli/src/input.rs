use std::{fs, path::Path};

use anyhow::{Context, Result};
use tax_core::TaxReturn;
use tracing::debug;

/// Parses a TOML return and checks its record-level invariants.
///
/// Dates are written as quoted ISO strings (`"2025-03-01"`) and filing
/// statuses by variant name (`"MarriedFilingJointly"`).
pub fn parse_return(source: &str) -> Result<TaxReturn> {
    let ret: TaxReturn = toml::from_str(source).context("malformed tax return")?;
    ret.validate().context("invalid tax return")?;
    debug!(
        tax_year = ret.tax_year,
        filing_status = ret.filing_status().as_str(),
        wages = ret.wages.len(),
        transactions = ret.capital_transactions.len(),
        "parsed return"
    );
    Ok(ret)
}

pub fn load_return(path: &Path) -> Result<TaxReturn> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    parse_return(&source).with_context(|| format!("in '{}'", path.display()))
}
