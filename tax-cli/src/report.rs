//! Rendering a [`TaxCalculation`] for the terminal or for other tools.

use std::fmt::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};
use tax_core::TaxCalculation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Line-by-line summary.
    #[default]
    Text,
    /// Every field of the calculation as a TOML table.
    Toml,
}

/// Formats an amount as dollars and cents with thousands separators,
/// e.g. `-$1,234.50`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

pub fn render(
    calc: &TaxCalculation,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(calc)),
        OutputFormat::Toml => {
            toml::to_string_pretty(calc).context("cannot serialize calculation")
        }
    }
}

pub fn render_text(calc: &TaxCalculation) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_text(&mut out, calc);
    out
}

fn write_text(
    out: &mut String,
    c: &TaxCalculation,
) -> std::fmt::Result {
    writeln!(out, "Tax year {} ({})", c.tax_year, c.filing_status.label())?;

    section(out, "Income")?;
    line(out, "Wages", c.wage_income)?;
    line(out, "Interest", c.interest_income)?;
    line(out, "Ordinary dividends", c.dividend_income)?;
    line(out, "Net capital gain", c.net_capital_gain)?;
    line(out, "Business income", c.business_income)?;
    line(out, "Rental income", c.rental_income)?;
    line(out, "Taxable IRA amount", c.taxable_ira_amount)?;
    line(out, "Total income", c.total_income)?;

    section(out, "Adjusted gross income")?;
    line(out, "Deductible part of SE tax", c.self_employment_tax_deduction)?;
    line(out, "Total adjustments", c.adjustments)?;
    line(out, "Adjusted gross income", c.adjusted_gross_income)?;

    section(out, "Deductions")?;
    line(out, "Standard deduction", c.standard_deduction)?;
    line(out, "Itemized deduction", c.itemized_deduction)?;
    line(
        out,
        if c.is_itemized {
            "Deduction taken (itemized)"
        } else {
            "Deduction taken (standard)"
        },
        c.deduction,
    )?;
    line(out, "QBI deduction", c.qbi_deduction)?;
    line(out, "Taxable income", c.taxable_income)?;

    section(out, "Tax")?;
    line(out, "Regular tax", c.regular_tax)?;
    writeln!(out, "  {:<32}{:>16}", "Marginal rate", format_rate(c.marginal_rate))?;
    line(out, "AMT income", c.alternative_minimum_taxable_income)?;
    line(out, "Alternative minimum tax", c.alternative_minimum_tax)?;
    line(out, "Child tax credit", c.child_tax_credit)?;
    line(out, "Education credits", c.education_credits)?;
    line(out, "Saver's credit", c.savers_credit)?;
    line(out, "Total credits", c.total_credits)?;
    line(out, "Self-employment tax", c.self_employment_tax)?;
    line(out, "Additional Medicare tax", c.additional_medicare_tax)?;
    line(out, "Total tax", c.total_tax)?;

    section(out, "Payments")?;
    line(out, "Federal withholding", c.federal_withholding)?;
    line(out, "Estimated payments", c.estimated_payments)?;
    line(out, "Total payments", c.total_payments)?;

    writeln!(out)?;
    if c.is_refund() {
        line(out, "Refund", c.refund_or_amount_owed)?;
    } else {
        line(out, "Amount owed", c.amount_owed())?;
    }

    if !c.remaining_retirement_basis.is_zero() {
        writeln!(out)?;
        line(out, "IRA basis carried forward", c.remaining_retirement_basis)?;
    }
    Ok(())
}

fn section(
    out: &mut String,
    title: &str,
) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")
}

fn line(
    out: &mut String,
    label: &str,
    amount: Decimal,
) -> std::fmt::Result {
    writeln!(out, "  {:<32}{:>16}", label, format_money(amount))
}
