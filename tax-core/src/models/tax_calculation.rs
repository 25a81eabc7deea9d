use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// The complete result of one engine run.
///
/// Produced wholesale by [`crate::TaxEngine`] and never updated in place:
/// a recomputation replaces the whole record. Display and document
/// generation read it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub tax_year: i32,
    pub filing_status: FilingStatus,

    // Income
    pub wage_income: Decimal,
    pub interest_income: Decimal,
    pub dividend_income: Decimal,
    /// After the annual capital loss limit.
    pub net_capital_gain: Decimal,
    /// Schedule C profit, never below zero.
    pub business_income: Decimal,
    /// Sum of every property's net; losses included.
    pub rental_income: Decimal,
    /// Taxable part of Roth conversions and IRA distributions.
    pub taxable_ira_amount: Decimal,
    pub total_income: Decimal,

    // Adjustments and AGI
    pub self_employment_tax_deduction: Decimal,
    pub adjustments: Decimal,
    pub adjusted_gross_income: Decimal,

    // Deductions
    pub standard_deduction: Decimal,
    pub itemized_deduction: Decimal,
    pub deduction: Decimal,
    pub is_itemized: bool,
    pub qbi_deduction: Decimal,
    pub taxable_income: Decimal,

    // Tax
    pub regular_tax: Decimal,
    /// Bracket rate on the next dollar of taxable income.
    pub marginal_rate: Decimal,
    /// Form 6251 line 4: AGI plus the SALT add-back when itemizing.
    pub alternative_minimum_taxable_income: Decimal,
    pub alternative_minimum_tax: Decimal,
    pub child_tax_credit: Decimal,
    pub education_credits: Decimal,
    pub savers_credit: Decimal,
    /// Sum of the three credits before they are limited to income tax.
    pub total_credits: Decimal,
    pub self_employment_tax: Decimal,
    pub additional_medicare_tax: Decimal,
    pub total_tax: Decimal,

    // Payments
    pub federal_withholding: Decimal,
    pub estimated_payments: Decimal,
    pub total_payments: Decimal,
    /// Positive for a refund, negative for an amount owed.
    pub refund_or_amount_owed: Decimal,

    /// IRA basis carried into next year's Form 8606.
    pub remaining_retirement_basis: Decimal,
}

impl TaxCalculation {
    pub fn is_refund(&self) -> bool {
        self.refund_or_amount_owed > Decimal::ZERO
    }

    /// Amount owed as a positive number; zero for a refund.
    pub fn amount_owed(&self) -> Decimal {
        (-self.refund_or_amount_owed).max(Decimal::ZERO)
    }
}
