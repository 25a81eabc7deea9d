//! Regular income tax from the tax rate schedules.

use rust_decimal::Decimal;
use tracing::debug;

use crate::TaxBracket;
use crate::calculations::common::round_dollars;

/// Applies a progressive bracket schedule to taxable income.
///
/// Brackets must be sorted by `min_income` in ascending order, contiguous,
/// and end with a bracket whose `max_income` is `None`;
/// [`crate::TaxYearTables::validate`] checks this.
#[derive(Debug, Clone)]
pub struct ProgressiveTaxCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> ProgressiveTaxCalculator<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Tax on `taxable_income`.
    ///
    /// Each bracket taxes the slice of income between its floor and ceiling.
    /// The sum is rounded once at the end; rounding per bracket drifts from
    /// the published tables.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{FilingStatus, TaxYearTables};
    /// use tax_core::calculations::ProgressiveTaxCalculator;
    ///
    /// let tables = TaxYearTables::for_year(2025).unwrap();
    /// let calculator = ProgressiveTaxCalculator::new(tables.brackets_for(FilingStatus::Single));
    ///
    /// // 1192.50 + 4386.00 + 4735.50
    /// assert_eq!(calculator.calculate(dec!(70000)), dec!(10314));
    /// ```
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut tax = Decimal::ZERO;
        for bracket in self.brackets {
            if taxable_income <= bracket.min_income {
                break;
            }
            let ceiling = bracket
                .max_income
                .map_or(taxable_income, |max| max.min(taxable_income));
            tax += (ceiling - bracket.min_income) * bracket.tax_rate;
        }

        let tax = round_dollars(tax);
        debug!(taxable_income = %taxable_income, tax = %tax, "computed regular tax");
        tax
    }

    /// Rate applied to the next dollar of income above `taxable_income`.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.brackets
            .iter()
            .find(|b| b.max_income.is_none_or(|max| taxable_income < max))
            .map_or(Decimal::ZERO, |b| b.tax_rate)
    }
}
