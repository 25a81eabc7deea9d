//! Total income (Form 1040 lines 1 through 9).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::TaxReturn;
use crate::calculations::common::{non_negative, round_dollars};

/// Components of total income, each as it enters the sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub wages: Decimal,
    pub interest: Decimal,
    pub ordinary_dividends: Decimal,
    /// After the capital loss limit; may be negative.
    pub net_capital_gain: Decimal,
    /// Schedule C profit, never below zero.
    pub business_income: Decimal,
    /// Sum of net rental income; losses reduce total income.
    pub rental_income: Decimal,
    pub taxable_ira_amount: Decimal,
    /// Sum of the components, rounded to whole dollars.
    pub total_income: Decimal,
}

/// Sums the income side of a return.
///
/// A business loss does not offset other income, but a rental loss does.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeAggregator;

impl IncomeAggregator {
    pub fn aggregate(
        &self,
        tax_return: &TaxReturn,
        net_capital_gain: Decimal,
        taxable_ira_amount: Decimal,
    ) -> IncomeSummary {
        let wages = tax_return.total_wages();
        let interest = tax_return.total_interest();
        let ordinary_dividends = tax_return.total_ordinary_dividends();
        let business_income = non_negative(tax_return.business_net_profit());
        let rental_income = tax_return
            .rental_properties
            .iter()
            .map(|p| p.net_income())
            .sum();

        let total_income = round_dollars(
            wages
                + interest
                + ordinary_dividends
                + net_capital_gain
                + business_income
                + rental_income
                + taxable_ira_amount,
        );

        debug!(
            wages = %wages,
            business_income = %business_income,
            rental_income = %rental_income,
            total_income = %total_income,
            "aggregated income"
        );

        IncomeSummary {
            wages,
            interest,
            ordinary_dividends,
            net_capital_gain,
            business_income,
            rental_income,
            taxable_ira_amount,
            total_income,
        }
    }
}
