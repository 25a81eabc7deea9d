//! Alternative minimum tax (Form 6251, simplified).
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | AGI (taxable income before the deduction) |
//! | 2a   | Add back capped state and local taxes when itemizing |
//! | 4    | Alternative minimum taxable income (AMTI) |
//! | 5    | Exemption, reduced by 25% of AMTI over the phase-out threshold |
//! | 6    | AMTI − exemption, floored at zero |
//! | 7    | Tentative minimum tax: 26%, then 28% above the rate threshold |
//! | 11   | AMT: tentative minimum tax − regular tax, floored at zero |
//!
//! Other preference items (ISO exercises, private activity bond interest,
//! depreciation differences) are not modeled.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{non_negative, round_dollars};
use crate::{AmtTable, FilingStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtResult {
    pub amti: Decimal,
    /// Exemption after the phase-out.
    pub exemption: Decimal,
    pub taxable_excess: Decimal,
    pub tentative_minimum_tax: Decimal,
    pub alternative_minimum_tax: Decimal,
}

#[derive(Debug, Clone)]
pub struct AmtCalculator<'a> {
    table: &'a AmtTable,
}

impl<'a> AmtCalculator<'a> {
    pub fn new(table: &'a AmtTable) -> Self {
        Self { table }
    }

    /// `salt_add_back` is the capped SALT deduction when the return
    /// itemizes, otherwise zero.
    pub fn calculate(
        &self,
        status: FilingStatus,
        agi: Decimal,
        salt_add_back: Decimal,
        regular_tax: Decimal,
    ) -> AmtResult {
        let amti = agi + salt_add_back;
        let exemption = self.exemption(status, amti);
        let taxable_excess = non_negative(amti - exemption);
        let tentative_minimum_tax = self.tentative_minimum_tax(taxable_excess);
        let alternative_minimum_tax = non_negative(tentative_minimum_tax - regular_tax);

        debug!(
            amti = %amti,
            exemption = %exemption,
            tentative_minimum_tax = %tentative_minimum_tax,
            amt = %alternative_minimum_tax,
            "computed alternative minimum tax"
        );

        AmtResult {
            amti,
            exemption,
            taxable_excess,
            tentative_minimum_tax,
            alternative_minimum_tax,
        }
    }

    /// Line 5.
    fn exemption(
        &self,
        status: FilingStatus,
        amti: Decimal,
    ) -> Decimal {
        let over = non_negative(amti - *self.table.phaseout_threshold.get(status));
        non_negative(*self.table.exemption.get(status) - over * self.table.phaseout_rate)
    }

    /// Line 7.
    fn tentative_minimum_tax(
        &self,
        taxable_excess: Decimal,
    ) -> Decimal {
        let threshold = self.table.rate_threshold;
        let tax = if taxable_excess <= threshold {
            taxable_excess * self.table.low_rate
        } else {
            threshold * self.table.low_rate + (taxable_excess - threshold) * self.table.high_rate
        };
        round_dollars(tax)
    }
}
