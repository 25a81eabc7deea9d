//! Adjustments to income (Schedule 1 Part II).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Adjustments;
use crate::calculations::SeTaxResult;
use crate::calculations::common::round_dollars;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentsSummary {
    /// Deductible half of SE tax; zero when profit was under the threshold.
    pub self_employment_tax_deduction: Decimal,
    pub hsa: Decimal,
    /// Traditional IRA contribution, only when flagged deductible.
    pub ira: Decimal,
    pub student_loan_interest: Decimal,
    pub educator_expenses: Decimal,
    /// Rounded sum of the above.
    pub total: Decimal,
}

/// Sums the above-the-line deductions.
///
/// Amounts are taken as given; statutory caps are the input layer's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjustmentCalculator;

impl AdjustmentCalculator {
    pub fn calculate(
        &self,
        adjustments: &Adjustments,
        se_tax: &SeTaxResult,
    ) -> AdjustmentsSummary {
        let self_employment_tax_deduction = if se_tax.below_threshold {
            Decimal::ZERO
        } else {
            se_tax.se_tax_deduction
        };
        let hsa = adjustments.hsa.as_ref().map_or(Decimal::ZERO, |h| h.amount);
        let ira = adjustments
            .ira
            .as_ref()
            .filter(|ira| ira.is_deductible)
            .map_or(Decimal::ZERO, |ira| ira.traditional);

        let total = round_dollars(
            self_employment_tax_deduction
                + hsa
                + ira
                + adjustments.student_loan_interest
                + adjustments.educator_expenses,
        );
        debug!(total = %total, "computed adjustments to income");

        AdjustmentsSummary {
            self_employment_tax_deduction,
            hsa,
            ira,
            student_loan_interest: adjustments.student_loan_interest,
            educator_expenses: adjustments.educator_expenses,
            total,
        }
    }
}
