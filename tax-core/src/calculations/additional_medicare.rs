//! Additional Medicare tax (Form 8959).
//!
//! A 0.9% surtax on Medicare wages and self-employment earnings above a
//! filing-status threshold. Wages use the threshold first; SE earnings only
//! get whatever threshold the wages left over.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{non_negative, round_dollars};
use crate::{AdditionalMedicareTable, FilingStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalMedicareResult {
    /// Part I, line 7. Unrounded.
    pub wage_portion: Decimal,
    /// Part II, line 13. Unrounded.
    pub self_employment_portion: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct AdditionalMedicareCalculator<'a> {
    table: &'a AdditionalMedicareTable,
}

impl<'a> AdditionalMedicareCalculator<'a> {
    pub fn new(table: &'a AdditionalMedicareTable) -> Self {
        Self { table }
    }

    /// `se_net_earnings` is Schedule SE line 4a (zero below the SE
    /// threshold).
    pub fn calculate(
        &self,
        status: FilingStatus,
        medicare_wages: Decimal,
        se_net_earnings: Decimal,
    ) -> AdditionalMedicareResult {
        let threshold = *self.table.threshold.get(status);

        let wage_portion = non_negative(medicare_wages - threshold) * self.table.rate;
        let remaining_threshold = non_negative(threshold - medicare_wages);
        let self_employment_portion =
            non_negative(se_net_earnings - remaining_threshold) * self.table.rate;
        let total = round_dollars(wage_portion + self_employment_portion);

        if total > Decimal::ZERO {
            debug!(
                medicare_wages = %medicare_wages,
                se_net_earnings = %se_net_earnings,
                threshold = %threshold,
                total = %total,
                "additional Medicare tax applies"
            );
        }

        AdditionalMedicareResult {
            wage_portion,
            self_employment_portion,
            total,
        }
    }
}
