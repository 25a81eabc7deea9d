//! Qualified business income deduction (Form 8995, simplified).
//!
//! | Line | Description |
//! |------|-------------|
//! | 2    | Qualified business income: Schedule C profit − deductible SE tax |
//! | 5    | QBI component: line 2 × 20% |
//! | 11   | Taxable income before the QBI deduction |
//! | 12   | Net capital gain plus qualified dividends |
//! | 14   | Income limitation: (line 11 − line 12) × 20% |
//! | 15   | Deduction: smaller of line 5 or line 14 |
//!
//! The specified-service and W-2 wage limits for high incomes are not
//! modeled.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{non_negative, round_dollars};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QbiResult {
    pub qualified_business_income: Decimal,
    pub qbi_component: Decimal,
    pub income_limitation: Decimal,
    pub deduction: Decimal,
}

#[derive(Debug, Clone)]
pub struct QbiCalculator {
    rate: Decimal,
}

impl QbiCalculator {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    /// `net_capital_gain` may be negative; only a gain reduces the limit.
    pub fn calculate(
        &self,
        business_net_profit: Decimal,
        se_tax_deduction: Decimal,
        taxable_income_before_qbi: Decimal,
        net_capital_gain: Decimal,
        qualified_dividends: Decimal,
    ) -> QbiResult {
        let qualified_business_income = non_negative(business_net_profit) - se_tax_deduction;
        if qualified_business_income <= Decimal::ZERO {
            return QbiResult {
                qualified_business_income,
                ..Default::default()
            };
        }

        let qbi_component = qualified_business_income * self.rate;
        let capital_income = non_negative(net_capital_gain) + qualified_dividends;
        let income_limitation =
            non_negative(taxable_income_before_qbi - capital_income) * self.rate;
        let deduction = round_dollars(qbi_component.min(income_limitation));

        debug!(
            qbi = %qualified_business_income,
            limit = %income_limitation,
            deduction = %deduction,
            "computed QBI deduction"
        );

        QbiResult {
            qualified_business_income,
            qbi_component,
            income_limitation,
            deduction,
        }
    }
}
