//! Schedule D netting of short- and long-term gains and losses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::CapitalTransaction;

/// Result of netting a year's capital transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsSummary {
    /// Net short-term gain or loss before the loss limit.
    pub short_term: Decimal,
    /// Net long-term gain or loss before the loss limit.
    pub long_term: Decimal,
    /// Short-term amount after the loss limit.
    pub allowed_short_term: Decimal,
    /// Long-term amount after the loss limit.
    pub allowed_long_term: Decimal,
    /// Amount that flows into total income.
    pub net_capital_gain: Decimal,
    /// Loss beyond the annual limit. Not carried forward.
    pub disallowed_loss: Decimal,
}

/// Nets capital transactions and applies the annual capital loss limit.
#[derive(Debug, Clone)]
pub struct CapitalGainsNetter {
    loss_limit: Decimal,
}

impl CapitalGainsNetter {
    pub fn new(loss_limit: Decimal) -> Self {
        Self { loss_limit }
    }

    /// Buckets transactions by their long-term flag and nets each bucket.
    ///
    /// When the combined result is a loss larger than the limit, the excess
    /// is removed from the short-term loss first (if short-term is a loss),
    /// then from the long-term loss.
    pub fn net(
        &self,
        transactions: &[CapitalTransaction],
    ) -> CapitalGainsSummary {
        let (mut short_term, mut long_term) = (Decimal::ZERO, Decimal::ZERO);
        for tx in transactions {
            if tx.is_long_term {
                long_term += tx.gain_or_loss();
            } else {
                short_term += tx.gain_or_loss();
            }
        }

        let combined = short_term + long_term;
        let excess = -combined - self.loss_limit;
        if excess <= Decimal::ZERO {
            return CapitalGainsSummary {
                short_term,
                long_term,
                allowed_short_term: short_term,
                allowed_long_term: long_term,
                net_capital_gain: combined,
                disallowed_loss: Decimal::ZERO,
            };
        }

        warn!(
            net_loss = %-combined,
            limit = %self.loss_limit,
            disallowed = %excess,
            "capital loss exceeds annual limit; excess is not deductible this year"
        );

        let mut remaining = excess;
        let mut allowed_short_term = short_term;
        let mut allowed_long_term = long_term;
        if allowed_short_term < Decimal::ZERO {
            let taken = remaining.min(-allowed_short_term);
            allowed_short_term += taken;
            remaining -= taken;
        }
        if remaining > Decimal::ZERO {
            allowed_long_term += remaining;
        }

        CapitalGainsSummary {
            short_term,
            long_term,
            allowed_short_term,
            allowed_long_term,
            net_capital_gain: allowed_short_term + allowed_long_term,
            disallowed_loss: excess,
        }
    }
}
