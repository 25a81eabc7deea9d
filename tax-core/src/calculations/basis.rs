//! IRA basis tracking and the pro-rata rule (Form 8606).
//!
//! Nondeductible contributions give a traditional IRA after-tax "basis".
//! When money leaves the account (a Roth conversion or a distribution), the
//! basis comes out in proportion to the basis share of everything in the
//! account, so a conversion is only tax-free if no pre-tax money remains at
//! year end.
//!
//! | Line | Description |
//! |------|-------------|
//! | 3    | Total basis: nondeductible contributions + prior-year basis |
//! | 6    | Year-end value of all traditional IRAs |
//! | 7    | Distributions (excluding conversions) |
//! | 8    | Amount converted to Roth |
//! | 9    | Pool: lines 6 + 7 + 8 |
//! | 10   | Basis fraction: line 3 / line 9 (at most 1) |
//! | 11   | Nontaxable conversion: line 8 × line 10 |
//! | 12   | Nontaxable distributions: line 7 × line 10 |
//! | 14   | Basis carried forward: line 3 − lines 11 and 12 |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::RetirementBasis;
use crate::calculations::common::{non_negative, round_dollars};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisResult {
    pub total_basis: Decimal,
    pub total_pool: Decimal,
    /// Unrounded; zero when the pool is empty.
    pub basis_fraction: Decimal,
    pub nontaxable_conversion: Decimal,
    pub taxable_conversion: Decimal,
    pub nontaxable_distributions: Decimal,
    pub taxable_distributions: Decimal,
    /// Basis carried to next year.
    pub remaining_basis: Decimal,
}

impl BasisResult {
    /// Conversion and distribution dollars that are taxable income.
    pub fn taxable_amount(&self) -> Decimal {
        self.taxable_conversion + self.taxable_distributions
    }
}

/// Form 8606 pro-rata calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasisCalculator;

impl BasisCalculator {
    /// Splits conversions and distributions into taxable and nontaxable parts.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::RetirementBasis;
    /// use tax_core::calculations::BasisCalculator;
    ///
    /// // Backdoor Roth: contribute 7000 nondeductible, convert it all, nothing left.
    /// let result = BasisCalculator.calculate(&RetirementBasis {
    ///     nondeductible_contributions: dec!(7000),
    ///     conversion_amount: dec!(7000),
    ///     ..Default::default()
    /// });
    ///
    /// assert_eq!(result.taxable_conversion, dec!(0));
    /// assert_eq!(result.remaining_basis, dec!(0));
    /// ```
    pub fn calculate(
        &self,
        record: &RetirementBasis,
    ) -> BasisResult {
        let total_basis = record.nondeductible_contributions + record.prior_year_basis;
        let total_pool = record.year_end_balance + record.distributions + record.conversion_amount;

        let basis_fraction = if total_pool.is_zero() {
            Decimal::ZERO
        } else {
            (total_basis / total_pool).min(Decimal::ONE)
        };

        let nontaxable_conversion = round_dollars(record.conversion_amount * basis_fraction);
        let taxable_conversion = record.conversion_amount - nontaxable_conversion;
        let nontaxable_distributions = round_dollars(record.distributions * basis_fraction);
        let taxable_distributions = record.distributions - nontaxable_distributions;

        let recovered = (record.conversion_amount + record.distributions) * basis_fraction;
        let remaining_basis = non_negative(round_dollars(total_basis - recovered));

        debug!(
            total_basis = %total_basis,
            total_pool = %total_pool,
            basis_fraction = %basis_fraction,
            taxable_conversion = %taxable_conversion,
            remaining_basis = %remaining_basis,
            "applied pro-rata rule"
        );

        BasisResult {
            total_basis,
            total_pool,
            basis_fraction,
            nontaxable_conversion,
            taxable_conversion,
            nontaxable_distributions,
            taxable_distributions,
            remaining_basis,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_record_is_all_zero() {
        let result = BasisCalculator.calculate(&RetirementBasis::default());

        assert_eq!(result, BasisResult::default());
    }

    #[test]
    fn clean_backdoor_conversion_is_tax_free() {
        let result = BasisCalculator.calculate(&RetirementBasis {
            nondeductible_contributions: dec!(7000),
            conversion_amount: dec!(7000),
            ..Default::default()
        });

        assert_eq!(result.basis_fraction, Decimal::ONE);
        assert_eq!(result.nontaxable_conversion, dec!(7000));
        assert_eq!(result.taxable_conversion, Decimal::ZERO);
        assert_eq!(result.remaining_basis, Decimal::ZERO);
    }

    #[test]
    fn growth_before_conversion_is_taxable() {
        let result = BasisCalculator.calculate(&RetirementBasis {
            nondeductible_contributions: dec!(7000),
            conversion_amount: dec!(7050),
            ..Default::default()
        });

        // Fraction 7000/7050; nontaxable 7000.
        assert_eq!(result.nontaxable_conversion, dec!(7000));
        assert_eq!(result.taxable_conversion, dec!(50));
        assert_eq!(result.remaining_basis, Decimal::ZERO);
    }

    #[test]
    fn pre_tax_balance_makes_conversion_mostly_taxable() {
        let result = BasisCalculator.calculate(&RetirementBasis {
            nondeductible_contributions: dec!(7000),
            conversion_amount: dec!(7000),
            year_end_balance: dec!(93000),
            ..Default::default()
        });

        // Pool 100000, fraction 0.07
        assert_eq!(result.total_pool, dec!(100000));
        assert_eq!(result.basis_fraction, dec!(0.07));
        assert_eq!(result.nontaxable_conversion, dec!(490));
        assert_eq!(result.taxable_conversion, dec!(6510));
        // 7000 − 490 stays as basis for later years
        assert_eq!(result.remaining_basis, dec!(6510));
    }

    #[test]
    fn taxable_fraction_approaches_one_minus_contribution_share() {
        let contribution = dec!(7000);
        let result = BasisCalculator.calculate(&RetirementBasis {
            nondeductible_contributions: contribution,
            conversion_amount: contribution,
            year_end_balance: dec!(993000),
            ..Default::default()
        });

        let taxable_fraction = result.taxable_conversion / contribution;
        let expected = Decimal::ONE - contribution / result.total_pool;
        assert!((taxable_fraction - expected).abs() < dec!(0.001));
    }

    #[test]
    fn prior_year_basis_counts_toward_fraction() {
        let result = BasisCalculator.calculate(&RetirementBasis {
            prior_year_basis: dec!(20000),
            conversion_amount: dec!(10000),
            year_end_balance: dec!(30000),
            ..Default::default()
        });

        // Fraction 20000 / 40000 = 0.5
        assert_eq!(result.nontaxable_conversion, dec!(5000));
        assert_eq!(result.taxable_conversion, dec!(5000));
        assert_eq!(result.remaining_basis, dec!(15000));
    }

    #[test]
    fn distributions_share_the_same_fraction() {
        let result = BasisCalculator.calculate(&RetirementBasis {
            prior_year_basis: dec!(10000),
            distributions: dec!(4000),
            year_end_balance: dec!(36000),
            ..Default::default()
        });

        // Fraction 10000 / 40000 = 0.25
        assert_eq!(result.nontaxable_distributions, dec!(1000));
        assert_eq!(result.taxable_distributions, dec!(3000));
        assert_eq!(result.taxable_amount(), dec!(3000));
        assert_eq!(result.remaining_basis, dec!(9000));
    }

    #[test]
    fn basis_larger_than_pool_caps_fraction_at_one() {
        let result = BasisCalculator.calculate(&RetirementBasis {
            prior_year_basis: dec!(12000),
            conversion_amount: dec!(5000),
            year_end_balance: dec!(3000),
            ..Default::default()
        });

        assert_eq!(result.basis_fraction, Decimal::ONE);
        assert_eq!(result.taxable_conversion, Decimal::ZERO);
        assert_eq!(result.remaining_basis, dec!(7000));
    }

    #[test]
    fn contribution_without_conversion_carries_basis_forward() {
        let result = BasisCalculator.calculate(&RetirementBasis {
            nondeductible_contributions: dec!(7000),
            year_end_balance: dec!(7200),
            ..Default::default()
        });

        assert_eq!(result.taxable_amount(), Decimal::ZERO);
        assert_eq!(result.remaining_basis, dec!(7000));
    }
}
