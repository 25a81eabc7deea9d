//! Self-employment tax (Schedule SE, short form).
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 2    | Net profit from Schedule C |
//! | 4a   | Line 2 × 92.35% (net earnings factor) |
//! | 10   | Social security: smaller of line 4a or the wage base × 12.4% |
//! | 11   | Medicare: line 4a × 2.9% (no cap) |
//! | 12   | Self-employment tax: line 10 + line 11, rounded |
//! | 13   | Deductible part of SE tax: line 12 × 50% |
//!
//! The 0.9% additional Medicare surtax is not part of this worksheet; see
//! [`crate::calculations::additional_medicare`].
//!
//! # Minimum Threshold
//!
//! If net profit is $400 or less, no self-employment tax is due. The
//! threshold is configurable via [`SeTaxConfig::min_se_threshold`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{SeTaxCalculator, SeTaxConfig};
//!
//! let config = SeTaxConfig {
//!     ss_wage_max: dec!(176100),
//!     ss_tax_rate: dec!(0.124),
//!     medicare_tax_rate: dec!(0.029),
//!     net_earnings_factor: dec!(0.9235),
//!     deduction_factor: dec!(0.50),
//!     min_se_threshold: dec!(400),
//! };
//!
//! let result = SeTaxCalculator::new(config).calculate(dec!(110000)).unwrap();
//!
//! assert_eq!(result.self_employment_tax, dec!(15543));
//! assert_eq!(result.se_tax_deduction, dec!(7771.50));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::TaxYearTables;
use crate::calculations::common::round_dollars;

/// Errors that can occur when configuring the SE tax calculator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeTaxError {
    /// The net earnings factor must be between 0 and 1 (exclusive of 0).
    #[error("net earnings factor must be between 0 and 1, got {0}")]
    InvalidNetEarningsFactor(Decimal),

    /// The social security tax rate must be between 0 and 1.
    #[error("social security tax rate must be between 0 and 1, got {0}")]
    InvalidSocialSecurityRate(Decimal),

    /// The Medicare tax rate must be between 0 and 1.
    #[error("medicare tax rate must be between 0 and 1, got {0}")]
    InvalidMedicareRate(Decimal),

    /// The deduction factor must be between 0 and 1.
    #[error("deduction factor must be between 0 and 1, got {0}")]
    InvalidDeductionFactor(Decimal),

    /// The social security wage maximum must be positive.
    #[error("social security wage maximum must be positive, got {0}")]
    InvalidSsWageMax(Decimal),

    /// The minimum SE threshold must be non-negative.
    #[error("minimum SE threshold must be non-negative, got {0}")]
    InvalidMinSeThreshold(Decimal),
}

/// Rates and limits for Schedule SE.
///
/// These values are typically obtained from [`TaxYearTables`] and change
/// from year to year (the wage base in particular).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeTaxConfig {
    /// Maximum net earnings subject to social security tax.
    ///
    /// For 2025, this is $176,100.
    pub ss_wage_max: Decimal,

    /// Combined employer and employee social security rate, typically 12.4%.
    pub ss_tax_rate: Decimal,

    /// Combined employer and employee Medicare rate, typically 2.9%.
    pub medicare_tax_rate: Decimal,

    /// Share of net profit treated as net earnings, typically 92.35%.
    pub net_earnings_factor: Decimal,

    /// Share of SE tax deductible as an adjustment to income, typically 50%.
    pub deduction_factor: Decimal,

    /// Net profit at or below this amount owes no SE tax ($400).
    pub min_se_threshold: Decimal,
}

impl SeTaxConfig {
    /// Creates a new configuration from [`TaxYearTables`].
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{TaxYearTables, calculations::SeTaxConfig};
    ///
    /// let tables = TaxYearTables::for_year(2025).unwrap();
    /// let config = SeTaxConfig::from_tables(&tables);
    ///
    /// assert_eq!(config.ss_wage_max, dec!(176100));
    /// assert_eq!(config.min_se_threshold, dec!(400));
    /// ```
    pub fn from_tables(tables: &TaxYearTables) -> Self {
        Self {
            ss_wage_max: tables.ss_wage_max,
            ss_tax_rate: tables.ss_tax_rate,
            medicare_tax_rate: tables.medicare_tax_rate,
            net_earnings_factor: tables.se_tax_deductible_percentage,
            deduction_factor: tables.se_deduction_factor,
            min_se_threshold: tables.min_se_threshold,
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`SeTaxError`] if:
    /// - `net_earnings_factor` is not in (0, 1]
    /// - `ss_tax_rate`, `medicare_tax_rate` or `deduction_factor` is not in [0, 1]
    /// - `ss_wage_max` is not positive
    /// - `min_se_threshold` is negative
    pub fn validate(&self) -> Result<(), SeTaxError> {
        if self.net_earnings_factor <= Decimal::ZERO || self.net_earnings_factor > Decimal::ONE {
            return Err(SeTaxError::InvalidNetEarningsFactor(
                self.net_earnings_factor,
            ));
        }
        if self.ss_tax_rate < Decimal::ZERO || self.ss_tax_rate > Decimal::ONE {
            return Err(SeTaxError::InvalidSocialSecurityRate(self.ss_tax_rate));
        }
        if self.medicare_tax_rate < Decimal::ZERO || self.medicare_tax_rate > Decimal::ONE {
            return Err(SeTaxError::InvalidMedicareRate(self.medicare_tax_rate));
        }
        if self.deduction_factor < Decimal::ZERO || self.deduction_factor > Decimal::ONE {
            return Err(SeTaxError::InvalidDeductionFactor(self.deduction_factor));
        }
        if self.ss_wage_max <= Decimal::ZERO {
            return Err(SeTaxError::InvalidSsWageMax(self.ss_wage_max));
        }
        if self.min_se_threshold < Decimal::ZERO {
            return Err(SeTaxError::InvalidMinSeThreshold(self.min_se_threshold));
        }
        Ok(())
    }
}

/// Result of the SE tax calculation, with intermediate lines for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeTaxResult {
    /// Schedule C net profit as given (may be negative).
    pub net_profit: Decimal,

    /// Net profit × net earnings factor (line 4a). Unrounded.
    pub net_earnings: Decimal,

    /// Social security component (line 10). Unrounded.
    pub social_security_tax: Decimal,

    /// Medicare component (line 11). Unrounded.
    pub medicare_tax: Decimal,

    /// Total SE tax, rounded to whole dollars (line 12).
    pub self_employment_tax: Decimal,

    /// Deductible portion of SE tax (line 13).
    pub se_tax_deduction: Decimal,

    /// `true` when net profit was at or below the $400 threshold.
    pub below_threshold: bool,
}

impl SeTaxResult {
    /// Creates a zero-valued result for profit at or below the threshold.
    fn below_threshold(net_profit: Decimal) -> Self {
        Self {
            net_profit,
            net_earnings: Decimal::ZERO,
            social_security_tax: Decimal::ZERO,
            medicare_tax: Decimal::ZERO,
            self_employment_tax: Decimal::ZERO,
            se_tax_deduction: Decimal::ZERO,
            below_threshold: true,
        }
    }

    /// Zero result for a return with no business at all.
    pub fn none() -> Self {
        Self::below_threshold(Decimal::ZERO)
    }
}

/// Calculator for self-employment tax.
#[derive(Debug, Clone)]
pub struct SeTaxCalculator {
    config: SeTaxConfig,
}

impl SeTaxCalculator {
    pub fn new(config: SeTaxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SeTaxConfig {
        &self.config
    }

    /// Calculates SE tax on a Schedule C net profit.
    ///
    /// Social security and Medicare components are kept unrounded; only their
    /// sum is rounded, so the Medicare-only portion above the wage base taxes
    /// each extra dollar at exactly the Medicare rate.
    ///
    /// # Errors
    ///
    /// Returns [`SeTaxError`] if the configuration is invalid.
    ///
    /// # Example: Below Threshold
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::TaxYearTables;
    /// use tax_core::calculations::{SeTaxCalculator, SeTaxConfig};
    ///
    /// let tables = TaxYearTables::for_year(2025).unwrap();
    /// let calculator = SeTaxCalculator::new(SeTaxConfig::from_tables(&tables));
    ///
    /// let result = calculator.calculate(dec!(400)).unwrap();
    ///
    /// assert!(result.below_threshold);
    /// assert_eq!(result.self_employment_tax, dec!(0));
    /// ```
    pub fn calculate(
        &self,
        net_profit: Decimal,
    ) -> Result<SeTaxResult, SeTaxError> {
        self.config.validate()?;

        if net_profit <= self.config.min_se_threshold {
            if net_profit > Decimal::ZERO {
                warn!(
                    net_profit = %net_profit,
                    threshold = %self.config.min_se_threshold,
                    "SE income at or below minimum threshold; no SE tax due"
                );
            }
            return Ok(SeTaxResult::below_threshold(net_profit));
        }

        let net_earnings = self.net_earnings(net_profit);
        let social_security_tax = self.social_security_tax(net_earnings);
        let medicare_tax = self.medicare_tax(net_earnings);
        let self_employment_tax = round_dollars(social_security_tax + medicare_tax);
        let se_tax_deduction = self.se_tax_deduction(self_employment_tax);

        debug!(
            net_profit = %net_profit,
            net_earnings = %net_earnings,
            self_employment_tax = %self_employment_tax,
            "computed self-employment tax"
        );

        Ok(SeTaxResult {
            net_profit,
            net_earnings,
            social_security_tax,
            medicare_tax,
            self_employment_tax,
            se_tax_deduction,
            below_threshold: false,
        })
    }

    /// Line 4a: net profit × 92.35%.
    fn net_earnings(
        &self,
        net_profit: Decimal,
    ) -> Decimal {
        net_profit * self.config.net_earnings_factor
    }

    /// Line 10: social security tax on earnings up to the wage base.
    fn social_security_tax(
        &self,
        net_earnings: Decimal,
    ) -> Decimal {
        let taxable = net_earnings.min(self.config.ss_wage_max);
        if taxable < net_earnings {
            debug!(
                net_earnings = %net_earnings,
                ss_wage_max = %self.config.ss_wage_max,
                "net earnings exceed social security wage base"
            );
        }
        taxable * self.config.ss_tax_rate
    }

    /// Line 11: Medicare tax on all net earnings.
    fn medicare_tax(
        &self,
        net_earnings: Decimal,
    ) -> Decimal {
        net_earnings * self.config.medicare_tax_rate
    }

    /// Line 13: deductible half of SE tax.
    fn se_tax_deduction(
        &self,
        self_employment_tax: Decimal,
    ) -> Decimal {
        self_employment_tax * self.config.deduction_factor
    }
}
