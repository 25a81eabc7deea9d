//! The full-return computation.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::cache::CalculationCache;
use crate::calculations::common::non_negative;
use crate::calculations::{
    AdditionalMedicareCalculator, AdjustmentCalculator, AmtCalculator, BasisCalculator,
    CapitalGainsNetter, CreditEngine, DeductionResolver, IncomeAggregator, ProgressiveTaxCalculator,
    QbiCalculator, SeTaxCalculator, SeTaxConfig, SeTaxError, SeTaxResult,
};
use crate::{TablesError, TaxCalculation, TaxReturn, TaxYearTables};

/// Errors from constructing or running a [`TaxEngine`].
///
/// Business data never produces an error; these are all configuration
/// problems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("return is for tax year {return_year}, but the engine is configured for {engine_year}")]
    TaxYearMismatch { return_year: i32, engine_year: i32 },

    #[error("invalid tax tables: {0}")]
    Tables(#[from] TablesError),

    #[error("invalid self-employment tax configuration: {0}")]
    SeTax(#[from] SeTaxError),
}

/// Computes a [`TaxCalculation`] from a [`TaxReturn`] for one tax year.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{Filer, FilingStatus, TaxEngine, TaxReturn, WageRecord};
///
/// let engine = TaxEngine::for_year(2025).unwrap();
///
/// let mut tax_return = TaxReturn::new(2025, Filer {
///     filing_status: FilingStatus::Single,
///     age: 30,
///     ..Default::default()
/// });
/// tax_return.wages.push(WageRecord {
///     wages: dec!(85000),
///     federal_withholding: dec!(14000),
///     ..Default::default()
/// });
///
/// let result = engine.calculate(&tax_return).unwrap();
///
/// assert_eq!(result.taxable_income, dec!(70000));
/// assert_eq!(result.regular_tax, dec!(10314));
/// assert_eq!(result.refund_or_amount_owed, dec!(3686));
/// ```
#[derive(Debug, Clone)]
pub struct TaxEngine {
    tables: TaxYearTables,
    se_tax: SeTaxCalculator,
}

impl TaxEngine {
    /// Creates an engine over `tables`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Tables`] or [`EngineError::SeTax`] if the
    /// tables are inconsistent.
    pub fn new(tables: TaxYearTables) -> Result<Self, EngineError> {
        tables.validate()?;
        let se_config = SeTaxConfig::from_tables(&tables);
        se_config.validate()?;

        Ok(Self {
            tables,
            se_tax: SeTaxCalculator::new(se_config),
        })
    }

    /// Engine over the built-in tables for `tax_year`.
    pub fn for_year(tax_year: i32) -> Result<Self, EngineError> {
        Self::new(TaxYearTables::for_year(tax_year)?)
    }

    pub fn tables(&self) -> &TaxYearTables {
        &self.tables
    }

    pub fn tax_year(&self) -> i32 {
        self.tables.tax_year
    }

    /// Runs every calculator over `tax_return`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaxYearMismatch`] if the return is for a
    /// different year than the engine's tables.
    pub fn calculate(
        &self,
        tax_return: &TaxReturn,
    ) -> Result<TaxCalculation, EngineError> {
        if tax_return.tax_year != self.tables.tax_year {
            return Err(EngineError::TaxYearMismatch {
                return_year: tax_return.tax_year,
                engine_year: self.tables.tax_year,
            });
        }

        let tables = &self.tables;
        let status = tax_return.filing_status();

        let capital_gains =
            CapitalGainsNetter::new(tables.capital_loss_limit).net(&tax_return.capital_transactions);
        let basis = tax_return
            .retirement_basis
            .as_ref()
            .map(|record| BasisCalculator.calculate(record))
            .unwrap_or_default();
        let se_tax = match &tax_return.business {
            Some(business) => self.se_tax.calculate(business.net_profit())?,
            None => SeTaxResult::none(),
        };

        let income = IncomeAggregator.aggregate(
            tax_return,
            capital_gains.net_capital_gain,
            basis.taxable_amount(),
        );
        let adjustments = AdjustmentCalculator.calculate(&tax_return.adjustments, &se_tax);
        let agi = non_negative(income.total_income - adjustments.total);

        let deduction = DeductionResolver::new(&tables.deductions).resolve(
            &tax_return.filer,
            tax_return.itemized_deductions.as_ref(),
            agi,
        );
        let taxable_before_qbi = non_negative(agi - deduction.deduction);
        let qbi = QbiCalculator::new(tables.qbi_deduction_rate).calculate(
            tax_return.business_net_profit(),
            adjustments.self_employment_tax_deduction,
            taxable_before_qbi,
            capital_gains.net_capital_gain,
            tax_return.total_qualified_dividends(),
        );
        let taxable_income = non_negative(taxable_before_qbi - qbi.deduction);

        let progressive = ProgressiveTaxCalculator::new(tables.brackets_for(status));
        let regular_tax = progressive.calculate(taxable_income);
        let marginal_rate = progressive.marginal_rate(taxable_income);

        let salt_add_back = if deduction.is_itemized {
            deduction.salt_deduction
        } else {
            Decimal::ZERO
        };
        let amt = AmtCalculator::new(&tables.amt).calculate(status, agi, salt_add_back, regular_tax);

        let credits = CreditEngine::new(tables).calculate(tax_return, agi);
        let income_tax_after_credits =
            non_negative(regular_tax + amt.alternative_minimum_tax - credits.total);

        let additional_medicare = AdditionalMedicareCalculator::new(&tables.additional_medicare)
            .calculate(status, tax_return.total_medicare_wages(), se_tax.net_earnings);

        let total_tax =
            income_tax_after_credits + se_tax.self_employment_tax + additional_medicare.total;

        let federal_withholding = tax_return.federal_withholding();
        let estimated_payments = tax_return.estimated_tax_payments;
        let total_payments = federal_withholding + estimated_payments;
        let refund_or_amount_owed = total_payments - total_tax;

        debug!(
            tax_year = tables.tax_year,
            filing_status = status.as_str(),
            agi = %agi,
            taxable_income = %taxable_income,
            total_tax = %total_tax,
            refund_or_amount_owed = %refund_or_amount_owed,
            "calculated return"
        );

        Ok(TaxCalculation {
            tax_year: tables.tax_year,
            filing_status: status,
            wage_income: income.wages,
            interest_income: income.interest,
            dividend_income: income.ordinary_dividends,
            net_capital_gain: income.net_capital_gain,
            business_income: income.business_income,
            rental_income: income.rental_income,
            taxable_ira_amount: income.taxable_ira_amount,
            total_income: income.total_income,
            self_employment_tax_deduction: adjustments.self_employment_tax_deduction,
            adjustments: adjustments.total,
            adjusted_gross_income: agi,
            standard_deduction: deduction.standard_deduction,
            itemized_deduction: deduction.itemized_deduction,
            deduction: deduction.deduction,
            is_itemized: deduction.is_itemized,
            qbi_deduction: qbi.deduction,
            taxable_income,
            regular_tax,
            marginal_rate,
            alternative_minimum_taxable_income: amt.amti,
            alternative_minimum_tax: amt.alternative_minimum_tax,
            child_tax_credit: credits.child_tax_credit,
            education_credits: credits.education_credits(),
            savers_credit: credits.savers_credit,
            total_credits: credits.total,
            self_employment_tax: se_tax.self_employment_tax,
            additional_medicare_tax: additional_medicare.total,
            total_tax,
            federal_withholding,
            estimated_payments,
            total_payments,
            refund_or_amount_owed,
            remaining_retirement_basis: basis.remaining_basis,
        })
    }

    /// Like [`TaxEngine::calculate`], but serves repeated identical returns
    /// from `cache` while its entries are fresh.
    ///
    /// A cache must only ever be used with one engine.
    pub fn calculate_cached(
        &self,
        tax_return: &TaxReturn,
        cache: Option<&mut CalculationCache>,
    ) -> Result<TaxCalculation, EngineError> {
        match cache {
            Some(cache) => cache.get_or_compute(tax_return, |ret| self.calculate(ret)),
            None => self.calculate(tax_return),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        BusinessExpenses, BusinessRecord, Filer, FilingStatus, ItemizedDeductions, RetirementBasis,
        TaxBracket, WageRecord,
    };

    fn single_return(wages: Decimal) -> TaxReturn {
        let mut ret = TaxReturn::new(
            2025,
            Filer {
                filing_status: FilingStatus::Single,
                age: 30,
                ..Default::default()
            },
        );
        ret.wages.push(WageRecord {
            wages,
            ..Default::default()
        });
        ret
    }

    #[test]
    fn rejects_return_for_another_year() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let mut ret = single_return(dec!(50000));
        ret.tax_year = 2024;

        assert_eq!(
            engine.calculate(&ret),
            Err(EngineError::TaxYearMismatch {
                return_year: 2024,
                engine_year: 2025,
            })
        );
    }

    #[test]
    fn rejects_unsupported_year() {
        assert_eq!(
            TaxEngine::for_year(1999).unwrap_err(),
            EngineError::Tables(TablesError::UnsupportedYear(1999))
        );
    }

    #[test]
    fn rejects_invalid_tables() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.ss_wage_max = dec!(0);

        assert_eq!(
            TaxEngine::new(tables).unwrap_err(),
            EngineError::SeTax(SeTaxError::InvalidSsWageMax(dec!(0)))
        );

        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.brackets.single = vec![TaxBracket::new(dec!(0), Some(dec!(1000)), dec!(0.1))];
        assert!(matches!(
            TaxEngine::new(tables),
            Err(EngineError::Tables(TablesError::BoundedTopBracket(
                FilingStatus::Single
            )))
        ));
    }

    #[test]
    fn rejects_zero_child_credit_step_before_calculating() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.child_tax_credit.phaseout_step = dec!(0);

        assert_eq!(
            TaxEngine::new(tables).unwrap_err(),
            EngineError::Tables(TablesError::NonPositiveAmount {
                name: "child_tax_credit.phaseout_step",
                value: dec!(0),
            })
        );
    }

    #[test]
    fn empty_return_computes_zeros() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let ret = TaxReturn::new(2025, Filer::default());

        let result = engine.calculate(&ret).unwrap();

        assert_eq!(result.total_income, Decimal::ZERO);
        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.total_tax, Decimal::ZERO);
        assert_eq!(result.refund_or_amount_owed, Decimal::ZERO);
        assert_eq!(result.marginal_rate, dec!(0.10));
    }

    #[test]
    fn credits_cannot_push_income_tax_below_zero() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let mut ret = single_return(dec!(20000));
        ret.education_expenses.push(crate::EducationExpense {
            student: "self".to_string(),
            qualified_expenses: dec!(4000),
            is_first_four_years: true,
        });

        let result = engine.calculate(&ret).unwrap();

        // Taxable 5000, regular tax 500, AOTC 2500.
        assert_eq!(result.regular_tax, dec!(500));
        assert_eq!(result.total_credits, dec!(2500));
        assert_eq!(result.total_tax, Decimal::ZERO);
    }

    #[test]
    fn itemized_salt_is_added_back_for_amt() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let mut ret = single_return(dec!(100000));
        ret.itemized_deductions = Some(ItemizedDeductions {
            state_local_income_tax: dec!(10000),
            mortgage_interest: dec!(8000),
            ..Default::default()
        });

        let result = engine.calculate(&ret).unwrap();

        assert!(result.is_itemized);
        assert_eq!(result.deduction, dec!(18000));
        assert_eq!(result.adjusted_gross_income, dec!(100000));
        assert_eq!(result.alternative_minimum_taxable_income, dec!(110000));
        // (110000 - 88100) x 0.26 = 5694, well under regular tax.
        assert_eq!(result.alternative_minimum_tax, Decimal::ZERO);
    }

    #[test]
    fn standard_deduction_has_no_amt_add_back() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let mut ret = single_return(dec!(100000));
        // Itemized total 14000 loses to the 15000 standard deduction.
        ret.itemized_deductions = Some(ItemizedDeductions {
            state_local_income_tax: dec!(10000),
            mortgage_interest: dec!(4000),
            ..Default::default()
        });

        let result = engine.calculate(&ret).unwrap();

        assert!(!result.is_itemized);
        assert_eq!(result.alternative_minimum_taxable_income, dec!(100000));
    }

    #[test]
    fn business_loss_does_not_create_se_tax_or_qbi() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let mut ret = single_return(dec!(60000));
        ret.business = Some(BusinessRecord {
            gross_receipts: dec!(1000),
            expenses: BusinessExpenses {
                supplies: dec!(4000),
                ..Default::default()
            },
            ..Default::default()
        });

        let result = engine.calculate(&ret).unwrap();

        assert_eq!(result.business_income, Decimal::ZERO);
        assert_eq!(result.self_employment_tax, Decimal::ZERO);
        assert_eq!(result.self_employment_tax_deduction, Decimal::ZERO);
        assert_eq!(result.qbi_deduction, Decimal::ZERO);
        assert_eq!(result.total_income, dec!(60000));
    }

    #[test]
    fn taxable_conversion_flows_into_income() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let mut ret = single_return(dec!(80000));
        ret.retirement_basis = Some(RetirementBasis {
            nondeductible_contributions: dec!(7000),
            conversion_amount: dec!(7000),
            year_end_balance: dec!(93000),
            ..Default::default()
        });

        let result = engine.calculate(&ret).unwrap();

        assert_eq!(result.taxable_ira_amount, dec!(6510));
        assert_eq!(result.total_income, dec!(86510));
        assert_eq!(result.remaining_retirement_basis, dec!(6510));
    }

    #[test]
    fn high_wages_owe_additional_medicare_tax() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let ret = single_return(dec!(300000));

        let result = engine.calculate(&ret).unwrap();

        assert_eq!(result.additional_medicare_tax, dec!(900));
        assert_eq!(
            result.total_tax,
            result.regular_tax + result.alternative_minimum_tax + dec!(900)
        );
    }

    #[test]
    fn calculate_cached_without_cache_matches_calculate() {
        let engine = TaxEngine::for_year(2025).unwrap();
        let ret = single_return(dec!(85000));

        assert_eq!(
            engine.calculate_cached(&ret, None),
            engine.calculate(&ret)
        );
    }
}
