use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ByFilingStatus, FilingStatus, TaxBracket};

/// Errors raised when year-scoped rate tables are missing or malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TablesError {
    #[error("no built-in rate tables for tax year {0}")]
    UnsupportedYear(i32),

    #[error("no tax brackets for filing status {0:?}")]
    NoBrackets(FilingStatus),

    #[error("{status:?} bracket starting at {min_income} does not begin where the previous bracket ends")]
    NonContiguousBrackets {
        status: FilingStatus,
        min_income: Decimal,
    },

    #[error("{status:?} bracket starting at {min_income} has no upper bound but is not the top bracket")]
    UnboundedInnerBracket {
        status: FilingStatus,
        min_income: Decimal,
    },

    #[error("{0:?} top bracket must have no upper bound")]
    BoundedTopBracket(FilingStatus),

    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },

    #[error("{name} must be positive, got {value}")]
    NonPositiveAmount { name: &'static str, value: Decimal },

    #[error("{name} phase-out starts at {start} but ends at {end}")]
    InvertedPhaseOut {
        name: &'static str,
        start: Decimal,
        end: Decimal,
    },
}

/// Standard and itemized deduction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeductionTable {
    pub standard: ByFilingStatus<Decimal>,
    /// Per-condition add-on (65 or older, blind) for married statuses.
    pub additional_married: Decimal,
    /// Per-condition add-on for Single and Head of Household.
    pub additional_unmarried: Decimal,
    /// Age at which the age add-on applies.
    pub additional_age: u32,
    /// Share of AGI that medical expenses must exceed.
    pub medical_agi_floor: Decimal,
    pub salt_cap: Decimal,
}

/// Form 6251 parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmtTable {
    pub exemption: ByFilingStatus<Decimal>,
    pub phaseout_threshold: ByFilingStatus<Decimal>,
    /// Exemption reduction per dollar of AMTI over the threshold.
    pub phaseout_rate: Decimal,
    pub low_rate: Decimal,
    pub high_rate: Decimal,
    /// AMT taxable income taxed at `low_rate` before `high_rate` applies.
    pub rate_threshold: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildTaxCreditTable {
    pub amount_per_child: Decimal,
    pub phaseout_threshold: ByFilingStatus<Decimal>,
    /// Reduction applied for each (partial) step of AGI over the threshold.
    pub reduction_per_step: Decimal,
    pub phaseout_step: Decimal,
}

/// A linear phase-out between two AGI levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseOutRange {
    pub start: Decimal,
    pub end: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EducationCreditTable {
    /// Expenses credited at 100% for the American opportunity credit.
    pub aotc_full_rate_expenses: Decimal,
    /// Further expenses credited at `aotc_partial_rate`.
    pub aotc_partial_rate_expenses: Decimal,
    pub aotc_partial_rate: Decimal,
    pub aotc_max_per_student: Decimal,
    pub llc_rate: Decimal,
    pub llc_expense_limit: Decimal,
    pub llc_max_per_return: Decimal,
    pub phaseout_joint: PhaseOutRange,
    pub phaseout_other: PhaseOutRange,
}

/// One AGI tier of the saver's credit rate chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaversCreditTier {
    /// Highest AGI (inclusive) that earns `rate`.
    pub max_agi: Decimal,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaversCreditTable {
    pub contribution_cap: ByFilingStatus<Decimal>,
    /// Tiers in ascending `max_agi` order. AGI above the last tier earns 0%.
    pub tiers: ByFilingStatus<Vec<SaversCreditTier>>,
    pub minimum_age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdditionalMedicareTable {
    pub rate: Decimal,
    pub threshold: ByFilingStatus<Decimal>,
}

/// Every rate, threshold and bracket the engine needs for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxYearTables {
    pub tax_year: i32,
    pub brackets: ByFilingStatus<Vec<TaxBracket>>,
    pub deductions: DeductionTable,
    pub capital_loss_limit: Decimal,

    // Schedule SE
    pub ss_wage_max: Decimal,
    pub ss_tax_rate: Decimal,
    pub medicare_tax_rate: Decimal,
    pub se_tax_deductible_percentage: Decimal,
    pub se_deduction_factor: Decimal,
    pub min_se_threshold: Decimal,

    pub amt: AmtTable,
    pub child_tax_credit: ChildTaxCreditTable,
    pub education_credits: EducationCreditTable,
    pub savers_credit: SaversCreditTable,
    pub qbi_deduction_rate: Decimal,
    pub additional_medicare: AdditionalMedicareTable,
}

fn rate_in_unit_interval(
    name: &'static str,
    value: Decimal,
) -> Result<(), TablesError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TablesError::InvalidRate { name, value });
    }
    Ok(())
}

fn non_negative_amount(
    name: &'static str,
    value: Decimal,
) -> Result<(), TablesError> {
    if value < Decimal::ZERO {
        return Err(TablesError::NegativeAmount { name, value });
    }
    Ok(())
}

fn ordered_range(
    name: &'static str,
    range: &PhaseOutRange,
) -> Result<(), TablesError> {
    if range.start > range.end {
        return Err(TablesError::InvertedPhaseOut {
            name,
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

impl TaxYearTables {
    /// Built-in tables for `tax_year`.
    ///
    /// # Errors
    ///
    /// Returns [`TablesError::UnsupportedYear`] for years without data.
    pub fn for_year(tax_year: i32) -> Result<Self, TablesError> {
        match tax_year {
            2024 => Ok(crate::tables::tax_year_2024()),
            2025 => Ok(crate::tables::tax_year_2025()),
            other => Err(TablesError::UnsupportedYear(other)),
        }
    }

    /// Years with built-in tables.
    pub fn supported_years() -> &'static [i32] {
        &[2024, 2025]
    }

    /// Brackets for `status`, lowest first.
    pub fn brackets_for(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.brackets.get(status)
    }

    /// Checks bracket schedules, rates and credit parameters.
    ///
    /// Each schedule must start at zero, be contiguous, and end with a single
    /// unbounded bracket. The child tax credit step must be positive since
    /// the credit divides by it. Schedule SE parameters are validated
    /// separately by the self-employment calculator's config.
    pub fn validate(&self) -> Result<(), TablesError> {
        for status in FilingStatus::ALL {
            self.validate_brackets(status)?;
        }

        rate_in_unit_interval("deductions.medical_agi_floor", self.deductions.medical_agi_floor)?;
        rate_in_unit_interval("amt.phaseout_rate", self.amt.phaseout_rate)?;
        rate_in_unit_interval("amt.low_rate", self.amt.low_rate)?;
        rate_in_unit_interval("amt.high_rate", self.amt.high_rate)?;
        rate_in_unit_interval(
            "education_credits.aotc_partial_rate",
            self.education_credits.aotc_partial_rate,
        )?;
        rate_in_unit_interval("education_credits.llc_rate", self.education_credits.llc_rate)?;
        rate_in_unit_interval("qbi_deduction_rate", self.qbi_deduction_rate)?;
        rate_in_unit_interval("additional_medicare.rate", self.additional_medicare.rate)?;
        for status in FilingStatus::ALL {
            for tier in self.savers_credit.tiers.get(status) {
                rate_in_unit_interval("savers_credit.tiers.rate", tier.rate)?;
            }
        }

        let ctc = &self.child_tax_credit;
        if ctc.phaseout_step <= Decimal::ZERO {
            return Err(TablesError::NonPositiveAmount {
                name: "child_tax_credit.phaseout_step",
                value: ctc.phaseout_step,
            });
        }
        non_negative_amount("child_tax_credit.amount_per_child", ctc.amount_per_child)?;
        non_negative_amount("child_tax_credit.reduction_per_step", ctc.reduction_per_step)?;

        ordered_range(
            "education_credits.phaseout_joint",
            &self.education_credits.phaseout_joint,
        )?;
        ordered_range(
            "education_credits.phaseout_other",
            &self.education_credits.phaseout_other,
        )?;

        Ok(())
    }

    fn validate_brackets(
        &self,
        status: FilingStatus,
    ) -> Result<(), TablesError> {
        let brackets = self.brackets.get(status);
        let Some(last) = brackets.last() else {
            return Err(TablesError::NoBrackets(status));
        };

        let mut expected_min = Decimal::ZERO;
        for (i, bracket) in brackets.iter().enumerate() {
            rate_in_unit_interval("brackets.tax_rate", bracket.tax_rate)?;
            if bracket.min_income != expected_min {
                return Err(TablesError::NonContiguousBrackets {
                    status,
                    min_income: bracket.min_income,
                });
            }
            match bracket.max_income {
                Some(max) if max > bracket.min_income => expected_min = max,
                Some(_) => {
                    return Err(TablesError::NonContiguousBrackets {
                        status,
                        min_income: bracket.min_income,
                    });
                }
                None if i + 1 < brackets.len() => {
                    return Err(TablesError::UnboundedInnerBracket {
                        status,
                        min_income: bracket.min_income,
                    });
                }
                None => {}
            }
        }

        if last.max_income.is_some() {
            return Err(TablesError::BoundedTopBracket(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn for_year_returns_builtin_tables() {
        for year in TaxYearTables::supported_years() {
            let tables = TaxYearTables::for_year(*year).unwrap();
            assert_eq!(tables.tax_year, *year);
            assert_eq!(tables.validate(), Ok(()));
        }
    }

    #[test]
    fn for_year_rejects_unknown_year() {
        assert_eq!(
            TaxYearTables::for_year(1999),
            Err(TablesError::UnsupportedYear(1999))
        );
    }

    #[test]
    fn validate_rejects_empty_schedule() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.brackets.head_of_household.clear();

        assert_eq!(
            tables.validate(),
            Err(TablesError::NoBrackets(FilingStatus::HeadOfHousehold))
        );
    }

    #[test]
    fn validate_rejects_gap_between_brackets() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.brackets.single[1].min_income = dec!(12000);

        assert_eq!(
            tables.validate(),
            Err(TablesError::NonContiguousBrackets {
                status: FilingStatus::Single,
                min_income: dec!(12000),
            })
        );
    }

    #[test]
    fn validate_rejects_bounded_top_bracket() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.brackets.married_filing_jointly.last_mut().unwrap().max_income = Some(dec!(1000000));

        assert_eq!(
            tables.validate(),
            Err(TablesError::BoundedTopBracket(
                FilingStatus::MarriedFilingJointly
            ))
        );
    }

    #[test]
    fn validate_rejects_unbounded_inner_bracket() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.brackets.single[2].max_income = None;

        assert_eq!(
            tables.validate(),
            Err(TablesError::UnboundedInnerBracket {
                status: FilingStatus::Single,
                min_income: dec!(48475),
            })
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.amt.high_rate = dec!(2.8);

        assert_eq!(
            tables.validate(),
            Err(TablesError::InvalidRate {
                name: "amt.high_rate",
                value: dec!(2.8),
            })
        );
    }

    #[test]
    fn validate_rejects_zero_ctc_step() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.child_tax_credit.phaseout_step = dec!(0);

        assert_eq!(
            tables.validate(),
            Err(TablesError::NonPositiveAmount {
                name: "child_tax_credit.phaseout_step",
                value: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_ctc_reduction() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.child_tax_credit.reduction_per_step = dec!(-50);

        assert_eq!(
            tables.validate(),
            Err(TablesError::NegativeAmount {
                name: "child_tax_credit.reduction_per_step",
                value: dec!(-50),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_ctc_amount() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.child_tax_credit.amount_per_child = dec!(-2000);

        assert_eq!(
            tables.validate(),
            Err(TablesError::NegativeAmount {
                name: "child_tax_credit.amount_per_child",
                value: dec!(-2000),
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_education_phaseout() {
        let mut tables = TaxYearTables::for_year(2025).unwrap();
        tables.education_credits.phaseout_other = PhaseOutRange {
            start: dec!(90000),
            end: dec!(80000),
        };

        assert_eq!(
            tables.validate(),
            Err(TablesError::InvertedPhaseOut {
                name: "education_credits.phaseout_other",
                start: dec!(90000),
                end: dec!(80000),
            })
        );
    }
}
