//! Nonrefundable credits: child tax credit, education credits (Form 8863)
//! and the retirement savings contributions credit (Form 8880).
//!
//! Every credit here is computed independently from AGI; the engine limits
//! the combined total to the tax it can offset.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{non_negative, round_dollars};
use crate::{EducationExpense, FilingStatus, PhaseOutRange, TaxReturn, TaxYearTables};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSummary {
    pub child_tax_credit: Decimal,
    /// American opportunity credit after the phase-out.
    pub american_opportunity_credit: Decimal,
    /// Lifetime learning credit after the phase-out.
    pub lifetime_learning_credit: Decimal,
    pub savers_credit: Decimal,
    pub total: Decimal,
}

impl CreditSummary {
    pub fn education_credits(&self) -> Decimal {
        self.american_opportunity_credit + self.lifetime_learning_credit
    }
}

/// Share of a credit that survives a linear phase-out.
///
/// One at or below `range.start`, zero at or above `range.end`, linear in
/// between.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::PhaseOutRange;
/// use tax_core::calculations::phase_out_factor;
///
/// let range = PhaseOutRange { start: dec!(80000), end: dec!(90000) };
///
/// assert_eq!(phase_out_factor(&range, dec!(80000)), dec!(1));
/// assert_eq!(phase_out_factor(&range, dec!(85000)), dec!(0.5));
/// assert_eq!(phase_out_factor(&range, dec!(90000)), dec!(0));
/// ```
pub fn phase_out_factor(
    range: &PhaseOutRange,
    agi: Decimal,
) -> Decimal {
    if agi <= range.start {
        Decimal::ONE
    } else if agi >= range.end {
        Decimal::ZERO
    } else {
        (range.end - agi) / (range.end - range.start)
    }
}

#[derive(Debug, Clone)]
pub struct CreditEngine<'a> {
    tables: &'a TaxYearTables,
}

impl<'a> CreditEngine<'a> {
    pub fn new(tables: &'a TaxYearTables) -> Self {
        Self { tables }
    }

    pub fn calculate(
        &self,
        tax_return: &TaxReturn,
        agi: Decimal,
    ) -> CreditSummary {
        let status = tax_return.filing_status();

        let child_tax_credit =
            self.child_tax_credit(status, tax_return.qualifying_child_count(), agi);
        let (american_opportunity_credit, lifetime_learning_credit) =
            self.education_credits(status, &tax_return.education_expenses, agi);
        let savers_credit = self.savers_credit(tax_return, agi);

        let total =
            child_tax_credit + american_opportunity_credit + lifetime_learning_credit + savers_credit;
        debug!(
            child_tax_credit = %child_tax_credit,
            aotc = %american_opportunity_credit,
            llc = %lifetime_learning_credit,
            savers_credit = %savers_credit,
            total = %total,
            "computed credits"
        );

        CreditSummary {
            child_tax_credit,
            american_opportunity_credit,
            lifetime_learning_credit,
            savers_credit,
            total,
        }
    }

    /// Per-child amount, reduced by a fixed amount for each step (or part
    /// of a step) of AGI over the threshold.
    pub fn child_tax_credit(
        &self,
        status: FilingStatus,
        qualifying_children: usize,
        agi: Decimal,
    ) -> Decimal {
        let table = &self.tables.child_tax_credit;
        let credit = table.amount_per_child * Decimal::from(qualifying_children);
        if credit.is_zero() {
            return Decimal::ZERO;
        }

        let excess = non_negative(agi - *table.phaseout_threshold.get(status));
        let steps = (excess / table.phaseout_step).ceil();
        non_negative(credit - steps * table.reduction_per_step)
    }

    /// Returns `(american_opportunity, lifetime_learning)`, both phased out.
    ///
    /// Each first-four-years record earns its own AOTC; all other records
    /// pool into a single per-return LLC.
    pub fn education_credits(
        &self,
        status: FilingStatus,
        expenses: &[EducationExpense],
        agi: Decimal,
    ) -> (Decimal, Decimal) {
        let table = &self.tables.education_credits;

        let aotc: Decimal = expenses
            .iter()
            .filter(|e| e.is_first_four_years)
            .map(|e| self.aotc_per_student(e.qualified_expenses))
            .sum();

        let llc_expenses: Decimal = expenses
            .iter()
            .filter(|e| !e.is_first_four_years)
            .map(|e| e.qualified_expenses)
            .sum();
        let llc = (llc_expenses.min(table.llc_expense_limit) * table.llc_rate)
            .min(table.llc_max_per_return);

        let range = if status == FilingStatus::MarriedFilingJointly {
            &table.phaseout_joint
        } else {
            &table.phaseout_other
        };
        let factor = phase_out_factor(range, agi);

        (round_dollars(aotc * factor), round_dollars(llc * factor))
    }

    /// 100% of the first tier of expenses plus 25% of the next, capped.
    fn aotc_per_student(
        &self,
        qualified_expenses: Decimal,
    ) -> Decimal {
        let table = &self.tables.education_credits;
        let full = qualified_expenses.min(table.aotc_full_rate_expenses);
        let partial = non_negative(qualified_expenses - table.aotc_full_rate_expenses)
            .min(table.aotc_partial_rate_expenses);
        (full + partial * table.aotc_partial_rate).min(table.aotc_max_per_student)
    }

    /// IRA contributions (traditional and Roth) up to the cap, times the
    /// rate for the filer's AGI tier.
    pub fn savers_credit(
        &self,
        tax_return: &TaxReturn,
        agi: Decimal,
    ) -> Decimal {
        let table = &self.tables.savers_credit;
        if tax_return.filer.age < table.minimum_age {
            return Decimal::ZERO;
        }
        let Some(ira) = &tax_return.adjustments.ira else {
            return Decimal::ZERO;
        };

        let status = tax_return.filing_status();
        let contributions = (ira.traditional + ira.roth).min(*table.contribution_cap.get(status));
        let rate = table
            .tiers
            .get(status)
            .iter()
            .find(|tier| agi <= tier.max_agi)
            .map_or(Decimal::ZERO, |tier| tier.rate);

        round_dollars(contributions * rate)
    }
}
