//! Standard versus itemized deduction.
//!
//! # Standard deduction
//!
//! Base amount for the filing status plus one add-on per condition (65 or
//! older at year end, blind) for the filer and, when present, the spouse.
//! The add-on is larger for Single and Head of Household.
//!
//! # Itemized deductions (Schedule A)
//!
//! | Line | Description |
//! |------|-------------|
//! | 4    | Medical expenses above 7.5% of AGI |
//! | 5e   | State and local taxes, capped |
//! | 8-9  | Mortgage and investment interest |
//! | 11-12| Charitable gifts, cash and non-cash |
//! | 15   | Casualty losses |
//! | 16   | Other itemized deductions |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{non_negative, round_dollars};
use crate::{DeductionTable, Filer, ItemizedDeductions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    pub standard_deduction: Decimal,
    /// Zero when the return has no Schedule A.
    pub itemized_deduction: Decimal,
    /// Medical expenses in excess of the AGI floor.
    pub medical_deduction: Decimal,
    /// SALT after the cap. Added back for AMT when itemizing.
    pub salt_deduction: Decimal,
    /// The larger of the two.
    pub deduction: Decimal,
    pub is_itemized: bool,
}

/// Picks the better of the standard and itemized deductions.
#[derive(Debug, Clone)]
pub struct DeductionResolver<'a> {
    table: &'a DeductionTable,
}

impl<'a> DeductionResolver<'a> {
    pub fn new(table: &'a DeductionTable) -> Self {
        Self { table }
    }

    /// Resolves the deduction for a filer.
    ///
    /// Itemizing wins only when strictly larger; a tie keeps the standard
    /// deduction.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{Filer, FilingStatus, TaxYearTables};
    /// use tax_core::calculations::DeductionResolver;
    ///
    /// let tables = TaxYearTables::for_year(2025).unwrap();
    /// let filer = Filer { filing_status: FilingStatus::Single, age: 67, ..Default::default() };
    ///
    /// let result = DeductionResolver::new(&tables.deductions).resolve(&filer, None, dec!(50000));
    ///
    /// assert_eq!(result.deduction, dec!(17000));
    /// assert!(!result.is_itemized);
    /// ```
    pub fn resolve(
        &self,
        filer: &Filer,
        itemized: Option<&ItemizedDeductions>,
        agi: Decimal,
    ) -> DeductionResult {
        let standard_deduction = self.standard_deduction(filer);

        let Some(itemized) = itemized else {
            return DeductionResult {
                standard_deduction,
                deduction: standard_deduction,
                ..Default::default()
            };
        };

        let medical_deduction = self.medical_deduction(itemized.medical_expenses, agi);
        let salt_deduction = itemized.salt_total().min(self.table.salt_cap);
        let itemized_deduction = round_dollars(
            medical_deduction
                + salt_deduction
                + itemized.mortgage_interest
                + itemized.investment_interest
                + itemized.charitable_cash
                + itemized.charitable_noncash
                + itemized.casualty_losses
                + itemized.other,
        );

        let is_itemized = itemized_deduction > standard_deduction;
        let deduction = if is_itemized {
            itemized_deduction
        } else {
            standard_deduction
        };

        debug!(
            standard = %standard_deduction,
            itemized = %itemized_deduction,
            is_itemized,
            "resolved deduction"
        );

        DeductionResult {
            standard_deduction,
            itemized_deduction,
            medical_deduction,
            salt_deduction,
            deduction,
            is_itemized,
        }
    }

    /// Base amount plus age and blindness add-ons.
    pub fn standard_deduction(
        &self,
        filer: &Filer,
    ) -> Decimal {
        let status = filer.filing_status;
        let add_on = if status.uses_married_additional_deduction() {
            self.table.additional_married
        } else {
            self.table.additional_unmarried
        };

        let mut conditions = 0u32;
        conditions += u32::from(filer.age >= self.table.additional_age);
        conditions += u32::from(filer.is_blind);
        if let Some(spouse) = &filer.spouse {
            conditions += u32::from(spouse.age >= self.table.additional_age);
            conditions += u32::from(spouse.is_blind);
        }

        *self.table.standard.get(status) + add_on * Decimal::from(conditions)
    }

    /// Line 4: expenses above the AGI floor.
    fn medical_deduction(
        &self,
        medical_expenses: Decimal,
        agi: Decimal,
    ) -> Decimal {
        non_negative(medical_expenses - agi * self.table.medical_agi_floor)
    }
}
