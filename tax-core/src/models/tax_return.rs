//! The tax-return input record.
//!
//! The surrounding UI builds a [`TaxReturn`] incrementally and hands the
//! whole record to the engine after every meaningful edit. Every group except
//! the filer identity is optional or defaults to empty, so a partially filled
//! return still computes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FilingStatus;

/// Holding period (in days) beyond which a sale is long-term.
pub const LONG_TERM_HOLDING_DAYS: i64 = 365;

/// Errors reported by [`TaxReturn::validate`].
///
/// The engine itself never raises these; they exist for the input boundary
/// (the CLI, or any front end) to reject malformed records before computing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("capital_transactions[{index}] sold on {sold} before it was acquired on {acquired}")]
    SaleBeforeAcquisition {
        index: usize,
        acquired: NaiveDate,
        sold: NaiveDate,
    },

    #[error("dependents[{index}] lived with filer {months} months; must be 0-12")]
    MonthsOutOfRange { index: usize, months: u8 },
}

fn non_negative(
    field: impl Into<String>,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount {
            field: field.into(),
            value,
        });
    }
    Ok(())
}

fn line_items_non_negative(
    prefix: &str,
    items: &[(&'static str, Decimal)],
) -> Result<(), ValidationError> {
    for (name, value) in items {
        non_negative(format!("{prefix}.{name}"), *value)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spouse {
    pub age: u32,
    #[serde(default)]
    pub is_blind: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filer {
    pub filing_status: FilingStatus,
    pub age: u32,
    #[serde(default)]
    pub is_blind: bool,
    #[serde(default)]
    pub spouse: Option<Spouse>,
}

/// A Form W-2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WageRecord {
    #[serde(default)]
    pub employer: String,
    pub wages: Decimal,
    #[serde(default)]
    pub federal_withholding: Decimal,
    /// Box 5. Falls back to `wages` when not reported.
    #[serde(default)]
    pub medicare_wages: Option<Decimal>,
}

impl WageRecord {
    pub fn medicare_wages(&self) -> Decimal {
        self.medicare_wages.unwrap_or(self.wages)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterestRecord {
    #[serde(default)]
    pub payer: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DividendRecord {
    #[serde(default)]
    pub payer: String,
    pub ordinary: Decimal,
    /// Subset of `ordinary`.
    #[serde(default)]
    pub qualified: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapitalTransaction {
    #[serde(default)]
    pub description: String,
    pub acquired: NaiveDate,
    pub sold: NaiveDate,
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    /// Authoritative for netting. Front ends derive it with
    /// [`CapitalTransaction::is_long_term_by_dates`].
    pub is_long_term: bool,
}

impl CapitalTransaction {
    pub fn gain_or_loss(&self) -> Decimal {
        self.proceeds - self.cost_basis
    }

    pub fn holding_period_days(&self) -> i64 {
        (self.sold - self.acquired).num_days()
    }

    pub fn is_long_term_by_dates(&self) -> bool {
        self.holding_period_days() > LONG_TERM_HOLDING_DAYS
    }
}

/// Schedule C Part II expense lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessExpenses {
    pub advertising: Decimal,
    pub car_and_truck: Decimal,
    pub commissions_and_fees: Decimal,
    pub contract_labor: Decimal,
    pub depreciation: Decimal,
    pub insurance: Decimal,
    pub interest: Decimal,
    pub legal_and_professional: Decimal,
    pub office: Decimal,
    pub rent_or_lease: Decimal,
    pub repairs_and_maintenance: Decimal,
    pub supplies: Decimal,
    pub taxes_and_licenses: Decimal,
    pub travel: Decimal,
    pub meals: Decimal,
    pub utilities: Decimal,
    pub wages: Decimal,
    pub other: Decimal,
}

impl BusinessExpenses {
    pub fn line_items(&self) -> [(&'static str, Decimal); 18] {
        [
            ("advertising", self.advertising),
            ("car_and_truck", self.car_and_truck),
            ("commissions_and_fees", self.commissions_and_fees),
            ("contract_labor", self.contract_labor),
            ("depreciation", self.depreciation),
            ("insurance", self.insurance),
            ("interest", self.interest),
            ("legal_and_professional", self.legal_and_professional),
            ("office", self.office),
            ("rent_or_lease", self.rent_or_lease),
            ("repairs_and_maintenance", self.repairs_and_maintenance),
            ("supplies", self.supplies),
            ("taxes_and_licenses", self.taxes_and_licenses),
            ("travel", self.travel),
            ("meals", self.meals),
            ("utilities", self.utilities),
            ("wages", self.wages),
            ("other", self.other),
        ]
    }

    pub fn total(&self) -> Decimal {
        self.line_items().iter().map(|(_, amount)| *amount).sum()
    }
}

/// A sole-proprietor business (Schedule C).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(default)]
    pub name: String,
    pub gross_receipts: Decimal,
    #[serde(default)]
    pub returns_and_allowances: Decimal,
    #[serde(default)]
    pub cost_of_goods_sold: Decimal,
    #[serde(default)]
    pub other_income: Decimal,
    #[serde(default)]
    pub expenses: BusinessExpenses,
}

impl BusinessRecord {
    /// Schedule C line 31. Negative for a loss.
    pub fn net_profit(&self) -> Decimal {
        self.gross_receipts - self.returns_and_allowances - self.cost_of_goods_sold
            + self.other_income
            - self.expenses.total()
    }
}

/// Schedule E Part I expense lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalExpenses {
    pub advertising: Decimal,
    pub auto_and_travel: Decimal,
    pub cleaning_and_maintenance: Decimal,
    pub commissions: Decimal,
    pub insurance: Decimal,
    pub legal_and_professional: Decimal,
    pub management_fees: Decimal,
    pub mortgage_interest: Decimal,
    pub other_interest: Decimal,
    pub repairs: Decimal,
    pub supplies: Decimal,
    pub taxes: Decimal,
    pub utilities: Decimal,
    pub depreciation: Decimal,
    pub other: Decimal,
}

impl RentalExpenses {
    pub fn line_items(&self) -> [(&'static str, Decimal); 15] {
        [
            ("advertising", self.advertising),
            ("auto_and_travel", self.auto_and_travel),
            ("cleaning_and_maintenance", self.cleaning_and_maintenance),
            ("commissions", self.commissions),
            ("insurance", self.insurance),
            ("legal_and_professional", self.legal_and_professional),
            ("management_fees", self.management_fees),
            ("mortgage_interest", self.mortgage_interest),
            ("other_interest", self.other_interest),
            ("repairs", self.repairs),
            ("supplies", self.supplies),
            ("taxes", self.taxes),
            ("utilities", self.utilities),
            ("depreciation", self.depreciation),
            ("other", self.other),
        ]
    }

    pub fn total(&self) -> Decimal {
        self.line_items().iter().map(|(_, amount)| *amount).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RentalProperty {
    #[serde(default)]
    pub address: String,
    pub rents_received: Decimal,
    #[serde(default)]
    pub expenses: RentalExpenses,
}

impl RentalProperty {
    /// Negative for a loss.
    pub fn net_income(&self) -> Decimal {
        self.rents_received - self.expenses.total()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsaContribution {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IraContribution {
    #[serde(default)]
    pub traditional: Decimal,
    #[serde(default)]
    pub roth: Decimal,
    /// Whether the traditional contribution is deductible this year.
    #[serde(default)]
    pub is_deductible: bool,
}

/// Above-the-line deduction inputs.
///
/// Statutory limits (educator expense cap, student loan interest cap, HSA
/// limits) are enforced by the input layer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub student_loan_interest: Decimal,
    pub educator_expenses: Decimal,
    pub hsa: Option<HsaContribution>,
    pub ira: Option<IraContribution>,
}

/// Schedule A inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemizedDeductions {
    pub medical_expenses: Decimal,
    pub state_local_income_tax: Decimal,
    pub real_estate_tax: Decimal,
    pub personal_property_tax: Decimal,
    pub mortgage_interest: Decimal,
    pub investment_interest: Decimal,
    pub charitable_cash: Decimal,
    pub charitable_noncash: Decimal,
    pub casualty_losses: Decimal,
    pub other: Decimal,
}

impl ItemizedDeductions {
    /// State and local taxes before the cap.
    pub fn salt_total(&self) -> Decimal {
        self.state_local_income_tax + self.real_estate_tax + self.personal_property_tax
    }

    fn line_items(&self) -> [(&'static str, Decimal); 10] {
        [
            ("medical_expenses", self.medical_expenses),
            ("state_local_income_tax", self.state_local_income_tax),
            ("real_estate_tax", self.real_estate_tax),
            ("personal_property_tax", self.personal_property_tax),
            ("mortgage_interest", self.mortgage_interest),
            ("investment_interest", self.investment_interest),
            ("charitable_cash", self.charitable_cash),
            ("charitable_noncash", self.charitable_noncash),
            ("casualty_losses", self.casualty_losses),
            ("other", self.other),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependent {
    #[serde(default)]
    pub name: String,
    pub age: u32,
    pub months_lived_with_filer: u8,
    /// Stored eligibility flag; the engine counts this and nothing else.
    #[serde(default)]
    pub qualifies_for_child_tax_credit: bool,
}

impl Dependent {
    /// Age and residency tests for a qualifying child: under 17 at year end
    /// and living with the filer for more than half the year.
    pub fn meets_child_tax_credit_tests(&self) -> bool {
        self.age < 17 && self.months_lived_with_filer > 6
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EducationExpense {
    #[serde(default)]
    pub student: String,
    pub qualified_expenses: Decimal,
    /// Student is in the first four years of post-secondary education.
    #[serde(default)]
    pub is_first_four_years: bool,
}

/// Form 8606 Part I/II inputs for traditional IRA basis tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementBasis {
    pub nondeductible_contributions: Decimal,
    pub prior_year_basis: Decimal,
    pub conversion_amount: Decimal,
    pub distributions: Decimal,
    /// Value of all traditional, SEP and SIMPLE IRAs on December 31.
    pub year_end_balance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxReturn {
    pub tax_year: i32,
    pub filer: Filer,
    #[serde(default)]
    pub wages: Vec<WageRecord>,
    #[serde(default)]
    pub interest: Vec<InterestRecord>,
    #[serde(default)]
    pub dividends: Vec<DividendRecord>,
    #[serde(default)]
    pub capital_transactions: Vec<CapitalTransaction>,
    #[serde(default)]
    pub business: Option<BusinessRecord>,
    #[serde(default)]
    pub rental_properties: Vec<RentalProperty>,
    #[serde(default)]
    pub adjustments: Adjustments,
    #[serde(default)]
    pub itemized_deductions: Option<ItemizedDeductions>,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    #[serde(default)]
    pub education_expenses: Vec<EducationExpense>,
    #[serde(default)]
    pub retirement_basis: Option<RetirementBasis>,
    #[serde(default)]
    pub estimated_tax_payments: Decimal,
}

impl TaxReturn {
    pub fn new(
        tax_year: i32,
        filer: Filer,
    ) -> Self {
        Self {
            tax_year,
            filer,
            ..Default::default()
        }
    }

    pub fn filing_status(&self) -> FilingStatus {
        self.filer.filing_status
    }

    pub fn total_wages(&self) -> Decimal {
        self.wages.iter().map(|w| w.wages).sum()
    }

    pub fn total_medicare_wages(&self) -> Decimal {
        self.wages.iter().map(WageRecord::medicare_wages).sum()
    }

    pub fn federal_withholding(&self) -> Decimal {
        self.wages.iter().map(|w| w.federal_withholding).sum()
    }

    pub fn total_interest(&self) -> Decimal {
        self.interest.iter().map(|i| i.amount).sum()
    }

    pub fn total_ordinary_dividends(&self) -> Decimal {
        self.dividends.iter().map(|d| d.ordinary).sum()
    }

    pub fn total_qualified_dividends(&self) -> Decimal {
        self.dividends.iter().map(|d| d.qualified).sum()
    }

    /// Signed Schedule C profit; zero when there is no business.
    pub fn business_net_profit(&self) -> Decimal {
        self.business
            .as_ref()
            .map_or(Decimal::ZERO, BusinessRecord::net_profit)
    }

    pub fn qualifying_child_count(&self) -> usize {
        self.dependents
            .iter()
            .filter(|d| d.qualifies_for_child_tax_credit)
            .count()
    }

    /// Checks the record-level invariants: non-negative input amounts, sale
    /// dates on or after acquisition dates, and residency months in range.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, w) in self.wages.iter().enumerate() {
            non_negative(format!("wages[{i}].wages"), w.wages)?;
            non_negative(
                format!("wages[{i}].federal_withholding"),
                w.federal_withholding,
            )?;
            if let Some(medicare) = w.medicare_wages {
                non_negative(format!("wages[{i}].medicare_wages"), medicare)?;
            }
        }
        for (i, r) in self.interest.iter().enumerate() {
            non_negative(format!("interest[{i}].amount"), r.amount)?;
        }
        for (i, d) in self.dividends.iter().enumerate() {
            non_negative(format!("dividends[{i}].ordinary"), d.ordinary)?;
            non_negative(format!("dividends[{i}].qualified"), d.qualified)?;
        }
        for (i, t) in self.capital_transactions.iter().enumerate() {
            non_negative(format!("capital_transactions[{i}].proceeds"), t.proceeds)?;
            non_negative(
                format!("capital_transactions[{i}].cost_basis"),
                t.cost_basis,
            )?;
            if t.sold < t.acquired {
                return Err(ValidationError::SaleBeforeAcquisition {
                    index: i,
                    acquired: t.acquired,
                    sold: t.sold,
                });
            }
        }
        if let Some(b) = &self.business {
            non_negative("business.gross_receipts", b.gross_receipts)?;
            non_negative("business.returns_and_allowances", b.returns_and_allowances)?;
            non_negative("business.cost_of_goods_sold", b.cost_of_goods_sold)?;
            non_negative("business.other_income", b.other_income)?;
            line_items_non_negative("business.expenses", &b.expenses.line_items())?;
        }
        for (i, p) in self.rental_properties.iter().enumerate() {
            non_negative(
                format!("rental_properties[{i}].rents_received"),
                p.rents_received,
            )?;
            line_items_non_negative(
                &format!("rental_properties[{i}].expenses"),
                &p.expenses.line_items(),
            )?;
        }

        let adj = &self.adjustments;
        non_negative("adjustments.student_loan_interest", adj.student_loan_interest)?;
        non_negative("adjustments.educator_expenses", adj.educator_expenses)?;
        if let Some(hsa) = &adj.hsa {
            non_negative("adjustments.hsa.amount", hsa.amount)?;
        }
        if let Some(ira) = &adj.ira {
            non_negative("adjustments.ira.traditional", ira.traditional)?;
            non_negative("adjustments.ira.roth", ira.roth)?;
        }

        if let Some(itemized) = &self.itemized_deductions {
            line_items_non_negative("itemized_deductions", &itemized.line_items())?;
        }
        for (i, d) in self.dependents.iter().enumerate() {
            if d.months_lived_with_filer > 12 {
                return Err(ValidationError::MonthsOutOfRange {
                    index: i,
                    months: d.months_lived_with_filer,
                });
            }
        }
        for (i, e) in self.education_expenses.iter().enumerate() {
            non_negative(
                format!("education_expenses[{i}].qualified_expenses"),
                e.qualified_expenses,
            )?;
        }
        if let Some(basis) = &self.retirement_basis {
            non_negative(
                "retirement_basis.nondeductible_contributions",
                basis.nondeductible_contributions,
            )?;
            non_negative("retirement_basis.prior_year_basis", basis.prior_year_basis)?;
            non_negative("retirement_basis.conversion_amount", basis.conversion_amount)?;
            non_negative("retirement_basis.distributions", basis.distributions)?;
            non_negative("retirement_basis.year_end_balance", basis.year_end_balance)?;
        }
        non_negative("estimated_tax_payments", self.estimated_tax_payments)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn single_return() -> TaxReturn {
        TaxReturn::new(
            2025,
            Filer {
                filing_status: FilingStatus::Single,
                age: 40,
                ..Default::default()
            },
        )
    }

    #[test]
    fn business_net_profit_subtracts_every_expense_line() {
        let business = BusinessRecord {
            gross_receipts: dec!(120000),
            returns_and_allowances: dec!(1000),
            cost_of_goods_sold: dec!(4000),
            other_income: dec!(500),
            expenses: BusinessExpenses {
                advertising: dec!(1500),
                supplies: dec!(2500),
                other: dec!(1000),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(business.expenses.total(), dec!(5000));
        assert_eq!(business.net_profit(), dec!(110500));
    }

    #[test]
    fn rental_net_income_can_be_negative() {
        let property = RentalProperty {
            rents_received: dec!(12000),
            expenses: RentalExpenses {
                mortgage_interest: dec!(9000),
                depreciation: dec!(6000),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(property.net_income(), dec!(-3000));
    }

    #[test]
    fn medicare_wages_fall_back_to_wages() {
        let w2 = WageRecord {
            wages: dec!(50000),
            ..Default::default()
        };
        let w2_with_box5 = WageRecord {
            wages: dec!(50000),
            medicare_wages: Some(dec!(55000)),
            ..Default::default()
        };

        assert_eq!(w2.medicare_wages(), dec!(50000));
        assert_eq!(w2_with_box5.medicare_wages(), dec!(55000));
    }

    #[test]
    fn holding_period_over_a_year_is_long_term() {
        let mut tx = CapitalTransaction {
            description: "VTI".to_string(),
            acquired: date(2024, 1, 1),
            sold: date(2024, 12, 31),
            proceeds: dec!(1000),
            cost_basis: dec!(800),
            is_long_term: false,
        };
        assert_eq!(tx.holding_period_days(), 365);
        assert!(!tx.is_long_term_by_dates());

        tx.sold = date(2025, 1, 1);
        assert!(tx.is_long_term_by_dates());
        assert_eq!(tx.gain_or_loss(), dec!(200));
    }

    #[test]
    fn dependent_child_tax_credit_tests() {
        let child = Dependent {
            age: 16,
            months_lived_with_filer: 7,
            ..Default::default()
        };
        let too_old = Dependent {
            age: 17,
            months_lived_with_filer: 12,
            ..Default::default()
        };
        let half_year = Dependent {
            age: 5,
            months_lived_with_filer: 6,
            ..Default::default()
        };

        assert!(child.meets_child_tax_credit_tests());
        assert!(!too_old.meets_child_tax_credit_tests());
        assert!(!half_year.meets_child_tax_credit_tests());
    }

    #[test]
    fn totals_sum_across_records() {
        let mut ret = single_return();
        ret.wages = vec![
            WageRecord {
                wages: dec!(40000),
                federal_withholding: dec!(4000),
                ..Default::default()
            },
            WageRecord {
                wages: dec!(10000),
                federal_withholding: dec!(900),
                ..Default::default()
            },
        ];
        ret.dividends = vec![DividendRecord {
            ordinary: dec!(300),
            qualified: dec!(200),
            ..Default::default()
        }];
        ret.dependents = vec![
            Dependent {
                qualifies_for_child_tax_credit: true,
                ..Default::default()
            },
            Dependent::default(),
        ];

        assert_eq!(ret.total_wages(), dec!(50000));
        assert_eq!(ret.federal_withholding(), dec!(4900));
        assert_eq!(ret.total_ordinary_dividends(), dec!(300));
        assert_eq!(ret.total_qualified_dividends(), dec!(200));
        assert_eq!(ret.qualifying_child_count(), 1);
        assert_eq!(ret.business_net_profit(), Decimal::ZERO);
    }

    #[test]
    fn validate_accepts_empty_return() {
        assert_eq!(single_return().validate(), Ok(()));
    }

    #[test]
    fn validate_reports_negative_amount_with_field_path() {
        let mut ret = single_return();
        ret.wages = vec![
            WageRecord {
                wages: dec!(1000),
                ..Default::default()
            },
            WageRecord {
                wages: dec!(1000),
                federal_withholding: dec!(-5),
                ..Default::default()
            },
        ];

        assert_eq!(
            ret.validate(),
            Err(ValidationError::NegativeAmount {
                field: "wages[1].federal_withholding".to_string(),
                value: dec!(-5),
            })
        );
    }

    #[test]
    fn validate_reports_negative_expense_line() {
        let mut ret = single_return();
        ret.rental_properties = vec![RentalProperty {
            rents_received: dec!(1000),
            expenses: RentalExpenses {
                repairs: dec!(-1),
                ..Default::default()
            },
            ..Default::default()
        }];

        let err = ret.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "rental_properties[0].expenses.repairs must be non-negative, got -1"
        );
    }

    #[test]
    fn validate_rejects_sale_before_acquisition() {
        let mut ret = single_return();
        ret.capital_transactions = vec![CapitalTransaction {
            description: String::new(),
            acquired: date(2025, 3, 1),
            sold: date(2025, 2, 1),
            proceeds: dec!(100),
            cost_basis: dec!(50),
            is_long_term: false,
        }];

        assert_eq!(
            ret.validate(),
            Err(ValidationError::SaleBeforeAcquisition {
                index: 0,
                acquired: date(2025, 3, 1),
                sold: date(2025, 2, 1),
            })
        );
    }

    #[test]
    fn validate_rejects_more_than_twelve_months() {
        let mut ret = single_return();
        ret.dependents = vec![Dependent {
            months_lived_with_filer: 13,
            ..Default::default()
        }];

        assert_eq!(
            ret.validate(),
            Err(ValidationError::MonthsOutOfRange {
                index: 0,
                months: 13
            })
        );
    }
}
