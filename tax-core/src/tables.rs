//! Built-in federal rate tables.
//!
//! Figures come from the IRS revenue procedures for each year (Rev. Proc.
//! 2023-34 for 2024, Rev. Proc. 2024-40 for 2025) and the SSA wage base
//! announcements. Use `tax-data` to replace bracket schedules from CSV.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    AdditionalMedicareTable, AmtTable, ByFilingStatus, ChildTaxCreditTable, DeductionTable,
    EducationCreditTable, PhaseOutRange, SaversCreditTable, SaversCreditTier, TaxBracket,
    TaxYearTables,
};

const BRACKET_RATES: [Decimal; 7] = [
    dec!(0.10),
    dec!(0.12),
    dec!(0.22),
    dec!(0.24),
    dec!(0.32),
    dec!(0.35),
    dec!(0.37),
];

/// Builds a seven-bracket schedule from its six upper edges.
fn schedule(edges: [Decimal; 6]) -> Vec<TaxBracket> {
    let mut brackets = Vec::with_capacity(BRACKET_RATES.len());
    let mut floor = Decimal::ZERO;
    for (edge, rate) in edges.iter().zip(BRACKET_RATES) {
        brackets.push(TaxBracket::new(floor, Some(*edge), rate));
        floor = *edge;
    }
    brackets.push(TaxBracket::new(floor, None, BRACKET_RATES[6]));
    brackets
}

fn savers_tiers(limits: [Decimal; 3]) -> Vec<SaversCreditTier> {
    [dec!(0.50), dec!(0.20), dec!(0.10)]
        .into_iter()
        .zip(limits)
        .map(|(rate, max_agi)| SaversCreditTier { max_agi, rate })
        .collect()
}

fn child_tax_credit() -> ChildTaxCreditTable {
    ChildTaxCreditTable {
        amount_per_child: dec!(2000),
        phaseout_threshold: ByFilingStatus {
            married_filing_jointly: dec!(400000),
            ..ByFilingStatus::uniform(dec!(200000))
        },
        reduction_per_step: dec!(50),
        phaseout_step: dec!(1000),
    }
}

fn education_credits() -> EducationCreditTable {
    EducationCreditTable {
        aotc_full_rate_expenses: dec!(2000),
        aotc_partial_rate_expenses: dec!(2000),
        aotc_partial_rate: dec!(0.25),
        aotc_max_per_student: dec!(2500),
        llc_rate: dec!(0.20),
        llc_expense_limit: dec!(10000),
        llc_max_per_return: dec!(2000),
        phaseout_joint: PhaseOutRange {
            start: dec!(160000),
            end: dec!(180000),
        },
        phaseout_other: PhaseOutRange {
            start: dec!(80000),
            end: dec!(90000),
        },
    }
}

fn additional_medicare() -> AdditionalMedicareTable {
    AdditionalMedicareTable {
        rate: dec!(0.009),
        threshold: ByFilingStatus {
            married_filing_jointly: dec!(250000),
            married_filing_separately: dec!(125000),
            ..ByFilingStatus::uniform(dec!(200000))
        },
    }
}

fn savers_contribution_cap() -> ByFilingStatus<Decimal> {
    ByFilingStatus {
        married_filing_jointly: dec!(4000),
        qualifying_surviving_spouse: dec!(4000),
        ..ByFilingStatus::uniform(dec!(2000))
    }
}

pub fn tax_year_2025() -> TaxYearTables {
    let single = schedule([
        dec!(11925),
        dec!(48475),
        dec!(103350),
        dec!(197300),
        dec!(250525),
        dec!(626350),
    ]);
    let joint = schedule([
        dec!(23850),
        dec!(96950),
        dec!(206700),
        dec!(394600),
        dec!(501050),
        dec!(751600),
    ]);
    let separate = schedule([
        dec!(11925),
        dec!(48475),
        dec!(103350),
        dec!(197300),
        dec!(250525),
        dec!(375800),
    ]);
    let head = schedule([
        dec!(17000),
        dec!(64850),
        dec!(103350),
        dec!(197300),
        dec!(250500),
        dec!(626350),
    ]);

    let other_tiers = savers_tiers([dec!(23750), dec!(25500), dec!(39500)]);

    TaxYearTables {
        tax_year: 2025,
        brackets: ByFilingStatus {
            single,
            married_filing_jointly: joint.clone(),
            married_filing_separately: separate,
            head_of_household: head,
            qualifying_surviving_spouse: joint,
        },
        deductions: DeductionTable {
            standard: ByFilingStatus {
                single: dec!(15000),
                married_filing_jointly: dec!(30000),
                married_filing_separately: dec!(15000),
                head_of_household: dec!(22500),
                qualifying_surviving_spouse: dec!(30000),
            },
            additional_married: dec!(1600),
            additional_unmarried: dec!(2000),
            additional_age: 65,
            medical_agi_floor: dec!(0.075),
            salt_cap: dec!(10000),
        },
        capital_loss_limit: dec!(3000),
        ss_wage_max: dec!(176100),
        ss_tax_rate: dec!(0.124),
        medicare_tax_rate: dec!(0.029),
        se_tax_deductible_percentage: dec!(0.9235),
        se_deduction_factor: dec!(0.50),
        min_se_threshold: dec!(400),
        amt: AmtTable {
            exemption: ByFilingStatus {
                single: dec!(88100),
                married_filing_jointly: dec!(137000),
                married_filing_separately: dec!(68500),
                head_of_household: dec!(88100),
                qualifying_surviving_spouse: dec!(137000),
            },
            phaseout_threshold: ByFilingStatus {
                married_filing_jointly: dec!(1252700),
                qualifying_surviving_spouse: dec!(1252700),
                ..ByFilingStatus::uniform(dec!(626350))
            },
            phaseout_rate: dec!(0.25),
            low_rate: dec!(0.26),
            high_rate: dec!(0.28),
            rate_threshold: dec!(239100),
        },
        child_tax_credit: child_tax_credit(),
        education_credits: education_credits(),
        savers_credit: SaversCreditTable {
            contribution_cap: savers_contribution_cap(),
            tiers: ByFilingStatus {
                married_filing_jointly: savers_tiers([dec!(47500), dec!(51000), dec!(79000)]),
                head_of_household: savers_tiers([dec!(35625), dec!(38250), dec!(59250)]),
                ..ByFilingStatus::uniform(other_tiers)
            },
            minimum_age: 18,
        },
        qbi_deduction_rate: dec!(0.20),
        additional_medicare: additional_medicare(),
    }
}

pub fn tax_year_2024() -> TaxYearTables {
    let single = schedule([
        dec!(11600),
        dec!(47150),
        dec!(100525),
        dec!(191950),
        dec!(243725),
        dec!(609350),
    ]);
    let joint = schedule([
        dec!(23200),
        dec!(94300),
        dec!(201050),
        dec!(383900),
        dec!(487450),
        dec!(731200),
    ]);
    let separate = schedule([
        dec!(11600),
        dec!(47150),
        dec!(100525),
        dec!(191950),
        dec!(243725),
        dec!(365600),
    ]);
    let head = schedule([
        dec!(16550),
        dec!(63100),
        dec!(100500),
        dec!(191950),
        dec!(243700),
        dec!(609350),
    ]);

    let other_tiers = savers_tiers([dec!(23000), dec!(25000), dec!(38250)]);

    TaxYearTables {
        tax_year: 2024,
        brackets: ByFilingStatus {
            single,
            married_filing_jointly: joint.clone(),
            married_filing_separately: separate,
            head_of_household: head,
            qualifying_surviving_spouse: joint,
        },
        deductions: DeductionTable {
            standard: ByFilingStatus {
                single: dec!(14600),
                married_filing_jointly: dec!(29200),
                married_filing_separately: dec!(14600),
                head_of_household: dec!(21900),
                qualifying_surviving_spouse: dec!(29200),
            },
            additional_married: dec!(1550),
            additional_unmarried: dec!(1950),
            additional_age: 65,
            medical_agi_floor: dec!(0.075),
            salt_cap: dec!(10000),
        },
        capital_loss_limit: dec!(3000),
        ss_wage_max: dec!(168600),
        ss_tax_rate: dec!(0.124),
        medicare_tax_rate: dec!(0.029),
        se_tax_deductible_percentage: dec!(0.9235),
        se_deduction_factor: dec!(0.50),
        min_se_threshold: dec!(400),
        amt: AmtTable {
            exemption: ByFilingStatus {
                single: dec!(85700),
                married_filing_jointly: dec!(133300),
                married_filing_separately: dec!(66650),
                head_of_household: dec!(85700),
                qualifying_surviving_spouse: dec!(133300),
            },
            phaseout_threshold: ByFilingStatus {
                married_filing_jointly: dec!(1218700),
                qualifying_surviving_spouse: dec!(1218700),
                ..ByFilingStatus::uniform(dec!(609350))
            },
            phaseout_rate: dec!(0.25),
            low_rate: dec!(0.26),
            high_rate: dec!(0.28),
            rate_threshold: dec!(232600),
        },
        child_tax_credit: child_tax_credit(),
        education_credits: education_credits(),
        savers_credit: SaversCreditTable {
            contribution_cap: savers_contribution_cap(),
            tiers: ByFilingStatus {
                married_filing_jointly: savers_tiers([dec!(46000), dec!(50000), dec!(76500)]),
                head_of_household: savers_tiers([dec!(34500), dec!(37500), dec!(57375)]),
                ..ByFilingStatus::uniform(other_tiers)
            },
            minimum_age: 18,
        },
        qbi_deduction_rate: dec!(0.20),
        additional_medicare: additional_medicare(),
    }
}
