mod filing_status;
mod tax_bracket;
mod tax_calculation;
mod tax_return;
mod tax_year_tables;

pub use filing_status::{ByFilingStatus, FilingStatus};
pub use tax_bracket::TaxBracket;
pub use tax_calculation::TaxCalculation;
pub use tax_return::{
    Adjustments, BusinessExpenses, BusinessRecord, CapitalTransaction, Dependent, DividendRecord,
    EducationExpense, Filer, HsaContribution, InterestRecord, IraContribution,
    ItemizedDeductions, LONG_TERM_HOLDING_DAYS, RentalExpenses, RentalProperty, RetirementBasis,
    Spouse, TaxReturn, ValidationError, WageRecord,
};
pub use tax_year_tables::{
    AdditionalMedicareTable, AmtTable, ChildTaxCreditTable, DeductionTable, EducationCreditTable,
    PhaseOutRange, SaversCreditTable, SaversCreditTier, TablesError, TaxYearTables,
};
