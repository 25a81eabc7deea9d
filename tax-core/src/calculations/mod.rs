//! Calculators for the individual pieces of a Form 1040.
//!
//! Each calculator covers one form or schedule and exposes its intermediate
//! lines. [`crate::TaxEngine`] runs them in order and assembles a
//! [`crate::TaxCalculation`].

pub mod additional_medicare;
pub mod adjustments;
pub mod amt;
pub mod basis;
pub mod capital_gains;
pub mod common;
pub mod credits;
pub mod deductions;
pub mod income;
pub mod progressive;
pub mod qbi;
pub mod self_employment;

pub use additional_medicare::{AdditionalMedicareCalculator, AdditionalMedicareResult};
pub use adjustments::{AdjustmentCalculator, AdjustmentsSummary};
pub use amt::{AmtCalculator, AmtResult};
pub use basis::{BasisCalculator, BasisResult};
pub use capital_gains::{CapitalGainsNetter, CapitalGainsSummary};
pub use credits::{CreditEngine, CreditSummary, phase_out_factor};
pub use deductions::{DeductionResolver, DeductionResult};
pub use income::{IncomeAggregator, IncomeSummary};
pub use progressive::ProgressiveTaxCalculator;
pub use qbi::{QbiCalculator, QbiResult};
pub use self_employment::{SeTaxCalculator, SeTaxConfig, SeTaxError, SeTaxResult};
