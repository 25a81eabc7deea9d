//! Federal individual income tax computation.
//!
//! Build a [`TaxReturn`], pick the [`TaxYearTables`] for its year and run a
//! [`TaxEngine`] to get a [`TaxCalculation`]. The individual form
//! calculators live in [`calculations`] and can be used on their own.

mod cache;
pub mod calculations;
mod engine;
pub mod models;
pub mod tables;

pub use cache::{CacheStats, CalculationCache, DEFAULT_CAPACITY, DEFAULT_TTL};
pub use engine::{EngineError, TaxEngine};
pub use models::*;
