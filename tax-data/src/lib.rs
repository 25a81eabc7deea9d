//! Loading rate tables from data files.

mod loader;

pub use loader::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
