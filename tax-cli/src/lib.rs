//! Command-line front end for the tax engine: reads a return from TOML,
//! computes it and prints the result.

pub mod input;
pub mod logging;
pub mod report;
