//! Machine-readable output formatters.
//!
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! The text format is the [`crate::report::Report`] message itself.

pub mod csv;
pub mod json;

pub use csv::{CsvOutput, CsvOutputError};
pub use json::JsonOutput;
