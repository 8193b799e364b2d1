//! geodupe - tolerance-aware duplicate geometry detection
//!
//! Finds points, curves, solids and block instances that duplicate each
//! other within a distance and an angle tolerance. A bulk-loaded R-tree
//! narrows the candidate pairs, kind-specific estimators measure each pair,
//! and a greedy pass turns the verdicts into one duplicate set.

pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod output;
pub mod progress;
pub mod report;

pub use app::{run_app, run_dedup, RunOptions, RunOutcome};
