//! Device diagnostics engine behind the `gsi-checker` CLI: property reading,
//! A/B classification, GSI recommendation and root diagnostics.

pub mod analyzer;
pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod session;
pub mod types;
