//! Data layer for the strike dashboard.
//!
//! Reads the attacks CSV, normalizes events to calendar dates, aggregates
//! them into daily and monthly tables, and filters those tables by date
//! range.

pub mod aggregator;
pub mod export;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod reader;

pub use dashboard_core as core;
