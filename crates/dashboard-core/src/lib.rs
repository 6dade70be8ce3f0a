//! Shared building blocks for the strike dashboard.
//!
//! Holds the error type, the record and aggregate models, CLI settings,
//! calendar helpers and the display formatters used by the other crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
