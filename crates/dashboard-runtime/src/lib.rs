//! Runtime layer for the strike dashboard.
//!
//! Locates the dataset on disk and owns the loaded pipeline result that the
//! UI and the JSON export read from.

pub mod data_manager;
pub mod fetch;

pub use dashboard_core as core;
pub use dashboard_data as data;
