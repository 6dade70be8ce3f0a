//! Terminal UI layer for the strike dashboard.
//!
//! Provides themes, the header component, bar and line charts, aggregate
//! tables, and the interactive application loop built on [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
