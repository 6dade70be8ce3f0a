//! Reusable widgets shared by the dashboard views.

pub mod header;
