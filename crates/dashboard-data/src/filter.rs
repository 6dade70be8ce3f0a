//! Inclusive date-range filtering applied to both aggregate granularities.
//!
//! A monthly row is kept when its month-start date lies in the range.  With
//! day-precision bounds this means a range beginning mid-month drops that
//! first month, while a range ending mid-month keeps its last month.

use dashboard_core::models::{DailyAggregate, DateRange, MonthlyAggregate};

use crate::aggregator::AggregateTables;

/// Daily rows with `range.start <= date <= range.end`, order preserved.
pub fn filter_daily(rows: &[DailyAggregate], range: &DateRange) -> Vec<DailyAggregate> {
    rows.iter()
        .filter(|row| range.contains(row.date))
        .cloned()
        .collect()
}

/// Monthly rows whose month-start date lies in `range`, order preserved.
pub fn filter_monthly(rows: &[MonthlyAggregate], range: &DateRange) -> Vec<MonthlyAggregate> {
    rows.iter()
        .filter(|row| range.contains(row.month_start))
        .cloned()
        .collect()
}

/// Apply the same `range` to both tables.
///
/// An inverted range (`start > end`) yields two empty tables.
pub fn apply_range(tables: &AggregateTables, range: &DateRange) -> AggregateTables {
    AggregateTables {
        daily: filter_daily(&tables.daily, range),
        monthly: filter_monthly(&tables.monthly, range),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
