//! Launch aggregation over daily and monthly windows.
//!
//! Daily rows are keyed by exact calendar date; monthly rows by the first day
//! of the calendar month.  Both are accumulated in a `BTreeMap` so the output
//! comes out sorted without a separate sort step.
//!
//! Bucket sums are checked: a day or month whose counts leave the `i64`
//! range fails with [`DashboardError::CountOverflow`] instead of panicking.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{
    interception_rate, DailyAggregate, DateRange, MonthlyAggregate, NormalizedRecord, PeriodCounts,
};
use dashboard_core::time_utils::{month_label, month_start, months_spanned};

// ── CountTotals ───────────────────────────────────────────────────────────────

/// Running launched/destroyed sums for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountTotals {
    pub launched: i64,
    pub destroyed: i64,
}

impl CountTotals {
    /// Add one row's counts, `None` if either sum leaves the `i64` range.
    pub fn checked_add(self, launched: i64, destroyed: i64) -> Option<Self> {
        Some(Self {
            launched: self.launched.checked_add(launched)?,
            destroyed: self.destroyed.checked_add(destroyed)?,
        })
    }

    /// Add one row's counts, clamping at the `i64` bounds.
    pub fn saturating_add(self, launched: i64, destroyed: i64) -> Self {
        Self {
            launched: self.launched.saturating_add(launched),
            destroyed: self.destroyed.saturating_add(destroyed),
        }
    }

    pub fn interception_rate(&self) -> f64 {
        interception_rate(self.launched, self.destroyed)
    }
}

// ── PeriodTotals ──────────────────────────────────────────────────────────────

/// Cross-period totals shown in the table footer and the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub launched_total: i64,
    pub destroyed_total: i64,
    /// Rate over the summed counts, not an average of per-row rates.
    pub interception_rate: f64,
    /// Number of rows summed.
    pub periods: usize,
}

// ── AggregateTables ───────────────────────────────────────────────────────────

/// The two outputs of the pipeline, handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateTables {
    pub daily: Vec<DailyAggregate>,
    pub monthly: Vec<MonthlyAggregate>,
}

impl AggregateTables {
    /// Build both granularities from normalized records.
    ///
    /// Also rejects data whose running total over all days overflows, so that
    /// for non-negative counts every range total is exact.
    pub fn from_records(records: &[NormalizedRecord]) -> Result<Self> {
        let daily = Aggregator::aggregate_daily(records)?;
        let monthly = Aggregator::aggregate_monthly(&daily)?;

        let mut running = CountTotals::default();
        for row in &daily {
            running = running
                .checked_add(row.launched_total, row.destroyed_total)
                .ok_or(DashboardError::CountOverflow { date: row.date })?;
        }

        Ok(Self { daily, monthly })
    }

    /// First and last date of the daily series, `None` when empty.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let first = self.daily.first()?.date;
        let last = self.daily.last()?.date;
        Some(DateRange::new(first, last))
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.monthly.is_empty()
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless helper that groups launch records by time period.
pub struct Aggregator;

impl Aggregator {
    /// Sum records per calendar date.
    ///
    /// One row per distinct date present in `records`, ascending.
    pub fn aggregate_daily(records: &[NormalizedRecord]) -> Result<Vec<DailyAggregate>> {
        let mut map: BTreeMap<NaiveDate, CountTotals> = BTreeMap::new();

        for record in records {
            let totals = map.entry(record.date).or_default();
            *totals = totals
                .checked_add(record.launched_count, record.destroyed_count)
                .ok_or(DashboardError::CountOverflow { date: record.date })?;
        }

        Ok(map
            .into_iter()
            .map(|(date, totals)| DailyAggregate {
                date,
                launched_total: totals.launched,
                destroyed_total: totals.destroyed,
                interception_rate: totals.interception_rate(),
            })
            .collect())
    }

    /// Resample daily rows to calendar months.
    ///
    /// Every month from the first to the last daily row is present, ascending.
    /// Months with no daily rows are zero-filled with a rate of `0.0`, the
    /// same convention as a zero-launch day.  Input order does not matter.
    pub fn aggregate_monthly(daily: &[DailyAggregate]) -> Result<Vec<MonthlyAggregate>> {
        let mut map: BTreeMap<NaiveDate, CountTotals> = BTreeMap::new();

        for row in daily {
            let month = month_start(row.date);
            let totals = map.entry(month).or_default();
            *totals = totals
                .checked_add(row.launched_total, row.destroyed_total)
                .ok_or(DashboardError::CountOverflow { date: month })?;
        }

        let (Some((&first, _)), Some((&last, _))) = (map.first_key_value(), map.last_key_value())
        else {
            return Ok(Vec::new());
        };

        Ok(months_spanned(first, last)
            .into_iter()
            .map(|month| {
                let totals = map.get(&month).copied().unwrap_or_default();
                MonthlyAggregate {
                    month_start: month,
                    month_label: month_label(month),
                    launched_total: totals.launched,
                    destroyed_total: totals.destroyed,
                    interception_rate: totals.interception_rate(),
                }
            })
            .collect())
    }

    /// Sum all rows into a single [`PeriodTotals`].
    ///
    /// Sums clamp at the `i64` bounds.  Tables from
    /// [`AggregateTables::from_records`] with non-negative counts never reach
    /// them.
    pub fn calculate_totals<T: PeriodCounts>(rows: &[T]) -> PeriodTotals {
        let totals = rows.iter().fold(CountTotals::default(), |acc, row| {
            acc.saturating_add(row.launched_total(), row.destroyed_total())
        });
        PeriodTotals {
            launched_total: totals.launched,
            destroyed_total: totals.destroyed,
            interception_rate: totals.interception_rate(),
            periods: rows.len(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
