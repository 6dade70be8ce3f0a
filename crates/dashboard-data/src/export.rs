//! JSON export of a filtered view.

use dashboard_core::error::Result;
use dashboard_core::models::{DailyAggregate, DateRange, MonthlyAggregate};
use serde::{Deserialize, Serialize};

use crate::aggregator::{AggregateTables, Aggregator, PeriodTotals};

/// Everything the dashboard shows for one range, in serialisable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub range: DateRange,
    pub daily: Vec<DailyAggregate>,
    pub monthly: Vec<MonthlyAggregate>,
    pub daily_totals: PeriodTotals,
    pub monthly_totals: PeriodTotals,
}

impl ExportDocument {
    pub fn new(range: DateRange, tables: AggregateTables) -> Self {
        let daily_totals = Aggregator::calculate_totals(&tables.daily);
        let monthly_totals = Aggregator::calculate_totals(&tables.monthly);
        Self {
            range,
            daily: tables.daily,
            monthly: tables.monthly,
            daily_totals,
            monthly_totals,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
