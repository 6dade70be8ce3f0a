//! End-to-end pipeline: CSV → normalized records → daily and monthly tables.
//!
//! Every invocation rebuilds everything from the input; nothing is cached.

use std::path::Path;

use chrono::Utc;
use dashboard_core::error::Result;
use dashboard_core::models::DateRange;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::AggregateTables;
use crate::filter::apply_range;
use crate::normalizer::normalize;
use crate::reader::{read_event_table, RawEventTable};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the aggregate tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// File the events were read from, when loaded from disk.
    pub source_path: Option<String>,
    /// Number of event rows normalized.
    pub rows_processed: usize,
    /// Number of daily rows produced.
    pub days: usize,
    /// Number of monthly rows produced (including zero-filled months).
    pub months: usize,
    /// Wall-clock seconds spent reading the CSV.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent normalizing and aggregating.
    pub transform_time_seconds: f64,
}

/// The complete output of [`run_pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Unfiltered daily and monthly tables.
    pub tables: AggregateTables,
    pub metadata: PipelineMetadata,
}

impl PipelineResult {
    /// First and last date present in the data.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.tables.date_bounds()
    }

    /// Both tables restricted to `range`.
    pub fn view(&self, range: &DateRange) -> AggregateTables {
        apply_range(&self.tables, range)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run normalization and both aggregations over an in-memory table.
pub fn run_pipeline(table: &RawEventTable) -> Result<PipelineResult> {
    let transform_start = std::time::Instant::now();
    let records = normalize(table)?;
    let tables = AggregateTables::from_records(&records)?;
    let transform_time = transform_start.elapsed().as_secs_f64();

    debug!(
        "Pipeline: {} rows -> {} days, {} months in {:.3}s",
        records.len(),
        tables.daily.len(),
        tables.monthly.len(),
        transform_time
    );

    let metadata = PipelineMetadata {
        generated_at: Utc::now().to_rfc3339(),
        source_path: None,
        rows_processed: records.len(),
        days: tables.daily.len(),
        months: tables.monthly.len(),
        load_time_seconds: 0.0,
        transform_time_seconds: transform_time,
    };

    Ok(PipelineResult { tables, metadata })
}

/// Read `path` and run the pipeline over it.
pub fn run_pipeline_from_path(path: &Path) -> Result<PipelineResult> {
    let load_start = std::time::Instant::now();
    let table = read_event_table(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let mut result = run_pipeline(&table)?;
    result.metadata.source_path = Some(path.display().to_string());
    result.metadata.load_time_seconds = load_time;

    Ok(result)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregator;
    use crate::normalizer::normalize;
    use crate::reader::read_event_table_from;
    use chrono::{Datelike, NaiveDate};
    use dashboard_core::error::DashboardError;
    use dashboard_core::time_utils::months_spanned;
    use std::io::Write;
    use tempfile::TempDir;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn table(csv_text: &str) -> RawEventTable {
        read_event_table_from(csv_text.as_bytes()).unwrap()
    }

    const SCENARIO: &str = "\
time_start,time_end,model,launched,destroyed,source
2022-02-24 04:50,2022-02-24 08:00,Kalibr,5,1,kpszsu
2022-02-24 21:10,,Iskander-M,3,3,kpszsu
2022-03-01 03:00,,,0,0,kpszsu
";

    /// A larger, irregular dataset spanning several months with a gap month.
    fn wide_csv() -> String {
        let mut csv_text = String::from("time_start,launched,destroyed,model\n");
        let mut date = d("2022-09-13");
        let mut i = 0u32;
        while date <= d("2023-04-02") {
            let skip_december = date.month() == 12 && date.year() == 2022;
            if i % 3 != 1 && !skip_december {
                let launched = (i * 7) % 23;
                let destroyed = launched.saturating_sub(i % 4);
                csv_text.push_str(&format!(
                    "{} {:02}:{:02},{},{},Shahed-136/131\n",
                    date,
                    i % 24,
                    (i * 13) % 60,
                    launched,
                    destroyed
                ));
                if i % 5 == 0 {
                    csv_text.push_str(&format!("{} 23:40,2,1,Kh-101\n", date));
                }
            }
            date = date.succ_opt().unwrap();
            i += 1;
        }
        csv_text
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn test_scenario_daily_and_monthly() {
        let result = run_pipeline(&table(SCENARIO)).unwrap();
        let daily = &result.tables.daily;
        let monthly = &result.tables.monthly;

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, d("2022-02-24"));
        assert_eq!(daily[0].launched_total, 8);
        assert_eq!(daily[0].destroyed_total, 4);
        assert!((daily[0].interception_rate - 50.0).abs() < 1e-9);
        assert_eq!(daily[1].date, d("2022-03-01"));
        assert_eq!(daily[1].launched_total, 0);
        assert_eq!(daily[1].destroyed_total, 0);
        assert_eq!(daily[1].interception_rate, 0.0);

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month_label, "2022-02");
        assert_eq!(monthly[0].launched_total, 8);
        assert_eq!(monthly[0].destroyed_total, 4);
        assert!((monthly[0].interception_rate - 50.0).abs() < 1e-9);
        assert_eq!(monthly[1].month_label, "2022-03");
        assert_eq!(monthly[1].launched_total, 0);
        assert_eq!(monthly[1].interception_rate, 0.0);
    }

    #[test]
    fn test_scenario_single_day_view() {
        let result = run_pipeline(&table(SCENARIO)).unwrap();
        let view = result.view(&DateRange::new(d("2022-03-01"), d("2022-03-01")));
        assert_eq!(view.daily.len(), 1);
        assert_eq!(view.daily[0].date, d("2022-03-01"));
        assert_eq!(view.monthly.len(), 1);
        assert_eq!(view.monthly[0].month_label, "2022-03");
    }

    #[test]
    fn test_metadata_counts() {
        let result = run_pipeline(&table(SCENARIO)).unwrap();
        assert_eq!(result.metadata.rows_processed, 3);
        assert_eq!(result.metadata.days, 2);
        assert_eq!(result.metadata.months, 2);
        assert!(result.metadata.source_path.is_none());
        assert_eq!(
            result.date_bounds(),
            Some(DateRange::new(d("2022-02-24"), d("2022-03-01")))
        );
    }

    // ── Properties ────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_then_aggregate_is_idempotent() {
        let t = table(&wide_csv());
        let first = Aggregator::aggregate_daily(&normalize(&t).unwrap()).unwrap();
        let second = Aggregator::aggregate_daily(&normalize(&t).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sum_conservation_input_daily_monthly() {
        let t = table(&wide_csv());
        let records = normalize(&t).unwrap();
        let result = run_pipeline(&t).unwrap();

        let input_launched: i64 = records.iter().map(|r| r.launched_count).sum();
        let input_destroyed: i64 = records.iter().map(|r| r.destroyed_count).sum();
        let daily = Aggregator::calculate_totals(&result.tables.daily);
        let monthly = Aggregator::calculate_totals(&result.tables.monthly);

        assert_eq!(daily.launched_total, input_launched);
        assert_eq!(daily.destroyed_total, input_destroyed);
        assert_eq!(monthly.launched_total, input_launched);
        assert_eq!(monthly.destroyed_total, input_destroyed);
    }

    #[test]
    fn test_rate_bound_on_every_row() {
        let result = run_pipeline(&table(&wide_csv())).unwrap();
        for row in &result.tables.daily {
            assert!(row.interception_rate >= 0.0);
            if row.launched_total == 0 {
                assert_eq!(row.interception_rate, 0.0);
            }
        }
        for row in &result.tables.monthly {
            assert!(row.interception_rate >= 0.0);
            if row.launched_total == 0 {
                assert_eq!(row.interception_rate, 0.0);
            }
        }
    }

    #[test]
    fn test_month_coverage_without_gaps() {
        let result = run_pipeline(&table(&wide_csv())).unwrap();
        let bounds = result.date_bounds().unwrap();
        let expected = months_spanned(bounds.start, bounds.end);
        let got: Vec<NaiveDate> = result.tables.monthly.iter().map(|m| m.month_start).collect();
        assert_eq!(got, expected);

        // December 2022 had no events but is still present, zero-filled.
        let december = result
            .tables
            .monthly
            .iter()
            .find(|m| m.month_label == "2022-12")
            .unwrap();
        assert_eq!(december.launched_total, 0);
        assert_eq!(december.interception_rate, 0.0);
    }

    #[test]
    fn test_outputs_sorted_ascending() {
        let result = run_pipeline(&table(&wide_csv())).unwrap();
        assert!(result.tables.daily.windows(2).all(|w| w[0].date < w[1].date));
        assert!(result
            .tables
            .monthly
            .windows(2)
            .all(|w| w[0].month_start < w[1].month_start));
    }

    // ── Edge cases ────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_input_yields_empty_tables() {
        let result = run_pipeline(&table("time_start,launched,destroyed\n")).unwrap();
        assert!(result.tables.is_empty());
        assert!(result.date_bounds().is_none());
        let view = result.view(&DateRange::new(d("2022-01-01"), d("2022-12-31")));
        assert!(view.is_empty());
    }

    #[test]
    fn test_malformed_input_fails_fast() {
        let t = table("time_start,launched,destroyed\n2022-02-24,5,1\nbogus,1,1\n");
        assert!(matches!(
            run_pipeline(&t),
            Err(DashboardError::InvalidTimestamp { row: 2, .. })
        ));
    }

    #[test]
    fn test_same_day_counts_past_i64_max_fail() {
        let t = table(&format!(
            "time_start,launched,destroyed\n2022-02-24,{},1\n2022-02-24,1,1\n",
            i64::MAX
        ));
        let err = run_pipeline(&t).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::CountOverflow { date } if date == d("2022-02-24")
        ));
    }

    // ── run_pipeline_from_path ────────────────────────────────────────────────

    #[test]
    fn test_run_pipeline_from_path_sets_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missile_attacks_daily.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();

        let result = run_pipeline_from_path(&path).unwrap();
        assert_eq!(result.tables.daily.len(), 2);
        assert_eq!(
            result.metadata.source_path.as_deref(),
            Some(path.display().to_string().as_str())
        );
    }

    #[test]
    fn test_run_pipeline_from_missing_path() {
        let dir = TempDir::new().unwrap();
        let err = run_pipeline_from_path(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::FileRead { .. }));
    }
}
