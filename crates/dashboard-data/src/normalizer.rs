//! Raw rows → typed events → date-keyed records.
//!
//! The normalizer is the only stage that can reject input.  A missing
//! timestamp/count column or an unparseable cell fails the whole run with a
//! row-numbered error rather than being coerced to zero.

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{EventRecord, NormalizedRecord};
use dashboard_core::time_utils::parse_launch_timestamp;
use tracing::debug;

use crate::reader::RawEventTable;

/// Header names accepted for the launch timestamp, first match wins.
pub const TIMESTAMP_COLUMNS: &[&str] = &["time_start", "launch_timestamp"];
/// Header names accepted for the launched count.
pub const LAUNCHED_COLUMNS: &[&str] = &["launched", "launched_count"];
/// Header names accepted for the destroyed count.
pub const DESTROYED_COLUMNS: &[&str] = &["destroyed", "destroyed_count"];

// ── EventColumns ──────────────────────────────────────────────────────────────

/// Resolved column positions for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventColumns {
    pub time_start: usize,
    pub launched: usize,
    pub destroyed: usize,
    pub model: Option<usize>,
    pub launch_place: Option<usize>,
    pub target: Option<usize>,
    pub carrier: Option<usize>,
    pub destroyed_details: Option<usize>,
    pub source: Option<usize>,
    pub time_end: Option<usize>,
}

impl EventColumns {
    /// Locate the required and descriptive columns in `table`'s header.
    pub fn locate(table: &RawEventTable) -> Result<Self> {
        let required = |names: &[&str]| {
            table
                .column_index(names)
                .ok_or_else(|| DashboardError::MissingColumn(names[0].to_string()))
        };

        Ok(Self {
            time_start: required(TIMESTAMP_COLUMNS)?,
            launched: required(LAUNCHED_COLUMNS)?,
            destroyed: required(DESTROYED_COLUMNS)?,
            model: table.column_index(&["model"]),
            launch_place: table.column_index(&["launch_place"]),
            target: table.column_index(&["target"]),
            carrier: table.column_index(&["carrier"]),
            destroyed_details: table.column_index(&["destroyed_details"]),
            source: table.column_index(&["source"]),
            time_end: table.column_index(&["time_end"]),
        })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse every data row of `table` into an [`EventRecord`].
///
/// Row numbers in errors are 1-based and exclude the header.
pub fn parse_events(table: &RawEventTable) -> Result<Vec<EventRecord>> {
    let columns = EventColumns::locate(table)?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_event(row, i + 1, &columns))
        .collect()
}

/// Truncate each event's timestamp to its calendar date and keep only the
/// counts.  One output record per input event, in input order.
pub fn normalize_events(events: &[EventRecord]) -> Vec<NormalizedRecord> {
    events
        .iter()
        .map(|event| NormalizedRecord {
            date: event.launch_timestamp.date(),
            launched_count: event.launched_count,
            destroyed_count: event.destroyed_count,
        })
        .collect()
}

/// [`parse_events`] followed by [`normalize_events`].
pub fn normalize(table: &RawEventTable) -> Result<Vec<NormalizedRecord>> {
    let events = parse_events(table)?;
    let records = normalize_events(&events);
    debug!("Normalized {} events", records.len());
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_event(row: &[String], row_number: usize, columns: &EventColumns) -> Result<EventRecord> {
    let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
    let optional = |idx: Option<usize>| {
        idx.map(|i| cell(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let raw_ts = cell(columns.time_start);
    let launch_timestamp =
        parse_launch_timestamp(raw_ts).ok_or_else(|| DashboardError::InvalidTimestamp {
            row: row_number,
            value: raw_ts.to_string(),
        })?;

    Ok(EventRecord {
        launch_timestamp,
        launched_count: parse_count(cell(columns.launched), row_number, "launched")?,
        destroyed_count: parse_count(cell(columns.destroyed), row_number, "destroyed")?,
        model: optional(columns.model),
        launch_place: optional(columns.launch_place),
        target: optional(columns.target),
        carrier: optional(columns.carrier),
        destroyed_details: optional(columns.destroyed_details),
        source: optional(columns.source),
        time_end: optional(columns.time_end),
    })
}

/// Parse an integer count.  Whole-valued decimals such as `"12.0"` (how
/// spreadsheet exports write integer columns) are accepted; anything else,
/// including an empty cell, is an error.
fn parse_count(raw: &str, row: usize, column: &str) -> Result<i64> {
    let raw = raw.trim();
    let invalid = || DashboardError::InvalidCount {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    };

    if let Ok(n) = raw.parse::<i64>() {
        return Ok(n);
    }

    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_event_table_from;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn table(csv_text: &str) -> RawEventTable {
        read_event_table_from(csv_text.as_bytes()).unwrap()
    }

    const FULL: &str = "\
time_start,time_end,model,launch_place,target,launched,destroyed,carrier,destroyed_details,source
2022-02-24 05:00,2022-02-24 09:00,Kalibr,Black Sea,Odesa,5,1,ship,,kpszsu
2022-02-24 22:30,,Shahed-136/131,,,3,3,,Kyiv,kpszsu
2022-03-01,,,,,0,0,,,
";

    // ── locate ────────────────────────────────────────────────────────────────

    #[test]
    fn test_locate_full_header() {
        let cols = EventColumns::locate(&table(FULL)).unwrap();
        assert_eq!(cols.time_start, 0);
        assert_eq!(cols.launched, 5);
        assert_eq!(cols.destroyed, 6);
        assert_eq!(cols.time_end, Some(1));
        assert_eq!(cols.source, Some(9));
    }

    #[test]
    fn test_locate_minimal_header_with_aliases() {
        let t = table("launched_count,launch_timestamp,destroyed_count\n");
        let cols = EventColumns::locate(&t).unwrap();
        assert_eq!(cols.time_start, 1);
        assert_eq!(cols.launched, 0);
        assert_eq!(cols.destroyed, 2);
        assert!(cols.model.is_none());
    }

    #[test]
    fn test_locate_missing_timestamp_column() {
        let err = EventColumns::locate(&table("launched,destroyed\n")).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn(ref c) if c == "time_start"));
    }

    #[test]
    fn test_locate_missing_destroyed_column() {
        let err = EventColumns::locate(&table("time_start,launched\n")).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn(ref c) if c == "destroyed"));
    }

    // ── parse_events ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_events_keeps_descriptive_fields() {
        let events = parse_events(&table(FULL)).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].model.as_deref(), Some("Kalibr"));
        assert_eq!(events[0].carrier.as_deref(), Some("ship"));
        assert_eq!(events[1].destroyed_details.as_deref(), Some("Kyiv"));
        assert!(events[1].time_end.is_none(), "empty cells become None");
        assert!(events[2].source.is_none());
    }

    #[test]
    fn test_parse_events_invalid_timestamp_is_error() {
        let t = table("time_start,launched,destroyed\n2022-02-24,1,1\nsoon,2,2\n");
        let err = parse_events(&t).unwrap_err();
        match err {
            DashboardError::InvalidTimestamp { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_events_empty_timestamp_is_error() {
        let t = table("time_start,launched,destroyed\n,1,1\n");
        assert!(matches!(
            parse_events(&t),
            Err(DashboardError::InvalidTimestamp { row: 1, .. })
        ));
    }

    #[test]
    fn test_parse_events_empty_count_is_error() {
        let t = table("time_start,launched,destroyed\n2022-02-24,4,\n");
        match parse_events(&t).unwrap_err() {
            DashboardError::InvalidCount { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "destroyed");
                assert_eq!(value, "");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_events_non_numeric_count_is_error() {
        let t = table("time_start,launched,destroyed\n2022-02-24,several,1\n");
        assert!(matches!(
            parse_events(&t),
            Err(DashboardError::InvalidCount { ref column, .. }) if column == "launched"
        ));
    }

    #[test]
    fn test_parse_events_fractional_count_is_error() {
        let t = table("time_start,launched,destroyed\n2022-02-24,2.5,1\n");
        assert!(parse_events(&t).is_err());
    }

    #[test]
    fn test_parse_events_whole_decimal_count_accepted() {
        let t = table("time_start,launched,destroyed\n2022-02-24,12.0,7.0\n");
        let events = parse_events(&t).unwrap();
        assert_eq!(events[0].launched_count, 12);
        assert_eq!(events[0].destroyed_count, 7);
    }

    #[test]
    fn test_parse_events_negative_count_passes_through() {
        let t = table("time_start,launched,destroyed\n2022-02-24,-3,0\n");
        let events = parse_events(&t).unwrap();
        assert_eq!(events[0].launched_count, -3);
    }

    // ── normalize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_truncates_time_of_day() {
        let records = normalize(&table(FULL)).unwrap();
        assert_eq!(records.len(), 3, "one record per event, no dedup");
        assert_eq!(records[0].date, d("2022-02-24"));
        assert_eq!(records[1].date, d("2022-02-24"));
        assert_eq!(records[2].date, d("2022-03-01"));
    }

    #[test]
    fn test_normalize_preserves_counts_and_order() {
        let records = normalize(&table(FULL)).unwrap();
        let counts: Vec<(i64, i64)> = records
            .iter()
            .map(|r| (r.launched_count, r.destroyed_count))
            .collect();
        assert_eq!(counts, vec![(5, 1), (3, 3), (0, 0)]);
    }

    #[test]
    fn test_normalize_late_evening_stays_on_same_date() {
        let t = table("time_start,launched,destroyed\n2022-12-31 23:59,1,1\n");
        let records = normalize(&t).unwrap();
        assert_eq!(records[0].date, d("2022-12-31"));
    }

    #[test]
    fn test_normalize_empty_table() {
        let records = normalize(&table("time_start,launched,destroyed\n")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_normalize_header_only_missing_column_still_fails() {
        assert!(normalize(&table("time_start,launched\n")).is_err());
    }
}
