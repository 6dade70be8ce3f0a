use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single launch event as read from the attacks dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// When the attack started (local wall-clock time as published).
    pub launch_timestamp: NaiveDateTime,
    /// Number of missiles/drones launched.
    pub launched_count: i64,
    /// Number of missiles/drones destroyed.
    pub destroyed_count: i64,
    /// Weapon model, e.g. `"Shahed-136/131"`.
    #[serde(default)]
    pub model: Option<String>,
    /// Where the launch originated.
    #[serde(default)]
    pub launch_place: Option<String>,
    /// Targeted region.
    #[serde(default)]
    pub target: Option<String>,
    /// Launch platform.
    #[serde(default)]
    pub carrier: Option<String>,
    /// Free-text breakdown of where objects were destroyed.
    #[serde(default)]
    pub destroyed_details: Option<String>,
    /// Publisher of the report.
    #[serde(default)]
    pub source: Option<String>,
    /// Raw end-of-attack timestamp, kept verbatim.
    #[serde(default)]
    pub time_end: Option<String>,
}

/// An event reduced to the fields the aggregators consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub date: NaiveDate,
    pub launched_count: i64,
    pub destroyed_count: i64,
}

/// One calendar day of summed launch activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub launched_total: i64,
    pub destroyed_total: i64,
    /// Percentage in `[0, 100]` for consistent input; `0.0` on zero-launch days.
    pub interception_rate: f64,
}

/// One calendar month of summed launch activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// First day of the month; the bucket key.
    pub month_start: NaiveDate,
    /// Fixed-width `"YYYY-MM"` label.
    pub month_label: String,
    pub launched_total: i64,
    pub destroyed_total: i64,
    pub interception_rate: f64,
}

/// Read access to the summed counts of an aggregate row.
pub trait PeriodCounts {
    fn launched_total(&self) -> i64;
    fn destroyed_total(&self) -> i64;
}

impl PeriodCounts for DailyAggregate {
    fn launched_total(&self) -> i64 {
        self.launched_total
    }

    fn destroyed_total(&self) -> i64 {
        self.destroyed_total
    }
}

impl PeriodCounts for MonthlyAggregate {
    fn launched_total(&self) -> i64 {
        self.launched_total
    }

    fn destroyed_total(&self) -> i64 {
        self.destroyed_total
    }
}

/// Interception rate as a percentage.
///
/// Returns `0.0` whenever `launched` is not positive: a day without launches
/// carries no signal and must not be read as "nothing intercepted".
pub fn interception_rate(launched: i64, destroyed: i64) -> f64 {
    if launched > 0 {
        destroyed as f64 / launched as f64 * 100.0
    } else {
        0.0
    }
}

/// An inclusive `[start, end]` calendar-date range.
///
/// A range with `start > end` is representable and simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `true` when `date` lies within the range, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `true` when the range cannot contain any date.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Pull both ends inside `bounds`.
    ///
    /// Ordering between `start` and `end` is preserved as given; an inverted
    /// range stays inverted (and therefore empty).
    pub fn clamp_to(&self, bounds: &DateRange) -> DateRange {
        DateRange {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
