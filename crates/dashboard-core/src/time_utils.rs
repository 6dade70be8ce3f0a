use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Timestamp layouts seen in published attack reports, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a launch timestamp into a naive local date-time.
///
/// Accepts the date-time layouts in [`DATETIME_FORMATS`] as well as a bare
/// `YYYY-MM-DD`, which is read as midnight.  Surrounding whitespace is
/// ignored.  Returns `None` for empty or unrecognised input.
pub fn parse_launch_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a user-supplied date (`YYYY-MM-DD` or `MM-DD-YYYY`).
///
/// Shaped for use as a `clap` value parser.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m-%d-%Y"))
        .map_err(|_| format!("invalid date {s:?}: expected YYYY-MM-DD or MM-DD-YYYY"))
}

// ── Calendar months ───────────────────────────────────────────────────────────

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one containing `date`.
///
/// Returns `None` only past the end of chrono's representable calendar.
pub fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    month_start(date).checked_add_months(Months::new(1))
}

/// Every month start from the month of `first` through the month of `last`,
/// inclusive.  Empty when `first` falls in a later month than `last`.
pub fn months_spanned(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let end = month_start(last);
    let mut months = Vec::new();
    let mut cursor = Some(month_start(first));

    while let Some(month) = cursor {
        if month > end {
            break;
        }
        months.push(month);
        cursor = next_month_start(month);
    }

    months
}

/// Fixed-width `"YYYY-MM"` label for the month containing `date`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Shift `date` by whole months, clamping the day to the target month's
/// length (Jan 31 + 1 month → Feb 28/29).  Saturates at chrono's limits.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Shift `date` by whole days.  Saturates at chrono's limits.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
