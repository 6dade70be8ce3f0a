//! Display helpers used at the presentation boundary.
//!
//! The pipeline keeps interception rates as raw `f64` percentages; rounding
//! and the `%` suffix are applied only here.

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // "0.50" -> ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a launched/destroyed count with thousands separators.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_count;
///
/// assert_eq!(format_count(8), "8");
/// assert_eq!(format_count(12_345), "12,345");
/// assert_eq!(format_count(-3), "-3");
/// ```
pub fn format_count(count: i64) -> String {
    let grouped = group_thousands(&count.unsigned_abs().to_string());
    if count < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format an interception rate with one decimal place and a `%` suffix.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_rate;
///
/// assert_eq!(format_rate(50.0), "50.0%");
/// assert_eq!(format_rate(83.3333), "83.3%");
/// assert_eq!(format_rate(0.0), "0.0%");
/// ```
pub fn format_rate(rate: f64) -> String {
    format!("{}%", format_number(rate, 1))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
