//! Chart widgets: daily launched-vs-destroyed bars and the monthly
//! interception-rate line.

use ratatui::{
    layout::Rect,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use dashboard_core::formatting;
use dashboard_core::models::{DailyAggregate, MonthlyAggregate};

use crate::themes::Theme;

/// Width of a single bar in columns.
pub const BAR_WIDTH: u16 = 3;

/// Blank columns between two day groups.
pub const GROUP_GAP: u16 = 1;

/// The rate axis always spans the full percentage scale.
pub const RATE_AXIS_BOUNDS: [f64; 2] = [0.0, 100.0];

// ── Layout helpers ────────────────────────────────────────────────────────────

/// Number of day groups (two bars each) that fit in `inner_width` columns.
pub fn groups_that_fit(inner_width: u16) -> usize {
    let group_width = 2 * BAR_WIDTH + GROUP_GAP;
    ((inner_width + GROUP_GAP) / group_width) as usize
}

/// The most recent `capacity` rows, oldest first.
pub fn visible_window<T>(rows: &[T], capacity: usize) -> &[T] {
    let start = rows.len().saturating_sub(capacity);
    &rows[start..]
}

fn bar_value(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// One launched/destroyed bar pair per day.
pub fn day_groups<'a>(rows: &[DailyAggregate], theme: &Theme) -> Vec<BarGroup<'a>> {
    rows.iter()
        .map(|row| {
            let bars = [
                Bar::default()
                    .value(bar_value(row.launched_total))
                    .style(theme.bar_launched),
                Bar::default()
                    .value(bar_value(row.destroyed_total))
                    .style(theme.bar_destroyed),
            ];
            BarGroup::default()
                .label(Line::from(row.date.format("%m-%d").to_string()))
                .bars(&bars)
        })
        .collect()
}

/// `(month index, rate)` points for the line chart.
pub fn rate_points(rows: &[MonthlyAggregate]) -> Vec<(f64, f64)> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| (i as f64, row.interception_rate))
        .collect()
}

/// First, middle and last month labels for the x axis.
fn month_axis_labels<'a>(rows: &[MonthlyAggregate], theme: &Theme) -> Vec<Span<'a>> {
    match rows {
        [] => Vec::new(),
        [only] => vec![Span::styled(only.month_label.clone(), theme.axis)],
        [first, .., last] => {
            let middle = &rows[rows.len() / 2];
            vec![
                Span::styled(first.month_label.clone(), theme.axis),
                Span::styled(middle.month_label.clone(), theme.axis),
                Span::styled(last.month_label.clone(), theme.axis),
            ]
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Grouped bar chart of launched (left) vs destroyed (right) per day.
///
/// When the range holds more days than fit, the most recent ones are shown.
pub fn render_daily_bars(frame: &mut Frame, area: Rect, rows: &[DailyAggregate], theme: &Theme) {
    let capacity = groups_that_fit(area.width.saturating_sub(2));
    let shown = visible_window(rows, capacity);

    let title = Line::from(vec![
        Span::styled(" Daily: ", theme.chart_title),
        Span::styled("■ launched", theme.bar_launched),
        Span::styled("  ", theme.text),
        Span::styled("■ destroyed", theme.bar_destroyed),
        Span::styled(
            format!("  ({} of {} days) ", shown.len(), rows.len()),
            theme.dim,
        ),
    ]);

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        )
        .bar_width(BAR_WIDTH)
        .bar_gap(0)
        .group_gap(GROUP_GAP)
        .label_style(theme.label);

    for group in day_groups(shown, theme) {
        chart = chart.data(group);
    }

    frame.render_widget(chart, area);
}

/// Monthly interception rate as a line over a fixed 0–100 % axis.
pub fn render_rate_line(
    frame: &mut Frame,
    area: Rect,
    rows: &[MonthlyAggregate],
    theme: &Theme,
) {
    let points = rate_points(rows);
    let max_x = (points.len().saturating_sub(1) as f64).max(1.0);

    let latest = rows
        .last()
        .map(|row| format!(" latest {} ", formatting::format_rate(row.interception_rate)))
        .unwrap_or_default();

    let datasets = vec![Dataset::default()
        .name("interception rate")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.rate_line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(" Monthly interception rate ", theme.chart_title))
                .title_bottom(Span::styled(latest, theme.dim)),
        )
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, max_x])
                .labels(month_axis_labels(rows, theme)),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds(RATE_AXIS_BOUNDS)
                .labels(vec![
                    Span::styled("0%", theme.axis),
                    Span::styled("50%", theme.axis),
                    Span::styled("100%", theme.axis),
                ]),
        );

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
