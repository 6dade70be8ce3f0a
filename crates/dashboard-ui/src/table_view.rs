//! Aggregate table views (daily / monthly).
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per period
//! plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::formatting;
use dashboard_core::models::{DailyAggregate, MonthlyAggregate};
use dashboard_data::aggregator::PeriodTotals;

use crate::themes::Theme;

/// Data for a single row in the aggregate table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    /// Period label, e.g. `"2022-10-10"` (daily) or `"2022-10"` (monthly).
    pub period: String,
    pub launched: i64,
    pub destroyed: i64,
    pub interception_rate: f64,
}

impl From<&DailyAggregate> for TableRowData {
    fn from(row: &DailyAggregate) -> Self {
        Self {
            period: row.date.format("%Y-%m-%d").to_string(),
            launched: row.launched_total,
            destroyed: row.destroyed_total,
            interception_rate: row.interception_rate,
        }
    }
}

impl From<&MonthlyAggregate> for TableRowData {
    fn from(row: &MonthlyAggregate) -> Self {
        Self {
            period: row.month_label.clone(),
            launched: row.launched_total,
            destroyed: row.destroyed_total,
            interception_rate: row.interception_rate,
        }
    }
}

/// Convert aggregate rows for display, newest last.
pub fn to_table_rows<'a, T>(rows: &'a [T]) -> Vec<TableRowData>
where
    TableRowData: From<&'a T>,
{
    rows.iter().map(TableRowData::from).collect()
}

/// Render the daily or monthly aggregate table into `area`.
///
/// The table has one data row per [`TableRowData`] entry, followed by a
/// highlighted totals row, all within a bordered block titled `title`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[TableRowData],
    totals: &PeriodTotals,
    theme: &Theme,
) {
    let header_cells = ["Period", "Launched", "Destroyed", "Rate"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.period.clone()),
                Cell::from(formatting::format_count(row.launched)),
                Cell::from(formatting::format_count(row.destroyed)),
                Cell::from(formatting::format_rate(row.interception_rate))
                    .style(theme.rate_style(row.interception_rate)),
            ])
            .style(style)
        })
        .collect();

    let total_row = Row::new(vec![
        Cell::from(format!("TOTAL ({})", totals.periods)),
        Cell::from(formatting::format_count(totals.launched_total)),
        Cell::from(formatting::format_count(totals.destroyed_total)),
        Cell::from(formatting::format_rate(totals.interception_rate)),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no data" placeholder when the selected range is empty.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No attacks in the selected range", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Widen the range with the arrow keys or press Home to reset.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ukraine Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
