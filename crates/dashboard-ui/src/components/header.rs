use crate::themes::Theme;
use dashboard_core::models::DateRange;
use ratatui::text::{Line, Span};

/// Marker placed either side of the application title.
pub const TITLE_MARKS: &str = "■ ■";

pub const TITLE: &str = "UKRAINE DASHBOARD";
pub const SUBTITLE: &str = "Missiles fired, intercepted, and interception rate";

/// Dashboard header rendering four lines:
///
/// 1. Application title (ALL CAPS) with markers.
/// 2. Subtitle.
/// 3. The selected range and where the data came from, as
///    `[ start → end | source ]`.
/// 4. A 60-column `=` separator.
pub struct Header<'a> {
    /// Currently selected range.
    pub range: DateRange,
    /// Short description of the dataset location.
    pub source: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(range: DateRange, source: &'a str, theme: &'a Theme) -> Self {
        Self {
            range,
            source,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(TITLE_MARKS, self.theme.header_accent),
                Span::styled(format!(" {TITLE} "), self.theme.header),
                Span::styled(TITLE_MARKS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(SUBTITLE, self.theme.label)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.range.start.to_string(), self.theme.value),
                Span::styled(" → ", self.theme.label),
                Span::styled(self.range.end.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.source, self.theme.dim),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
