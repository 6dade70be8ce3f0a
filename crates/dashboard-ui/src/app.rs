//! Main application state and TUI event loop for the strike dashboard.
//!
//! [`App`] owns the theme, the view mode, the [`DataManager`] and the
//! currently selected date range.  Every range change re-runs the range
//! filter over the loaded tables; `r` re-fetches the dataset and rebuilds
//! them from scratch.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{error, info};

use dashboard_core::models::DateRange;
use dashboard_core::time_utils::{shift_days, shift_months};
use dashboard_data::aggregator::{AggregateTables, Aggregator};
use dashboard_runtime::data_manager::DataManager;

use crate::charts;
use crate::components::header::Header;
use crate::table_view::{self, to_table_rows};
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Charts plus both tables.
    Dashboard,
    /// Daily aggregate table only.
    Daily,
    /// Monthly rate chart and table.
    Monthly,
}

impl ViewMode {
    /// Parse a `--view` value.  Unknown names fall back to the dashboard.
    pub fn from_name(name: &str) -> Self {
        match name {
            "daily" => Self::Daily,
            "monthly" => Self::Monthly,
            _ => Self::Dashboard,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }

    /// The view `Tab` switches to.
    pub fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Daily,
            Self::Daily => Self::Monthly,
            Self::Monthly => Self::Dashboard,
        }
    }
}

/// One-line message shown at the bottom of the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

/// Which end of the range a key moves.
#[derive(Debug, Clone, Copy)]
enum RangeEnd {
    Start,
    End,
}

const KEY_HINTS: &str = "←/→ start  ↓/↑ end  Shift=month  Home reset  Tab view  r reload  q quit";

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Current view mode.
    pub view_mode: ViewMode,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    manager: DataManager,
    range: DateRange,
    view: AggregateTables,
    status: Option<StatusMessage>,
}

impl App {
    /// Construct the app over an already-fetched manager.
    ///
    /// `range` is usually the output of [`DataManager::resolve_range`].
    pub fn new(manager: DataManager, range: DateRange, theme_name: &str, view_mode: ViewMode) -> Self {
        let mut app = Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            should_quit: false,
            manager,
            range,
            view: AggregateTables::default(),
            status: None,
        };
        app.apply_filter();
        app
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// The tables currently on screen.
    pub fn view(&self) -> &AggregateTables {
        &self.view
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout, so the loop
    /// blocks its thread; async callers should run it via `spawn_blocking`.
    /// The terminal is restored even when drawing fails.  Raw mode delivers
    /// Ctrl+C as a key press, handled like `q`.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let by_month = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Left => self.move_range(RangeEnd::Start, -1, by_month),
            KeyCode::Right => self.move_range(RangeEnd::Start, 1, by_month),
            KeyCode::Down => self.move_range(RangeEnd::End, -1, by_month),
            KeyCode::Up => self.move_range(RangeEnd::End, 1, by_month),
            KeyCode::Home => self.reset_range(),
            KeyCode::Tab => self.view_mode = self.view_mode.next(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh(),
            _ => {}
        }
    }

    // ── State transitions ─────────────────────────────────────────────────────

    fn move_range(&mut self, which: RangeEnd, step: i64, by_month: bool) {
        let Some(bounds) = self.manager.date_bounds() else {
            return;
        };

        let shift = |date: NaiveDate| -> NaiveDate {
            let moved = if by_month {
                shift_months(date, step as i32)
            } else {
                shift_days(date, step)
            };
            moved.clamp(bounds.start, bounds.end)
        };

        match which {
            RangeEnd::Start => self.range.start = shift(self.range.start),
            RangeEnd::End => self.range.end = shift(self.range.end),
        }
        self.status = None;
        self.apply_filter();
    }

    fn reset_range(&mut self) {
        if let Some(bounds) = self.manager.date_bounds() {
            self.range = bounds;
            self.status = Some(StatusMessage::Info("Range reset to full dataset".to_string()));
            self.apply_filter();
        }
    }

    fn refresh(&mut self) {
        match self.manager.refresh() {
            Ok(result) => {
                let days = result.metadata.days;
                info!("Dataset reloaded: {} days", days);
                if let Some(bounds) = self.manager.date_bounds() {
                    if !self.range.is_empty() {
                        self.range = self.range.clamp_to(&bounds);
                    }
                }
                self.status = Some(StatusMessage::Info(format!("Reloaded {days} days")));
            }
            Err(e) => {
                error!("Failed to reload dataset: {}", e);
                self.status = Some(StatusMessage::Error(format!("Reload failed: {e}")));
            }
        }
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        match self.manager.filtered(&self.range) {
            Ok(view) => self.view = view,
            Err(e) => {
                error!("Failed to filter dataset: {}", e);
                self.view = AggregateTables::default();
                self.status = Some(StatusMessage::Error(e.to_string()));
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, body, status_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let source = self
            .manager
            .loaded_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| self.manager.source_description());
        let header = Header::new(self.range, &source, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        if self.view.daily.is_empty() {
            table_view::render_no_data(frame, body, &self.theme);
        } else {
            match self.view_mode {
                ViewMode::Dashboard => self.render_dashboard(frame, body),
                ViewMode::Daily => self.render_daily_table(frame, body),
                ViewMode::Monthly => self.render_monthly(frame, body),
            }
        }

        frame.render_widget(Paragraph::new(self.status_line()), status_area);
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let [bars, line, tables] = Layout::vertical([
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Min(0),
        ])
        .areas(area);
        let [daily_table, monthly_table] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(tables);

        charts::render_daily_bars(frame, bars, &self.view.daily, &self.theme);
        charts::render_rate_line(frame, line, &self.view.monthly, &self.theme);
        self.render_daily_table(frame, daily_table);
        self.render_monthly_table(frame, monthly_table);
    }

    fn render_monthly(&self, frame: &mut Frame, area: Rect) {
        let [line, table] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Min(0)]).areas(area);
        charts::render_rate_line(frame, line, &self.view.monthly, &self.theme);
        self.render_monthly_table(frame, table);
    }

    /// Daily table showing the most recent days that fit; totals cover all.
    fn render_daily_table(&self, frame: &mut Frame, area: Rect) {
        let capacity = table_capacity(area);
        let rows = to_table_rows(charts::visible_window(&self.view.daily, capacity));
        let totals = Aggregator::calculate_totals(&self.view.daily);
        table_view::render_table_view(frame, area, "Daily", &rows, &totals, &self.theme);
    }

    fn render_monthly_table(&self, frame: &mut Frame, area: Rect) {
        let capacity = table_capacity(area);
        let rows = to_table_rows(charts::visible_window(&self.view.monthly, capacity));
        let totals = Aggregator::calculate_totals(&self.view.monthly);
        table_view::render_table_view(frame, area, "Monthly", &rows, &totals, &self.theme);
    }

    fn status_line(&self) -> Line<'_> {
        let mut spans = vec![
            Span::styled(format!("[{}] ", self.view_mode.name()), self.theme.info),
            Span::styled(KEY_HINTS, self.theme.dim),
        ];
        match &self.status {
            Some(StatusMessage::Info(msg)) => {
                spans.push(Span::styled(format!("  {msg}"), self.theme.success));
            }
            Some(StatusMessage::Error(msg)) => {
                spans.push(Span::styled(format!("  {msg}"), self.theme.error));
            }
            None => {}
        }
        Line::from(spans)
    }
}

/// Data rows that fit in a bordered table: borders, header and totals take 4.
fn table_capacity(area: Rect) -> usize {
    area.height.saturating_sub(4) as usize
}

// ── Tests ──────────────────────────────────────────────────────────────────────
