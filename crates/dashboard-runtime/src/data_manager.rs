//! Owner of the loaded dataset.
//!
//! Wraps a [`DatasetSource`] and the pipeline with an explicit
//! [`DatasetState`]: nothing is read until [`DataManager::fetch`] is called,
//! and views requested before that fail with [`DashboardError::NotLoaded`].
//! A failed [`DataManager::refresh`] keeps the previously loaded tables.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::DateRange;
use dashboard_data::aggregator::AggregateTables;
use dashboard_data::pipeline::{run_pipeline_from_path, PipelineResult};
use tracing::{debug, info, warn};

use crate::fetch::DatasetSource;

// ── DatasetState ──────────────────────────────────────────────────────────────

/// Whether the dataset has been fetched and run through the pipeline.
#[derive(Debug, Clone)]
pub enum DatasetState {
    NotFetched,
    Loaded {
        /// File the tables were built from.
        path: PathBuf,
        result: PipelineResult,
    },
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Loads the dataset on demand and serves range-filtered views of it.
///
/// # Example
/// ```no_run
/// use dashboard_runtime::data_manager::DataManager;
/// use dashboard_runtime::fetch::DirectorySource;
///
/// let mut mgr = DataManager::new(Box::new(DirectorySource::new("data")));
/// mgr.fetch().unwrap();
/// let range = mgr.resolve_range(None, None).unwrap();
/// let view = mgr.filtered(&range).unwrap();
/// println!("{} days", view.daily.len());
/// ```
pub struct DataManager {
    source: Box<dyn DatasetSource>,
    state: DatasetState,
}

impl DataManager {
    pub fn new(source: Box<dyn DatasetSource>) -> Self {
        Self {
            source,
            state: DatasetState::NotFetched,
        }
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Locate the dataset and run the full pipeline over it.
    ///
    /// On error the current state is left untouched and the error returned.
    pub fn fetch(&mut self) -> Result<&PipelineResult> {
        let path = self.source.locate()?;
        info!("Loading dataset from {}", path.display());

        let result = run_pipeline_from_path(&path)?;
        debug!(
            rows = result.metadata.rows_processed,
            days = result.metadata.days,
            months = result.metadata.months,
            "dataset loaded"
        );

        self.state = DatasetState::Loaded { path, result };
        let DatasetState::Loaded { result, .. } = &self.state else {
            unreachable!("state was just set to Loaded")
        };
        Ok(result)
    }

    /// Re-read the source and rebuild every table.
    pub fn refresh(&mut self) -> Result<&PipelineResult> {
        if !self.is_loaded() {
            debug!("refresh requested before first fetch");
        }
        match self.fetch() {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(error = %e, "refresh failed; keeping previous tables");
                Err(e)
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &DatasetState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, DatasetState::Loaded { .. })
    }

    /// The full pipeline result, `None` before the first fetch.
    pub fn result(&self) -> Option<&PipelineResult> {
        match &self.state {
            DatasetState::Loaded { result, .. } => Some(result),
            DatasetState::NotFetched => None,
        }
    }

    /// Path the current tables were read from.
    pub fn loaded_path(&self) -> Option<&Path> {
        match &self.state {
            DatasetState::Loaded { path, .. } => Some(path),
            DatasetState::NotFetched => None,
        }
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// First and last date of the loaded data.
    ///
    /// `None` before a fetch and for an empty dataset.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.result().and_then(PipelineResult::date_bounds)
    }

    // ── Views ─────────────────────────────────────────────────────────────

    /// Daily and monthly tables restricted to `range`.
    pub fn filtered(&self, range: &DateRange) -> Result<AggregateTables> {
        let result = self.result().ok_or(DashboardError::NotLoaded)?;
        Ok(result.view(range))
    }

    /// Turn optional user bounds into a concrete range.
    ///
    /// Missing ends default to the dataset's first and last date.  A range
    /// that overlaps the data is clamped into its bounds; an inverted range or
    /// one lying entirely outside the data is returned as given, so filtering
    /// it yields nothing.  For an empty dataset missing ends fall back to the
    /// widest representable dates.
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateRange> {
        if !self.is_loaded() {
            return Err(DashboardError::NotLoaded);
        }

        let Some(bounds) = self.date_bounds() else {
            return Ok(DateRange::new(
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            ));
        };

        let requested = DateRange::new(start.unwrap_or(bounds.start), end.unwrap_or(bounds.end));
        let overlaps = requested.start <= bounds.end && requested.end >= bounds.start;

        if requested.is_empty() || !overlaps {
            debug!(
                "Range {}..={} has no overlap with data {}..={}",
                requested.start, requested.end, bounds.start, bounds.end
            );
            return Ok(requested);
        }

        Ok(requested.clamp_to(&bounds))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{DirectorySource, ExplicitFileSource, DATASET_FILE_NAME};
    use std::fs;
    use tempfile::TempDir;

    const SCENARIO: &str = "\
time_start,time_end,model,launched,destroyed
2022-02-24 04:50,,Kalibr,5,1
2022-02-24 21:10,,Iskander-M,3,3
2022-03-01 03:00,,,0,0
";

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Manager over a temp dir holding `csv_text`; keep the TempDir alive.
    fn make_manager_with_dir(csv_text: &str) -> (DataManager, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join(DATASET_FILE_NAME), csv_text).unwrap();
        let mgr = DataManager::new(Box::new(DirectorySource::new(dir.path())));
        (mgr, dir)
    }

    // ── loaded flag ───────────────────────────────────────────────────────

    #[test]
    fn test_not_loaded_before_fetch() {
        let (mgr, _dir) = make_manager_with_dir(SCENARIO);
        assert!(!mgr.is_loaded());
        assert!(mgr.result().is_none());
        assert!(mgr.loaded_path().is_none());
        assert!(matches!(mgr.state(), DatasetState::NotFetched));

        let range = DateRange::new(d("2022-02-24"), d("2022-03-01"));
        assert!(matches!(
            mgr.filtered(&range),
            Err(DashboardError::NotLoaded)
        ));
        assert!(matches!(
            mgr.resolve_range(None, None),
            Err(DashboardError::NotLoaded)
        ));
    }

    #[test]
    fn test_fetch_loads_tables() {
        let (mut mgr, dir) = make_manager_with_dir(SCENARIO);
        let result = mgr.fetch().unwrap();
        assert_eq!(result.tables.daily.len(), 2);
        assert_eq!(result.tables.monthly.len(), 2);

        assert!(mgr.is_loaded());
        assert_eq!(
            mgr.loaded_path(),
            Some(dir.path().join(DATASET_FILE_NAME).as_path())
        );
        assert_eq!(
            mgr.date_bounds(),
            Some(DateRange::new(d("2022-02-24"), d("2022-03-01")))
        );
    }

    #[test]
    fn test_fetch_returns_stored_result() {
        let (mut mgr, _dir) = make_manager_with_dir(SCENARIO);
        let generated_at = mgr.fetch().unwrap().metadata.generated_at.clone();
        assert_eq!(
            mgr.result().map(|r| r.metadata.generated_at.as_str()),
            Some(generated_at.as_str())
        );
        assert!(matches!(mgr.state(), DatasetState::Loaded { .. }));
    }

    #[test]
    fn test_fetch_missing_dataset_propagates() {
        let dir = TempDir::new().unwrap();
        let mut mgr = DataManager::new(Box::new(ExplicitFileSource::new(
            dir.path().join("absent.csv"),
        )));
        assert!(matches!(
            mgr.fetch(),
            Err(DashboardError::DatasetNotFound(_))
        ));
        assert!(!mgr.is_loaded());
    }

    #[test]
    fn test_fetch_malformed_dataset_propagates() {
        let (mut mgr, _dir) = make_manager_with_dir("time_start,launched\n2022-02-24,5\n");
        assert!(matches!(
            mgr.fetch(),
            Err(DashboardError::MissingColumn(_))
        ));
        assert!(!mgr.is_loaded());
    }

    // ── refresh ───────────────────────────────────────────────────────────

    #[test]
    fn test_refresh_picks_up_new_rows() {
        let (mut mgr, dir) = make_manager_with_dir(SCENARIO);
        mgr.fetch().unwrap();

        let mut extended = SCENARIO.to_string();
        extended.push_str("2022-03-02 10:00,,Kh-101,10,9\n");
        fs::write(dir.path().join(DATASET_FILE_NAME), extended).unwrap();

        let result = mgr.refresh().unwrap();
        assert_eq!(result.tables.daily.len(), 3);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_state() {
        let (mut mgr, dir) = make_manager_with_dir(SCENARIO);
        mgr.fetch().unwrap();

        fs::write(
            dir.path().join(DATASET_FILE_NAME),
            "time_start,launched,destroyed\nnot-a-date,1,1\n",
        )
        .unwrap();

        assert!(matches!(
            mgr.refresh(),
            Err(DashboardError::InvalidTimestamp { row: 1, .. })
        ));
        assert!(mgr.is_loaded());
        assert_eq!(mgr.result().unwrap().tables.daily.len(), 2);
    }

    // ── filtered ──────────────────────────────────────────────────────────

    #[test]
    fn test_filtered_single_day() {
        let (mut mgr, _dir) = make_manager_with_dir(SCENARIO);
        mgr.fetch().unwrap();

        let view = mgr
            .filtered(&DateRange::new(d("2022-03-01"), d("2022-03-01")))
            .unwrap();
        assert_eq!(view.daily.len(), 1);
        assert_eq!(view.daily[0].date, d("2022-03-01"));
        assert_eq!(view.daily[0].launched_total, 0);
        assert_eq!(view.daily[0].interception_rate, 0.0);
    }

    // ── resolve_range ─────────────────────────────────────────────────────

    #[test]
    fn test_resolve_range_defaults_to_bounds() {
        let (mut mgr, _dir) = make_manager_with_dir(SCENARIO);
        mgr.fetch().unwrap();
        assert_eq!(
            mgr.resolve_range(None, None).unwrap(),
            DateRange::new(d("2022-02-24"), d("2022-03-01"))
        );
        assert_eq!(
            mgr.resolve_range(Some(d("2022-02-28")), None).unwrap(),
            DateRange::new(d("2022-02-28"), d("2022-03-01"))
        );
    }

    #[test]
    fn test_resolve_range_clamps_overlapping() {
        let (mut mgr, _dir) = make_manager_with_dir(SCENARIO);
        mgr.fetch().unwrap();
        assert_eq!(
            mgr.resolve_range(Some(d("2022-01-01")), Some(d("2022-12-31")))
                .unwrap(),
            DateRange::new(d("2022-02-24"), d("2022-03-01"))
        );
    }

    #[test]
    fn test_resolve_range_outside_data_stays_empty() {
        let (mut mgr, _dir) = make_manager_with_dir(SCENARIO);
        mgr.fetch().unwrap();

        let after = mgr
            .resolve_range(Some(d("2030-01-01")), Some(d("2030-12-31")))
            .unwrap();
        assert!(mgr.filtered(&after).unwrap().is_empty());

        let inverted = mgr
            .resolve_range(Some(d("2022-03-01")), Some(d("2022-02-24")))
            .unwrap();
        assert!(inverted.is_empty());
        assert!(mgr.filtered(&inverted).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_range_empty_dataset() {
        let (mut mgr, _dir) = make_manager_with_dir("time_start,launched,destroyed\n");
        mgr.fetch().unwrap();
        assert!(mgr.date_bounds().is_none());

        let range = mgr.resolve_range(None, Some(d("2022-03-01"))).unwrap();
        assert_eq!(range.end, d("2022-03-01"));
        assert!(mgr.filtered(&range).unwrap().is_empty());
    }
}
