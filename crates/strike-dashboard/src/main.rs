mod bootstrap;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::export::ExportDocument;
use dashboard_runtime::data_manager::DataManager;
use dashboard_runtime::fetch::{DatasetSource, DirectorySource, ExplicitFileSource};
use dashboard_ui::app::{App, ViewMode};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();
    settings.validate()?;

    bootstrap::ensure_directories()?;

    // The JSON export owns stdout; the TUI owns the whole terminal.
    let log_file = match (&settings.log_file, settings.view.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "json") => None,
        (None, _) => Some(bootstrap::default_log_file()),
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_ref())?;

    tracing::info!("Strike dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Theme: {}", settings.view, settings.theme);

    let source = build_source(&settings)?;
    let description = source.describe();
    let mut manager = DataManager::new(source);

    let result = manager
        .fetch()
        .with_context(|| format!("failed to load dataset from {description}"))?;
    tracing::info!(
        "Loaded {} rows into {} days and {} months",
        result.metadata.rows_processed,
        result.metadata.days,
        result.metadata.months
    );

    let range = manager.resolve_range(settings.start, settings.end)?;
    tracing::info!("Range: {} to {}", range.start, range.end);

    if settings.view == "json" {
        let tables = manager.filtered(&range)?;
        println!("{}", ExportDocument::new(range, tables).to_json()?);
        return Ok(());
    }

    let app = App::new(
        manager,
        range,
        &settings.theme,
        ViewMode::from_name(&settings.view),
    );

    tokio::task::spawn_blocking(move || app.run())
        .await
        .context("dashboard event loop panicked")??;
    tracing::info!("Dashboard closed");

    Ok(())
}

/// Pick the dataset source: `--data-file`, then `--data-dir`, then discovery.
fn build_source(settings: &Settings) -> Result<Box<dyn DatasetSource>> {
    if let Some(path) = &settings.data_file {
        return Ok(Box::new(ExplicitFileSource::new(path)));
    }
    if let Some(dir) = &settings.data_dir {
        return Ok(Box::new(DirectorySource::new(dir)));
    }

    let cwd = std::env::current_dir()?;
    let dir = bootstrap::discover_data_dir(&cwd).context(
        "no data directory found; pass --data-file or --data-dir, \
         or place missile_attacks_daily.csv or the dataset .zip \
         under ./data or ~/.strike-dashboard/data",
    )?;
    Ok(Box::new(DirectorySource::new(dir)))
}
