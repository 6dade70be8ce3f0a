//! Locating the attacks dataset on disk.
//!
//! A [`DatasetSource`] resolves to the path of a local CSV file.  The data
//! manager asks its source for a path on every fetch, so a file dropped into
//! the data directory between refreshes is picked up.
//!
//! The dataset is published as a zip archive.  Sources that meet an archive
//! instead of a CSV extract the daily-attacks member next to it.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use dashboard_core::error::{DashboardError, Result};
use tracing::{debug, warn};

/// File-name suffix of the daily attacks CSV inside the published archive.
pub const DATASET_FILE_NAME: &str = "missile_attacks_daily.csv";

/// Extension of the published dataset archive.
pub const ARCHIVE_EXTENSION: &str = "zip";

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
        .unwrap_or(false)
}

// ── Archive extraction ────────────────────────────────────────────────────────

/// Extract the daily-attacks CSV from `archive` into `dest_dir`.
///
/// The member is matched by its name ending in [`DATASET_FILE_NAME`]; when
/// several match, the shallowest wins.  The CSV is written as
/// `dest_dir/missile_attacks_daily.csv`, replacing any previous copy.
pub fn extract_dataset(archive: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let archive_err = |message: String| DashboardError::Archive {
        path: archive.to_path_buf(),
        message,
    };

    let file = File::open(archive).map_err(|source| DashboardError::FileRead {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| archive_err(e.to_string()))?;

    let member = zip
        .file_names()
        .filter(|name| !name.ends_with('/') && name.ends_with(DATASET_FILE_NAME))
        .min_by_key(|name| (name.matches('/').count(), name.to_string()))
        .map(str::to_owned)
        .ok_or_else(|| DashboardError::DatasetNotFound(archive.to_path_buf()))?;

    let mut entry = zip
        .by_name(&member)
        .map_err(|e| archive_err(e.to_string()))?;

    fs::create_dir_all(dest_dir)?;
    let dest = dest_dir.join(DATASET_FILE_NAME);
    let partial = dest_dir.join(format!("{DATASET_FILE_NAME}.part"));
    {
        let mut out = File::create(&partial)?;
        io::copy(&mut entry, &mut out)?;
    }
    fs::rename(&partial, &dest)?;

    debug!(
        "Extracted {} from {} into {}",
        member,
        archive.display(),
        dest.display()
    );
    Ok(dest)
}

// ── DatasetSource ─────────────────────────────────────────────────────────────

/// Something that can produce the path of the dataset CSV.
pub trait DatasetSource: Send {
    /// Resolve the dataset to a readable local file.
    fn locate(&self) -> Result<PathBuf>;

    /// Short human-readable description for logs and the header.
    fn describe(&self) -> String;
}

// ── ExplicitFileSource ────────────────────────────────────────────────────────

/// A CSV path given directly on the command line.
///
/// A `.zip` path is treated as the published archive and extracted into its
/// own directory on every fetch.
#[derive(Debug, Clone)]
pub struct ExplicitFileSource {
    path: PathBuf,
}

impl ExplicitFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for ExplicitFileSource {
    fn locate(&self) -> Result<PathBuf> {
        if !self.path.is_file() {
            return Err(DashboardError::DatasetNotFound(self.path.clone()));
        }
        if is_archive(&self.path) {
            let dest_dir = self
                .path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            return extract_dataset(&self.path, dest_dir);
        }
        Ok(self.path.clone())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ── DirectorySource ───────────────────────────────────────────────────────────

/// Searches a directory tree for a file named like [`DATASET_FILE_NAME`].
///
/// Unpacked archives often nest the CSV one or two levels down, so the walk
/// is recursive.  When several candidates exist the shallowest wins, ties
/// broken by path order.  With no CSV anywhere under the root, `.zip` files
/// are tried in the same order and the first one holding the dataset is
/// extracted into the root.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dataset CSVs and archives under the root, each shallowest first.
    fn candidates(&self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut csvs: Vec<(usize, PathBuf)> = Vec::new();
        let mut archives: Vec<(usize, PathBuf)> = Vec::new();

        for entry in walkdir::WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            let is_csv = entry
                .file_name()
                .to_str()
                .map(|name| name.ends_with(DATASET_FILE_NAME))
                .unwrap_or(false);
            if is_csv {
                csvs.push((entry.depth(), entry.into_path()));
            } else if is_archive(entry.path()) {
                archives.push((entry.depth(), entry.into_path()));
            }
        }

        csvs.sort();
        archives.sort();
        (
            csvs.into_iter().map(|(_, path)| path).collect(),
            archives.into_iter().map(|(_, path)| path).collect(),
        )
    }
}

impl DatasetSource for DirectorySource {
    fn locate(&self) -> Result<PathBuf> {
        if !self.root.is_dir() {
            warn!("Data directory does not exist: {}", self.root.display());
            return Err(DashboardError::DatasetNotFound(self.root.clone()));
        }

        let (csvs, archives) = self.candidates();
        debug!(
            "Found {} dataset candidate(s) and {} archive(s) under {}",
            csvs.len(),
            archives.len(),
            self.root.display()
        );

        if let Some(path) = csvs.into_iter().next() {
            return Ok(path);
        }

        for archive in archives {
            match extract_dataset(&archive, &self.root) {
                Ok(path) => return Ok(path),
                Err(e) => warn!("Skipping archive {}: {}", archive.display(), e),
            }
        }

        Err(DashboardError::DatasetNotFound(self.root.clone()))
    }

    fn describe(&self) -> String {
        format!("{} (search)", self.root.display())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
