//! Dataset store
//!
//! Loads the immutable per-year datasets from `<base_dir>/<year>.json`.
//! Every path is resolved and checked to sit directly inside the base
//! directory before it is opened.

use crate::error::{PoyaError, PoyaResult};
use crate::holiday::YearDataset;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, error, warn};

/// File-backed source of yearly datasets
#[derive(Debug)]
pub struct DataStore {
    base_dir: PathBuf,
    reads: AtomicU64,
}

impl DataStore {
    /// Create a store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            reads: AtomicU64::new(0),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Number of dataset file reads attempted so far
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// File name of a year's dataset
    pub fn file_name(year: i32) -> String {
        format!("{}.json", year)
    }

    /// Resolve `file_name` under the base directory
    ///
    /// Symlinks and `..` segments are resolved first; the result must be a
    /// direct child of the canonical base directory or the path is rejected.
    /// The file itself does not have to exist.
    pub async fn guarded_path(&self, file_name: &str) -> PoyaResult<PathBuf> {
        let candidate = self.base_dir.join(file_name);
        let base = canonicalize(&self.base_dir).await?;

        let resolved = match fs::canonicalize(&candidate).await {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let (parent, name) = match (candidate.parent(), candidate.file_name()) {
                    (Some(parent), Some(name)) => (parent, name),
                    _ => return Err(reject(&candidate)),
                };
                canonicalize(parent).await?.join(name)
            }
            Err(e) => {
                return Err(PoyaError::io(
                    format!("resolving {}", candidate.display()),
                    e,
                ))
            }
        };

        if resolved.parent() != Some(base.as_path()) {
            return Err(reject(&candidate));
        }
        Ok(resolved)
    }

    /// Load the dataset for `year`
    ///
    /// A missing file is `YearNotFound`; a file that is not a JSON array
    /// is `DatasetCorrupt`.
    pub async fn load(&self, year: i32) -> PoyaResult<YearDataset> {
        let path = self
            .guarded_path(&Self::file_name(year))
            .await
            .map_err(|e| missing_as_not_found(e, year))?;

        self.reads.fetch_add(1, Ordering::Relaxed);
        debug!("Reading dataset for {} from {}", year, path.display());

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!("Data file not found for year {}", year);
                return Err(PoyaError::YearNotFound(year));
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                error!("Data file for year {} is not valid UTF-8", year);
                return Err(PoyaError::DatasetCorrupt {
                    year,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                return Err(PoyaError::io(
                    format!("reading dataset {}", path.display()),
                    e,
                ))
            }
        };

        YearDataset::from_json(year, &content).map_err(|e| {
            error!("Invalid JSON format in file for year {}: {}", year, e);
            PoyaError::DatasetCorrupt {
                year,
                reason: e.to_string(),
            }
        })
    }

    /// Whether a dataset file exists for `year`, without reading it
    pub async fn has_year(&self, year: i32) -> PoyaResult<bool> {
        let path = match self.guarded_path(&Self::file_name(year)).await {
            Ok(path) => path,
            Err(e) => match missing_as_not_found(e, year) {
                PoyaError::YearNotFound(_) => return Ok(false),
                other => return Err(other),
            },
        };
        Ok(fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false))
    }
}

async fn canonicalize(path: &Path) -> PoyaResult<PathBuf> {
    fs::canonicalize(path)
        .await
        .map_err(|e| PoyaError::io(format!("resolving {}", path.display()), e))
}

fn reject(candidate: &Path) -> PoyaError {
    warn!("Invalid file path received: {}", candidate.display());
    PoyaError::PathRejected(candidate.to_path_buf())
}

/// A missing base directory means no year has data
fn missing_as_not_found(err: PoyaError, year: i32) -> PoyaError {
    match err {
        PoyaError::Io { ref source, .. } if source.kind() == ErrorKind::NotFound => {
            PoyaError::YearNotFound(year)
        }
        other => other,
    }
}
