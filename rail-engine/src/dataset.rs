//! Dataset directory discovery (spec.md §6 "Dataset directory").
//!
//! A dataset directory is a flat collection of UTF-8 JSON line documents.
//! This module only discovers file paths and reads their bytes; parsing and
//! validation is `crate::loader`'s job, keeping transport separate from
//! conversion.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Error walking a dataset directory.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset directory does not exist: {0}")]
    NotFound(PathBuf),

    #[error("dataset path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read dataset directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Recognized line-document file extensions (spec.md §6): `.json` and
/// `.json.backup` are loaded equivalently; anything else is ignored.
fn is_recognized(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };
    name.ends_with(".json") || name.ends_with(".json.backup")
}

/// One discovered dataset file, read into memory.
pub struct DatasetFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Walks `dir` (non-recursively — line documents are flat files per
/// spec.md §6) and reads every recognized file.
///
/// Individual unreadable files are skipped with a `warn!` rather than
/// failing the whole walk, consistent with spec.md §7: build-time errors
/// are collected, never fatal except when zero valid lines remain.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn discover(dir: &Path) -> Result<Vec<DatasetFile>, DatasetError> {
    if !dir.exists() {
        return Err(DatasetError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(DatasetError::NotADirectory(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|source| DatasetError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || !is_recognized(&path) {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), bytes = contents.len(), "discovered dataset file");
                files.push(DatasetFile { path, contents });
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "failed to read dataset file, skipping");
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Loads and validates every discovered file concurrently (spec.md §5: "L
/// (parallelisable per document, pure)"), mirroring the teacher's
/// `batch_fetch_departures` concurrency pattern: one `spawn_blocking` task
/// per item, joined with `futures::future::join_all` rather than awaited
/// one at a time.
///
/// Returns one `(path, result)` pair per input file, in no particular
/// order; callers fold these into an `AssemblyReport` the way
/// `bin/server.rs` does.
pub async fn load_all(
    files: Vec<DatasetFile>,
) -> Vec<(
    PathBuf,
    Result<(crate::loader::LineSpec, Vec<crate::loader::LoadWarning>), crate::loader::LoadError>,
)> {
    let tasks: Vec<_> = files
        .into_iter()
        .map(|file| {
            tokio::task::spawn_blocking(move || {
                let result = crate::loader::load_line_document(&file.contents);
                (file.path, result)
            })
        })
        .collect();

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter_map(Result::ok)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_json_and_backup_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bakerloo.json"), "{}").unwrap();
        std::fs::write(dir.path().join("victoria.json.backup"), "{}").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "ignore me").unwrap();

        let files = discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["bakerloo.json", "victoria.json.backup"]);
    }

    #[test]
    fn missing_directory_errors() {
        let err = discover(Path::new("/nonexistent/path/for/test")).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn empty_directory_returns_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let files = discover(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn load_all_reports_per_file_outcome() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("bakerloo.json"),
            r#"{"metadata": {"line_name": "Bakerloo", "operator": "LU"},
                "stations": [{"name": "A", "coordinates": {"lat": 0.0, "lng": 0.0}},
                             {"name": "B", "coordinates": {"lat": 0.0, "lng": 0.0}}],
                "service_patterns": {"stopping": {"description": "all", "stations": "all"}}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "not json").unwrap();

        let files = discover(dir.path()).unwrap();
        let mut results = load_all(files).await;
        results.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }
}
