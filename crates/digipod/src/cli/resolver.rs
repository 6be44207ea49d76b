//! Criterion result file resolution

use async_trait::async_trait;
use digipod_diagnostics::{DGP0301, DigipodError, Result};
use digipod_eval::{CriterionKey, ResultProvider};
use digipod_types::{Interval, ObservationWindow, PersonIntervals, person_intervals_from_str};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable with extra result directories (colon-separated)
pub const RESULTS_PATH_ENV: &str = "DIGIPOD_RESULTS_PATH";

/// Result provider reading one `<criterion>.json` file per criterion
pub struct FileResultProvider {
    /// Directories searched in order
    search_paths: Vec<PathBuf>,
    /// Parsed files (canonical path -> partitions)
    cache: Arc<RwLock<HashMap<PathBuf, PersonIntervals<Interval>>>>,
}

impl FileResultProvider {
    /// Create a provider over `search_paths` plus those in `DIGIPOD_RESULTS_PATH`
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        let mut paths = search_paths;

        if let Ok(env_path) = std::env::var(RESULTS_PATH_ENV) {
            for path in env_path.split(':') {
                if !path.is_empty() {
                    paths.push(PathBuf::from(path));
                }
            }
        }

        if paths.is_empty() {
            paths.push(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        }

        Self {
            search_paths: paths,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Find the result file of a criterion in the search paths
    pub fn find_file(&self, criterion: &CriterionKey) -> Option<PathBuf> {
        let filename = format!("{}.json", criterion);
        self.search_paths
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|candidate| candidate.is_file())
    }

    /// Load and validate a result file, with caching
    pub fn load_file(&self, path: &Path) -> Result<PersonIntervals<Interval>> {
        let canonical_path = path.canonicalize().map_err(|e| {
            DigipodError::from(e).with_context(format!("resolving {}", path.display()))
        })?;

        if let Some(data) = self.cache.read().get(&canonical_path) {
            return Ok(data.clone());
        }

        let content = fs::read_to_string(&canonical_path).map_err(|e| {
            DigipodError::from(e).with_context(format!("reading {}", canonical_path.display()))
        })?;
        let data = person_intervals_from_str(&content)
            .map_err(|e| e.with_context(format!("in {}", canonical_path.display())))?;

        debug!(
            "loaded {} persons from {}",
            data.len(),
            canonical_path.display()
        );

        self.cache.write().insert(canonical_path, data.clone());
        Ok(data)
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Get the search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

#[async_trait]
impl ResultProvider for FileResultProvider {
    async fn fetch(
        &self,
        criterion: &CriterionKey,
        _window: &ObservationWindow,
    ) -> Result<PersonIntervals<Interval>> {
        let path = self.find_file(criterion).ok_or_else(|| {
            DigipodError::provider(DGP0301, format!("no file {}.json in search paths", criterion))
                .for_criterion(criterion.as_str())
                .with_context(format!(
                    "searched: {}",
                    self.search_paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
        })?;
        self.load_file(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digipod_diagnostics::{DGP0201, DGP0401};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const ADULT: &str = r#"{
        "7": [{ "start": "2024-01-01T00:00:00Z", "end": "2024-01-03T00:00:00Z", "type": "POSITIVE" }]
    }"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_find_and_load() {
        let dir = TempDir::new().unwrap();
        write(&dir, "adult.json", ADULT);

        let provider = FileResultProvider::new(vec![dir.path().to_path_buf()]);
        let path = provider.find_file(&CriterionKey::from("adult")).unwrap();
        let data = provider.load_file(&path).unwrap();
        assert_eq!(data[&7].len(), 1);
        assert!(provider.find_file(&CriterionKey::from("missing")).is_none());
    }

    #[test]
    fn test_cache() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "adult.json", ADULT);
        let provider = FileResultProvider::new(vec![dir.path().to_path_buf()]);

        let first = provider.load_file(&path).unwrap();
        write(&dir, "adult.json", "{}");
        assert_eq!(provider.load_file(&path).unwrap(), first);

        provider.clear_cache();
        assert!(provider.load_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_partition_names_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bad.json",
            r#"{ "1": [
                { "start": "2024-01-02T00:00:00Z", "end": "2024-01-03T00:00:00Z", "type": "POSITIVE" },
                { "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z", "type": "NEGATIVE" }
            ] }"#,
        );
        let err = FileResultProvider::new(vec![]).load_file(&path).unwrap_err();
        assert_eq!(err.code(), DGP0201);
        assert!(err.context().unwrap().contains("bad.json"));
    }

    #[test]
    fn test_missing_file() {
        let err = FileResultProvider::new(vec![])
            .load_file(Path::new("/nonexistent/digipod/adult.json"))
            .unwrap_err();
        assert_eq!(err.code(), DGP0401);
    }
}
