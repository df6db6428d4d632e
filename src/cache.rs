// Parsed-dataset cache owned by the caller.
//
// Entries are keyed by the three source paths plus each file's size and
// modification time, so a replaced file misses on its own and replaces the
// stale entry. `invalidate` and `clear` cover re-uploads that keep size and
// mtime.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use log::debug;

use crate::error::{DashboardError, Result};
use crate::loader::{load_datasets, DatasetPaths, LoadReport};
use crate::types::Datasets;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    paths: DatasetPaths,
    stamps: [FileStamp; 3],
}

impl SourceKey {
    pub fn for_paths(paths: &DatasetPaths) -> Result<Self> {
        Ok(Self {
            paths: paths.clone(),
            stamps: [
                FileStamp::of(&paths.expectations)?,
                FileStamp::of(&paths.performance)?,
                FileStamp::of(&paths.evidence)?,
            ],
        })
    }
}

#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, (Arc<Datasets>, LoadReport)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached snapshot for `paths`, loading it on a miss. A failed load
    /// leaves the cache unchanged.
    pub fn get_or_load(&mut self, paths: &DatasetPaths) -> Result<(Arc<Datasets>, LoadReport)> {
        let key = SourceKey::for_paths(paths)?;
        if let Some((data, report)) = self.entries.get(&key) {
            debug!("dataset cache hit for {}", paths.expectations.display());
            return Ok((Arc::clone(data), *report));
        }
        debug!("dataset cache miss for {}", paths.expectations.display());
        let (data, report) = load_datasets(paths)?;
        let data = Arc::new(data);
        // Stale stamps for the same sources can never hit again.
        self.entries.retain(|k, _| k.paths != key.paths);
        self.entries.insert(key, (Arc::clone(&data), report));
        Ok((data, report))
    }

    /// Drop every entry loaded from `paths`, whatever their file stamps.
    pub fn invalidate(&mut self, paths: &DatasetPaths) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| &k.paths != paths);
        let dropped = before - self.entries.len();
        debug!("invalidated {} cached dataset(s)", dropped);
        dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
