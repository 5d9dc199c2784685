use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Result;

use crate::data::loader::load_table;
use crate::data::model::{WideYearTable, YearSchema};
use crate::error::DataError;

struct CacheEntry {
    modified: SystemTime,
    table: WideYearTable,
}

/// Loaded tables keyed by path, reloaded when the file's modification time
/// changes.
///
/// The pipeline functions never use this on their own; long-lived callers that
/// answer many requests over the same files can opt in.
///
/// Entries stay until [`TableCache::invalidate`] is called, except that a
/// path which can no longer be read or parsed is dropped on the failing
/// [`TableCache::get_or_load`].
pub struct TableCache {
    schema: YearSchema,
    entries: HashMap<PathBuf, CacheEntry>,
}

impl TableCache {
    pub fn new(schema: YearSchema) -> Self {
        Self {
            schema,
            entries: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &YearSchema {
        &self.schema
    }

    /// Return the cached table for `path`, loading it if absent or stale.
    pub fn get_or_load(&mut self, path: &Path) -> Result<&WideYearTable> {
        if let Err(err) = self.refresh(path) {
            if self.entries.remove(path).is_some() {
                log::debug!("cache evict: {}", path.display());
            }
            return Err(err);
        }
        Ok(&self.entries[path].table)
    }

    fn refresh(&mut self, path: &Path) -> Result<()> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|source| DataError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let fresh = matches!(self.entries.get(path), Some(e) if e.modified == modified);
        if fresh {
            log::trace!("cache hit: {}", path.display());
        } else {
            log::debug!("cache miss: {}", path.display());
            let table = load_table(path, &self.schema)?;
            self.entries
                .insert(path.to_path_buf(), CacheEntry { modified, table });
        }
        Ok(())
    }

    /// Drop one path, or everything when `path` is `None`.
    pub fn invalidate(&mut self, path: Option<&Path>) {
        match path {
            Some(p) => {
                self.entries.remove(p);
            }
            None => self.entries.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::time::Duration;

    use super::*;

    fn write(path: &Path, body: &str, modified: SystemTime) {
        fs::write(path, body).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    }

    #[test]
    fn reloads_only_when_mtime_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_300_000_000);

        write(&path, "Timestamp.2011,2011\n18-01-2011,1\n", t0);
        let mut cache = TableCache::new(YearSchema::new([2011]));
        assert_eq!(cache.get_or_load(&path).unwrap().row_count, 1);

        // Same mtime: the stale content is served from the cache.
        write(&path, "Timestamp.2011,2011\n18-01-2011,1\n19-01-2011,2\n", t0);
        assert_eq!(cache.get_or_load(&path).unwrap().row_count, 1);

        let later = t0 + Duration::from_secs(60);
        write(&path, "Timestamp.2011,2011\n18-01-2011,1\n19-01-2011,2\n", later);
        assert_eq!(cache.get_or_load(&path).unwrap().row_count, 2);
        assert_eq!(cache.len(), 1);

        cache.invalidate(None);
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TableCache::new(YearSchema::default());
        let err = cache.get_or_load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Io { .. })));
    }

    #[test]
    fn unreadable_path_is_dropped_from_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("kept.csv");
        let gone = dir.path().join("gone.csv");
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_300_000_000);
        write(&kept, "Timestamp.2011,2011\n18-01-2011,1\n", t0);
        write(&gone, "Timestamp.2011,2011\n18-01-2011,1\n", t0);

        let mut cache = TableCache::new(YearSchema::new([2011]));
        cache.get_or_load(&kept).unwrap();
        cache.get_or_load(&gone).unwrap();
        assert_eq!(cache.len(), 2);

        fs::remove_file(&gone).unwrap();
        assert!(cache.get_or_load(&gone).is_err());
        assert_eq!(cache.len(), 1);

        // A file rewritten with a mismatched header is dropped as well.
        write(&kept, "Day,Sales\n18-01-2011,1\n", t0 + Duration::from_secs(60));
        let err = cache.get_or_load(&kept).unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Schema { .. })));
        assert!(cache.is_empty());
    }
}
