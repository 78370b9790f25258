use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use log::debug;

use crate::data::loader::{self, Dataset};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Load cache: one source file per session, read as rarely as possible
// ---------------------------------------------------------------------------

/// How long a cached dataset stays fresh when the source has not changed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Explicit load cache. The key is the source path plus its modification
/// time; the value is the cleaned dataset behind an `Arc`. An entry is
/// refreshed when the TTL lapses, when the source's modification time moves,
/// or on [`DatasetCache::invalidate`].
#[derive(Debug)]
pub struct DatasetCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    modified: Option<SystemTime>,
    loaded_at: Instant,
    dataset: Arc<Dataset>,
}

impl Default for DatasetCache {
    fn default() -> Self {
        DatasetCache::new(DEFAULT_TTL)
    }
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        DatasetCache { ttl, entry: None }
    }

    /// Return the cached dataset when still fresh, otherwise (re)load it.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Dataset>, DataError> {
        let modified = source_mtime(path);
        if let Some(entry) = &self.entry {
            if entry.path == path
                && entry.modified == modified
                && entry.loaded_at.elapsed() < self.ttl
            {
                debug!("cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        debug!("cache miss for {}", path.display());
        let dataset = Arc::new(loader::load_dataset(path)?);
        self.entry = Some(CacheEntry {
            path: path.to_path_buf(),
            modified,
            loaded_at: Instant::now(),
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Drop the cached entry; the next load re-reads the source.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

fn source_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
