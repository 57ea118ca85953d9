//! File-backed cache store.
//!
//! One JSON file per query under the cache directory, named by the query's
//! SHA-256 digest. Entries expire purely by age and are evicted lazily when
//! a read finds them stale. Writes go through a temp file in the same
//! directory followed by a rename, so readers never see a partial entry and
//! concurrent writers to one key resolve as last-writer-wins.
//!
//! A temp file orphaned by a cancelled write is swept on the first write
//! after startup once it is older than [`STALE_TEMP_AGE`].

use super::entry::CacheEntry;
use super::hash::compute_cache_key;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::OnceCell;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temp files older than this belong to no in-flight write.
pub const STALE_TEMP_AGE: Duration = Duration::from_secs(10 * 60);

/// Errors from writing cache entries.
///
/// Reads never fail: an unreadable or corrupt entry is reported as absent.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CacheError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        CacheError::Io { path: path.to_path_buf(), source }
    }
}

/// On-disk cache of raw upstream payloads keyed by query.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    ttl: Duration,
    swept: Arc<OnceCell<()>>,
}

impl CacheStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { dir: dir.into(), ttl, swept: Arc::new(OnceCell::new()) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key_for(query: &str) -> String {
        compute_cache_key(query)
    }

    /// Path of the entry file for `query`.
    pub fn path_for(&self, query: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key_for(query)))
    }

    /// Look up a fresh entry for `query`.
    pub async fn get(&self, query: &str) -> Option<CacheEntry> {
        self.get_at(query, Utc::now()).await
    }

    /// Look up an entry as of `now`.
    ///
    /// Deletes the entry and returns `None` if it has expired. Missing,
    /// unreadable and corrupt entries are all reported as `None`.
    pub async fn get_at(&self, query: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let path = self.path_for(query);

        let (bytes, modified) = match read_entry(&path).await {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(query, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read cache entry");
                return None;
            }
        };

        let entry = match CacheEntry::decode(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt cache entry, ignoring");
                return None;
            }
        };

        if entry.is_expired_at(now, self.ttl) {
            tracing::debug!(query, timestamp = %entry.timestamp, "cache entry expired");
            // A writer can still slip in between the check and the remove;
            // the cost is one extra upstream fetch.
            match remove_if_unchanged(&path, modified).await {
                Ok(false) => tracing::debug!(query, "expired entry replaced concurrently, keeping it"),
                Ok(true) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove expired cache entry");
                }
            }
            return None;
        }

        tracing::debug!(query, "cache hit");
        Some(entry)
    }

    /// Store `payload` for `query`, stamped with the current time.
    pub async fn put(&self, query: &str, payload: &str) -> Result<(), CacheError> {
        self.put_at(query, payload, Utc::now()).await
    }

    /// Store `payload` for `query` with an explicit creation time,
    /// replacing any existing entry.
    pub async fn put_at(&self, query: &str, payload: &str, timestamp: DateTime<Utc>) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CacheError::io(&self.dir, e))?;
        self.swept
            .get_or_init(|| sweep_stale_temps(&self.dir, STALE_TEMP_AGE))
            .await;

        let bytes = CacheEntry::new(payload, timestamp).encode()?;
        let path = self.path_for(query);
        let temp = self.temp_path(&path);

        if let Err(e) = write_and_rename(&temp, &path, &bytes).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e);
        }

        tracing::debug!(query, bytes = bytes.len(), "cache entry written");
        Ok(())
    }

    fn temp_path(&self, final_path: &Path) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = final_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir.join(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
    }
}

/// Read an entry along with the modification time of the file read.
async fn read_entry(path: &Path) -> std::io::Result<(Vec<u8>, Option<SystemTime>)> {
    let mut file = fs::File::open(path).await?;
    let modified = file.metadata().await.ok().and_then(|m| m.modified().ok());
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).await?;
    Ok((bytes, modified))
}

/// Remove `path` unless it was replaced since it was read.
///
/// Returns `Ok(false)` if the file is gone or has a different mtime.
async fn remove_if_unchanged(path: &Path, seen: Option<SystemTime>) -> std::io::Result<bool> {
    if let Some(seen) = seen {
        match fs::metadata(path).await {
            Ok(meta) if meta.modified().ok() != Some(seen) => return Ok(false),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        }
    }

    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

/// Delete temp files in `dir` older than `max_age`. Failures are logged.
async fn sweep_stale_temps(dir: &Path, max_age: Duration) {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to scan cache directory");
            return;
        }
    };

    let mut removed = 0usize;
    while let Ok(Some(entry)) = entries.next_entry().await {
        if !is_temp_name(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let stale = entry
            .metadata()
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.elapsed().ok())
            .is_some_and(|age| age > max_age);

        if stale {
            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "failed to remove stale temp file");
                }
            }
        }
    }

    if removed > 0 {
        tracing::debug!(dir = %dir.display(), removed, "swept stale cache temp files");
    }
}

async fn write_and_rename(temp: &Path, path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let mut file = fs::File::create(temp).await.map_err(|e| CacheError::io(temp, e))?;
    file.write_all(bytes).await.map_err(|e| CacheError::io(temp, e))?;
    file.sync_all().await.map_err(|e| CacheError::io(temp, e))?;
    drop(file);

    fs::rename(temp, path).await.map_err(|e| CacheError::io(path, e))
}
