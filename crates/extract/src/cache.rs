// ABOUTME: On-disk blob cache holding one raw concatenated page blob per movie id.
// ABOUTME: Files are named `{id}.imdb_movie`; a missing file is a cache miss, not an error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ScrapeError;

pub const CACHE_EXTENSION: &str = "imdb_movie";

/// Directory of cached movie blobs.
#[derive(Debug, Clone)]
pub struct BlobCache {
    dir: PathBuf,
}

impl BlobCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob for `id`.
    pub fn path(&self, id: u32) -> PathBuf {
        self.dir.join(format!("{}.{}", id, CACHE_EXTENSION))
    }

    /// Reads the cached blob for `id`, or `None` when nothing is cached.
    pub async fn load(&self, id: u32) -> Result<Option<Vec<u8>>, ScrapeError> {
        let path = self.path(id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                info!(id, path = %path.display(), "loaded movie from cache");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(id, path = %path.display(), "cache miss");
                Ok(None)
            }
            Err(e) => Err(ScrapeError::cache(
                path.display().to_string(),
                "CacheLoad",
                Some(anyhow::Error::new(e)),
            )),
        }
    }

    /// Writes `blob` for `id`, creating the cache directory if needed.
    pub async fn store(&self, id: u32, blob: &[u8]) -> Result<(), ScrapeError> {
        let path = self.path(id);
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ScrapeError::cache(
                self.dir.display().to_string(),
                "CacheStore",
                Some(anyhow::Error::new(e)),
            )
        })?;
        tokio::fs::write(&path, blob).await.map_err(|e| {
            ScrapeError::cache(
                path.display().to_string(),
                "CacheStore",
                Some(anyhow::Error::new(e)),
            )
        })?;
        info!(id, path = %path.display(), bytes = blob.len(), "stored movie in cache");
        Ok(())
    }
}
