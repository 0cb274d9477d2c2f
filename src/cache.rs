//! Best-effort persistent store for game ID → name mappings.
//!
//! One file per game under the cache directory: the file name is the ID,
//! the content is the raw UTF-8 display name. Nothing here ever fails the
//! caller; an unreadable or unwritable cache just behaves like an empty one.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;
use tracing::debug;

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(String),
    Miss,
    /// The store could not be consulted. Treated as a miss.
    Unavailable,
}

/// Outcome of a cache write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    Stored,
    Unavailable,
}

/// Persistent tier behind the in-memory game map.
#[async_trait]
pub trait GameNameStore: Send + Sync {
    async fn get(&self, id: &str) -> CacheLookup;
    async fn put(&self, id: &str, name: &str) -> CacheWrite;
}

/// Default cache directory: `<user cache dir>/twitchbrowser`.
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("twitchbrowser"))
}

/// Directory-backed [`GameNameStore`].
///
/// The directory is created (owner-only on unix) on the first write.
#[derive(Debug)]
pub struct DiskCache {
    dir: PathBuf,
    dir_ready: OnceCell<bool>,
}

impl DiskCache {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dir_ready: OnceCell::new(),
        }
    }

    /// Path for `id`, or `None` if the ID cannot be a plain file name.
    fn entry_path(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\', '\0']);
        valid.then(|| self.dir.join(id))
    }

    /// Create the directory once. A failure sticks for the life of the store.
    async fn ensure_dir(&self) -> bool {
        *self
            .dir_ready
            .get_or_init(|| async {
                let mut builder = tokio::fs::DirBuilder::new();
                builder.recursive(true);
                #[cfg(unix)]
                builder.mode(0o700);
                match builder.create(&self.dir).await {
                    Ok(()) => true,
                    Err(e) => {
                        debug!(dir = %self.dir.display(), "game cache directory unavailable: {e}");
                        false
                    }
                }
            })
            .await
    }
}

async fn write_entry(path: &std::path::Path, name: &str) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path).await?;
    file.write_all(name.as_bytes()).await?;
    file.flush().await
}

#[async_trait]
impl GameNameStore for DiskCache {
    async fn get(&self, id: &str) -> CacheLookup {
        let Some(path) = self.entry_path(id) else {
            return CacheLookup::Unavailable;
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(name) => CacheLookup::Hit(name),
            Err(e) if e.kind() == ErrorKind::NotFound => CacheLookup::Miss,
            Err(e) => {
                debug!(path = %path.display(), "game cache read failed: {e}");
                CacheLookup::Unavailable
            }
        }
    }

    async fn put(&self, id: &str, name: &str) -> CacheWrite {
        let Some(path) = self.entry_path(id) else {
            return CacheWrite::Unavailable;
        };
        if !self.ensure_dir().await {
            return CacheWrite::Unavailable;
        }
        match write_entry(&path, name).await {
            Ok(()) => CacheWrite::Stored,
            Err(e) => {
                debug!(path = %path.display(), "game cache write failed: {e}");
                CacheWrite::Unavailable
            }
        }
    }
}
