//! Transient asset store
//!
//! Holds one uploaded reference file per request in a single well-known
//! directory. Every asset is deleted exactly once:
//! - explicitly via [`TransientAsset::release`] on the normal path
//! - by `Drop` if the owning request future is abandoned (client disconnect)
//!
//! File names are `<uuid v4>.<ext>`, so concurrent uploads never collide.

use chrono::{DateTime, Utc};
use songsmith_common::api::AudioMime;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::AssetIoError;

/// Store rooted at the uploads directory
#[derive(Debug, Clone)]
pub struct TransientAssetStore {
    dir: PathBuf,
}

impl TransientAssetStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an accepted upload to storage
    ///
    /// The directory is created lazily on first use.
    pub async fn store(&self, bytes: &[u8], mime: AudioMime) -> Result<TransientAsset, AssetIoError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AssetIoError::new("create directory", &self.dir, e))?;

        let path = self
            .dir
            .join(format!("{}.{}", Uuid::new_v4(), mime.extension()));

        Self::store_at(path, bytes, mime).await
    }

    /// Write `bytes` to `path`; a partially written file is removed on failure
    async fn store_at(path: PathBuf, bytes: &[u8], mime: AudioMime) -> Result<TransientAsset, AssetIoError> {
        if let Err(e) = tokio::fs::write(&path, bytes).await {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    error!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
                }
            }
            return Err(AssetIoError::new("write", &path, e));
        }

        info!(
            path = %path.display(),
            mime = %mime,
            size_bytes = bytes.len(),
            "Transient asset stored"
        );

        Ok(TransientAsset {
            path,
            mime,
            size_bytes: bytes.len() as u64,
            created_at: Utc::now(),
            released: false,
        })
    }

    /// Remove the whole uploads directory (process shutdown)
    pub async fn purge(&self) -> Result<(), AssetIoError> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {
                info!(dir = %self.dir.display(), "Uploads directory cleaned up");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AssetIoError::new("remove directory", &self.dir, e)),
        }
    }
}

/// One uploaded file, exclusively owned by the request that created it
#[derive(Debug)]
pub struct TransientAsset {
    path: PathBuf,
    mime: AudioMime,
    size_bytes: u64,
    created_at: DateTime<Utc>,
    released: bool,
}

impl TransientAsset {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime(&self) -> AudioMime {
        self.mime
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Milliseconds since the asset was stored
    fn held_ms(&self) -> i64 {
        (Utc::now() - self.created_at).num_milliseconds()
    }

    /// Read the stored bytes back
    pub async fn read(&self) -> Result<Vec<u8>, AssetIoError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| AssetIoError::new("read", &self.path, e))
    }

    /// Delete from storage. Consumes the asset, so it can run only once.
    ///
    /// A file that is already gone counts as released.
    pub async fn release(mut self) -> Result<(), AssetIoError> {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), held_ms = self.held_ms(), "Transient asset deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Transient asset already gone");
                Ok(())
            }
            Err(e) => Err(AssetIoError::new("delete", &self.path, e)),
        }
    }
}

impl Drop for TransientAsset {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!(
            path = %self.path.display(),
            held_ms = self.held_ms(),
            "Transient asset dropped without release; deleting"
        );
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                error!(path = %self.path.display(), error = %e, "Failed to delete transient asset");
            }
        }
    }
}

/// Release an asset, logging instead of failing
///
/// Used on paths where a generation outcome is already decided and a cleanup
/// failure must not replace it.
pub async fn release_logged(asset: TransientAsset) {
    let path = asset.path().to_path_buf();
    if let Err(e) = asset.release().await {
        error!(path = %path.display(), error = %e, "Error deleting transient asset");
    }
}
