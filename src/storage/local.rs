//! Local filesystem root

use super::{ByteStream, DirEntry, EntryKind, RootPath, ServableRoot};
use crate::logger;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Read buffer size for streamed file bodies
const CHUNK_SIZE: usize = 64 * 1024;

/// Serves files from a directory on disk
#[derive(Debug, Clone)]
pub struct LocalRoot {
    base: PathBuf,
}

impl LocalRoot {
    /// Canonicalize `dir` and use it as the serving root.
    pub fn open(dir: &Path) -> io::Result<Self> {
        let base = dir.canonicalize()?;
        if !base.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a directory: {}", base.display()),
            ));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Map a root path to a canonical filesystem path.
    ///
    /// Symlinks are followed; anything that lands outside the root is
    /// reported as missing.
    async fn resolve(&self, path: &RootPath) -> Option<PathBuf> {
        let joined = self.base.join(path.to_relative());
        let canonical = fs::canonicalize(&joined).await.ok()?;
        if !canonical.starts_with(&self.base) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: /{} -> {}",
                path.key(),
                canonical.display()
            ));
            return None;
        }
        Some(canonical)
    }
}

#[async_trait]
impl ServableRoot for LocalRoot {
    async fn stat(&self, path: &RootPath) -> io::Result<Option<EntryKind>> {
        let Some(resolved) = self.resolve(path).await else {
            return Ok(None);
        };
        let metadata = fs::metadata(&resolved).await?;
        if metadata.is_dir() {
            Ok(Some(EntryKind::Directory))
        } else {
            Ok(Some(EntryKind::File {
                size: metadata.len(),
            }))
        }
    }

    async fn open_range(&self, path: &RootPath, start: u64, len: u64) -> io::Result<ByteStream> {
        let resolved = self
            .resolve(path)
            .await
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        let mut file = File::open(&resolved).await?;
        file.seek(SeekFrom::Start(start)).await?;
        Ok(ReaderStream::with_capacity(file.take(len), CHUNK_SIZE).boxed())
    }

    async fn list_dir(&self, path: &RootPath) -> io::Result<Vec<DirEntry>> {
        let resolved = self
            .resolve(path)
            .await
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&resolved).await?;
        while let Some(entry) = dir.next_entry().await? {
            let is_symlink = entry
                .file_type()
                .await
                .map(|t| t.is_symlink())
                .unwrap_or(false);
            // follows symlinks, so a linked directory still lists as one
            let is_dir = fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
                is_symlink,
            });
        }
        Ok(entries)
    }
}
