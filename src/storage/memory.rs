//! In-memory root for handler tests

use super::{ByteStream, DirEntry, EntryKind, RootPath, ServableRoot};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use hyper::body::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryRoot {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    /// Number of `open_range` calls, to check HEAD never touches file data
    pub opens: AtomicUsize,
}

impl MemoryRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; parent directories are created implicitly.
    pub fn with_file(mut self, key: &str, data: &[u8]) -> Self {
        let mut parent = key;
        while let Some((dir, _)) = parent.rsplit_once('/') {
            self.dirs.insert(dir.to_string());
            parent = dir;
        }
        self.files.insert(key.to_string(), data.to_vec());
        self
    }

    pub fn with_dir(mut self, key: &str) -> Self {
        self.dirs.insert(key.to_string());
        self
    }
}

#[async_trait]
impl ServableRoot for MemoryRoot {
    async fn stat(&self, path: &RootPath) -> io::Result<Option<EntryKind>> {
        let key = path.key();
        if key.is_empty() || self.dirs.contains(&key) {
            return Ok(Some(EntryKind::Directory));
        }
        Ok(self.files.get(&key).map(|data| EntryKind::File {
            size: data.len() as u64,
        }))
    }

    async fn open_range(&self, path: &RootPath, start: u64, len: u64) -> io::Result<ByteStream> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let data = self
            .files
            .get(&path.key())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        let start = usize::try_from(start).map_err(io::Error::other)?;
        let end = start + usize::try_from(len).map_err(io::Error::other)?;
        let chunk = Bytes::copy_from_slice(&data[start..end]);
        Ok(stream::once(async move { Ok(chunk) }).boxed())
    }

    async fn list_dir(&self, path: &RootPath) -> io::Result<Vec<DirEntry>> {
        let key = path.key();
        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{key}/")
        };
        let direct_child = |candidate: &String| {
            candidate
                .strip_prefix(&prefix)
                .filter(|rest| !rest.is_empty() && !rest.contains('/'))
                .map(ToString::to_string)
        };

        let dirs = self.dirs.iter().filter_map(direct_child).map(|name| DirEntry {
            name,
            is_dir: true,
            is_symlink: false,
        });
        let files = self.files.keys().filter_map(direct_child).map(|name| DirEntry {
            name,
            is_dir: false,
            is_symlink: false,
        });
        Ok(dirs.chain(files).collect())
    }
}
