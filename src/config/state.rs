// Application state module
// Immutable per-process state shared by every connection task

use std::io;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::types::{AllowedExtensions, Config};
use crate::storage::{LocalRoot, ServableRoot};

/// Application state
///
/// Built once at startup and shared through an `Arc`; nothing in here is
/// mutated by request handling except the connection counter.
pub struct AppState {
    pub config: Config,
    pub root: Arc<dyn ServableRoot>,
    pub extensions: AllowedExtensions,
    /// Canonical serving directory, for display
    pub root_display: String,
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Open the configured directory on the local filesystem.
    pub fn from_config(config: Config) -> io::Result<Self> {
        let root = LocalRoot::open(&config.serve.directory)?;
        let root_display = root.base().display().to_string();
        let mut state = Self::new(config, Arc::new(root));
        state.root_display = root_display;
        Ok(state)
    }

    /// State over an arbitrary root
    pub fn new(config: Config, root: Arc<dyn ServableRoot>) -> Self {
        let extensions = AllowedExtensions::from_config(&config.serve.extensions);
        Self {
            root_display: config.serve.directory.display().to_string(),
            config,
            root,
            extensions,
            active_connections: AtomicUsize::new(0),
        }
    }

    pub const fn allow_dirlist(&self) -> bool {
        self.config.serve.allow_dirlist
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
