// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8020;
pub const DEFAULT_EXTENSION: &str = ".hic";
pub const DEFAULT_ACCESS_LOG_FORMAT: &str = "common";
pub const DEFAULT_HEADER_READ_TIMEOUT: u64 = 30;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub serve: ServeConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: None,
        }
    }
}

/// What gets served and to whom
#[derive(Debug, Deserialize, Clone)]
pub struct ServeConfig {
    /// Serving root
    pub directory: PathBuf,
    /// Allowed extensions as configured; see [`AllowedExtensions`]
    pub extensions: Vec<String>,
    /// Serve generated directory indexes instead of 403
    pub allow_dirlist: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            allow_dirlist: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    DEFAULT_ACCESS_LOG_FORMAT.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed for a client to send request headers, 0 disables
    pub header_read_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            header_read_timeout: DEFAULT_HEADER_READ_TIMEOUT,
            max_connections: None,
        }
    }
}

/// Normalized extension allow-list
///
/// Entries are lowercase with a leading dot. An empty set allows every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedExtensions(BTreeSet<String>);

impl AllowedExtensions {
    /// Build from configured values; `*` anywhere in the list allows all.
    pub fn from_config(extensions: &[String]) -> Self {
        if extensions.iter().any(|e| e.trim() == "*") {
            return Self::default();
        }
        let set = extensions
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| if e.starts_with('.') { e } else { format!(".{e}") })
            .collect();
        Self(set)
    }

    pub fn allows_all(&self) -> bool {
        self.0.is_empty()
    }

    /// Check a lowercased extension without its dot (as produced by
    /// `RootPath::extension`).
    pub fn permits(&self, extension: Option<&str>) -> bool {
        if self.allows_all() {
            return true;
        }
        extension.is_some_and(|ext| self.0.contains(&format!(".{ext}")))
    }

    /// Display form for the startup banner
    pub fn describe(&self) -> String {
        if self.allows_all() {
            "*".to_string()
        } else {
            self.0.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}
