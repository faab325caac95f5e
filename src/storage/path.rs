//! URL path normalization
//!
//! Turns a raw request path into a list of segments relative to the serving
//! root. Parent segments are collapsed and clamped at the root, so a
//! `RootPath` can never name anything above it.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Normalized path relative to the serving root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPath {
    segments: Vec<String>,
    trailing_slash: bool,
}

impl RootPath {
    /// Normalize a raw URL path (query already stripped).
    ///
    /// Returns `None` when the decoded path contains a NUL byte.
    pub fn from_url(raw: &str) -> Option<Self> {
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        if decoded.contains('\0') {
            return None;
        }

        let mut segments: Vec<String> = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s.to_string()),
            }
        }

        Some(Self {
            segments,
            trailing_slash: decoded.ends_with('/'),
        })
    }

    /// Whether the request path ended with `/`
    pub const fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Child path, e.g. an index file inside a directory
    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self {
            segments,
            trailing_slash: false,
        }
    }

    /// Last segment, `None` for the root
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Lowercased extension without the leading dot
    ///
    /// Dotfiles such as `.hic` have no extension.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name()?;
        Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Relative filesystem path to join onto the root directory
    pub fn to_relative(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Slash-separated key, empty for the root
    pub fn key(&self) -> String {
        self.segments.join("/")
    }
}
