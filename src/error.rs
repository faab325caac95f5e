//! Request-level error taxonomy
//!
//! Every failure while serving a request ends the request with one of these;
//! nothing is retried.

use hyper::StatusCode;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    /// Path missing, or resolved outside the serving root
    #[error("File not found")]
    NotFound,

    /// Directory listing disabled or extension not allowed
    #[error("{0}")]
    Forbidden(&'static str),

    /// Range bounds invalid for a file of `size` bytes
    #[error("Requested Range Not Satisfiable (size {size})")]
    RangeNotSatisfiable { size: u64 },

    /// Unexpected I/O failure while opening or inspecting a file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub const DIRLIST_DISABLED: &str = "Directory listing is disabled";
pub const TYPE_NOT_ALLOWED: &str = "File type not allowed";

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Self::Io(e) => match e.kind() {
                io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
                io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}
