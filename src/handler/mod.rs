//! Request handler module
//!
//! Method dispatch, path resolution and access policy, file and directory
//! responses.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
