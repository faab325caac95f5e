//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

/// Fallback for unknown extensions, including `.hic`
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Get MIME Content-Type based on a lowercased file extension (no dot)
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    extension
        .and_then(|ext| mime_guess::from_ext(ext).first_raw())
        .unwrap_or(OCTET_STREAM)
}
