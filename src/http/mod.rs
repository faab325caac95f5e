//! HTTP protocol layer module
//!
//! Range parsing, MIME detection, the CORS header set and response builders,
//! decoupled from path resolution and file access.

pub mod cors;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, RangeParseResult};
pub use response::{
    build_403_response, build_404_response, build_405_response, build_416_response,
    build_error_response, build_file_response, build_html_response, build_options_response,
    build_partial_response, build_redirect_response, HttpBody,
};
