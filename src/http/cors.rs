//! Fixed CORS header set
//!
//! Attached to every response so a viewer hosted on another origin can read
//! partial content and its range headers.

use hyper::http::response::Builder;

pub const CORS_HEADERS: [(&str, &str); 5] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, OPTIONS, HEAD"),
    ("Access-Control-Allow-Headers", "Range"),
    (
        "Access-Control-Expose-Headers",
        "Content-Range, Content-Length, Accept-Ranges",
    ),
    ("Access-Control-Max-Age", "86400"),
];

/// Add the CORS header set to a response builder
pub fn with_cors(builder: Builder) -> Builder {
    CORS_HEADERS
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(*name, *value))
}
