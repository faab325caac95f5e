//! HTTP response building module
//!
//! Builders for every response the server sends. All of them carry the CORS
//! header set; error responses to HEAD requests keep their headers and drop
//! the body.

use super::cors::with_cors;
use super::range::RangeRequest;
use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::{Response, StatusCode};
use std::io;

use crate::storage::ByteStream;

/// Response body: either buffered bytes or a streamed file range
pub type HttpBody = UnsyncBoxBody<Bytes, io::Error>;

pub fn full(data: impl Into<Bytes>) -> HttpBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> HttpBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn stream(chunks: ByteStream) -> HttpBody {
    StreamBody::new(chunks.map_ok(Frame::data)).boxed_unsync()
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<HttpBody> {
    with_cors(Response::builder().status(StatusCode::NO_CONTENT))
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            Response::new(empty())
        })
}

/// Build 200 response for a whole file
pub fn build_file_response(body: HttpBody, content_type: &str, file_size: u64) -> Response<HttpBody> {
    with_cors(Response::builder())
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Accept-Ranges", "bytes")
        .header("Content-Length", file_size)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(empty())
        })
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    body: HttpBody,
    content_type: &str,
    range: &RangeRequest,
    file_size: u64,
) -> Response<HttpBody> {
    with_cors(Response::builder())
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", content_type)
        .header("Accept-Ranges", "bytes")
        .header("Content-Length", range.content_length())
        .header("Content-Range", range.content_range(file_size))
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(empty())
        })
}

/// Build a plain-text error response (403, 404, 500)
pub fn build_error_response(status: StatusCode, message: &str, is_head: bool) -> Response<HttpBody> {
    let text = format!("{} {message}", status.as_u16());
    let content_length = text.len();
    let body = if is_head { empty() } else { full(text) };

    with_cors(Response::builder())
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(empty())
        })
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<HttpBody> {
    build_error_response(StatusCode::NOT_FOUND, "File not found", is_head)
}

/// Build 403 Forbidden response
pub fn build_403_response(reason: &str, is_head: bool) -> Response<HttpBody> {
    build_error_response(StatusCode::FORBIDDEN, reason, is_head)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<HttpBody> {
    with_cors(Response::builder())
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(full("405 Method Not Allowed"))
        })
}

/// Build 416 Range Not Satisfiable response, never with a body
pub fn build_416_response(file_size: u64) -> Response<HttpBody> {
    with_cors(Response::builder())
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Range", format!("bytes */{file_size}"))
        .header("Content-Length", 0)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(empty())
        })
}

/// Build 301 redirect response (directory URL missing its trailing slash)
pub fn build_redirect_response(location: &str) -> Response<HttpBody> {
    with_cors(Response::builder())
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(empty())
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<HttpBody> {
    let content_length = content.len();
    let body = if is_head { empty() } else { full(content) };

    with_cors(Response::builder())
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
