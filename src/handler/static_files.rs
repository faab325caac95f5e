//! Static file serving module
//!
//! Resolves a request path under the serving root, applies the access policy
//! and builds full or partial file responses.

use crate::config::AppState;
use crate::error::{ServeError, DIRLIST_DISABLED, TYPE_NOT_ALLOWED};
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, HttpBody, RangeParseResult};
use crate::logger;
use crate::storage::{EntryKind, RootPath};
use hyper::Response;

/// What a request path resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Regular file to stream
    File { path: RootPath, size: u64 },
    /// Directory, handed to the listing path
    Directory(RootPath),
}

/// Serve a GET or HEAD request
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<HttpBody> {
    let result = match resolve_target(ctx.path, state).await {
        Ok(Target::File { path, size }) => serve_file(ctx, state, &path, size).await,
        Ok(Target::Directory(dir)) => listing::serve_directory(ctx, state, &dir).await,
        Err(e) => Err(e),
    };
    result.unwrap_or_else(|e| error_response(&e, ctx.is_head))
}

/// Resolve a raw URL path and apply the access policy
pub async fn resolve_target(url_path: &str, state: &AppState) -> Result<Target, ServeError> {
    let path = RootPath::from_url(url_path).ok_or(ServeError::NotFound)?;

    match state.root.stat(&path).await? {
        None => Err(ServeError::NotFound),
        Some(EntryKind::Directory) => {
            if state.allow_dirlist() {
                Ok(Target::Directory(path))
            } else {
                Err(ServeError::Forbidden(DIRLIST_DISABLED))
            }
        }
        // `/name.hic/` asks for a directory
        Some(EntryKind::File { .. }) if path.has_trailing_slash() => Err(ServeError::NotFound),
        Some(EntryKind::File { size }) => {
            if state.extensions.permits(path.extension().as_deref()) {
                Ok(Target::File { path, size })
            } else {
                Err(ServeError::Forbidden(TYPE_NOT_ALLOWED))
            }
        }
    }
}

/// Build a 200 or 206 response for a file of `size` bytes
///
/// HEAD requests get the same headers and never open the file.
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    path: &RootPath,
    size: u64,
) -> Result<Response<HttpBody>, ServeError> {
    let range = match http::parse_range_header(ctx.range_header.as_deref(), size) {
        RangeParseResult::Valid(range) => Some(range),
        RangeParseResult::NotSatisfiable => return Err(ServeError::RangeNotSatisfiable { size }),
        RangeParseResult::None => None,
    };

    let (start, length) = range.map_or((0, size), |r| (r.start, r.content_length()));
    let body = if ctx.is_head || length == 0 {
        http::response::empty()
    } else {
        http::response::stream(state.root.open_range(path, start, length).await?)
    };

    let content_type = mime::get_content_type(path.extension().as_deref());
    Ok(match range {
        Some(range) => http::build_partial_response(body, content_type, &range, size),
        None => http::build_file_response(body, content_type, size),
    })
}

/// Map a request failure to its response
pub fn error_response(err: &ServeError, is_head: bool) -> Response<HttpBody> {
    match err {
        ServeError::NotFound => http::build_404_response(is_head),
        ServeError::Forbidden(reason) => http::build_403_response(reason, is_head),
        ServeError::RangeNotSatisfiable { size } => http::build_416_response(*size),
        ServeError::Io(e) => {
            let status = err.status();
            if status.is_server_error() {
                logger::log_error(&format!("Failed to serve file: {e}"));
            }
            http::build_error_response(status, status.canonical_reason().unwrap_or("Error"), is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::memory::MemoryRoot;
    use std::sync::Arc;

    fn state(allow_dirlist: bool, extensions: &[&str]) -> AppState {
        let root = MemoryRoot::new()
            .with_file("sample.hic", b"0123456789")
            .with_file("notes.txt", b"hello")
            .with_file("maps/inner.HIC", b"inner")
            .with_dir("empty");
        let mut config = Config::default();
        config.serve.allow_dirlist = allow_dirlist;
        config.serve.extensions = extensions.iter().map(ToString::to_string).collect();
        AppState::new(config, Arc::new(root))
    }

    #[tokio::test]
    async fn test_resolve_file() {
        let state = state(false, &[".hic"]);
        let target = resolve_target("/sample.hic", &state).await.unwrap();
        assert_eq!(
            target,
            Target::File {
                path: RootPath::from_url("/sample.hic").unwrap(),
                size: 10
            }
        );
    }

    #[tokio::test]
    async fn test_extension_check_is_case_insensitive() {
        let state = state(false, &[".hic"]);
        assert!(matches!(
            resolve_target("/maps/inner.HIC", &state).await,
            Ok(Target::File { size: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejections() {
        let state = state(false, &[".hic"]);
        assert!(matches!(
            resolve_target("/missing.hic", &state).await,
            Err(ServeError::NotFound)
        ));
        assert!(matches!(
            resolve_target("/notes.txt", &state).await,
            Err(ServeError::Forbidden(TYPE_NOT_ALLOWED))
        ));
        assert!(matches!(
            resolve_target("/maps", &state).await,
            Err(ServeError::Forbidden(DIRLIST_DISABLED))
        ));
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_not_found() {
        let state = state(false, &["*"]);
        assert!(matches!(
            resolve_target("/sample.hic/", &state).await,
            Err(ServeError::NotFound)
        ));
        assert!(matches!(
            resolve_target("/notes.txt/", &state).await,
            Err(ServeError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_wildcard_serves_any_extension() {
        let state = state(false, &["*"]);
        assert!(matches!(
            resolve_target("/notes.txt", &state).await,
            Ok(Target::File { .. })
        ));
    }

    #[tokio::test]
    async fn test_directory_delegated_when_enabled() {
        let state = state(true, &[".hic"]);
        assert_eq!(
            resolve_target("/empty/", &state).await.unwrap(),
            Target::Directory(RootPath::from_url("/empty/").unwrap())
        );
    }

    #[tokio::test]
    async fn test_traversal_stays_inside_root() {
        let state = state(false, &[".hic"]);
        // clamps to /sample.hic, never above the root
        assert!(matches!(
            resolve_target("/../../sample.hic", &state).await,
            Ok(Target::File { size: 10, .. })
        ));
        assert!(matches!(
            resolve_target("/../../etc/passwd", &state).await,
            Err(ServeError::NotFound)
        ));
    }
}
