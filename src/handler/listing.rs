//! Directory listing
//!
//! Only reached when listing is enabled. Mirrors a classic static server:
//! redirect to the slash-terminated URL, serve an index file if there is one,
//! otherwise render a plain HTML index.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::router::RequestContext;
use crate::handler::static_files;
use crate::http::{self, HttpBody};
use crate::logger;
use crate::storage::{DirEntry, EntryKind, RootPath};
use hyper::Response;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Characters left unescaped in listing hrefs
const HREF_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &RootPath,
) -> Result<Response<HttpBody>, ServeError> {
    if !dir.has_trailing_slash() {
        let location = match ctx.query {
            Some(query) => format!("{}/?{query}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return Ok(http::build_redirect_response(&location));
    }

    for name in INDEX_FILES {
        let index = dir.join(name);
        if let Some(EntryKind::File { size }) = state.root.stat(&index).await? {
            return static_files::serve_file(ctx, state, &index, size).await;
        }
    }

    let entries = match state.root.list_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_warning(&format!("Cannot list directory /{}: {e}", dir.key()));
            return Err(ServeError::NotFound);
        }
    };

    let display_path = percent_decode_str(ctx.path).decode_utf8_lossy();
    Ok(http::build_html_response(
        render_listing(&display_path, entries),
        ctx.is_head,
    ))
}

/// Render the HTML index for a directory
pub fn render_listing(display_path: &str, mut entries: Vec<DirEntry>) -> String {
    entries.sort_by_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );

    for entry in &entries {
        let mut display = entry.name.clone();
        let mut link = entry.name.clone();
        if entry.is_dir {
            display.push('/');
            link.push('/');
        }
        if entry.is_symlink {
            display = format!("{}@", entry.name);
        }
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(&link, HREF_SAFE),
            escape_html(&display)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
