//! Static file serving module
//!
//! Maps paths below the static prefix onto files under the serving root.
//! Directories are not listed here; they redirect to the listing page,
//! which is where caller authorization happens.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::respond_error;
use crate::handler::router::RequestContext;
use crate::http::response::{self, ResponseBody};
use crate::http::{self, mime, HttpResponse, RangeParseResult};
use crate::listing::path::{decode_url_path, listing_href, resolve_within};
use hyper::StatusCode;
use std::io::{self, SeekFrom};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncSeekExt;

/// Serve `rest`, the part of the request path after the static prefix
pub async fn serve_static(ctx: &RequestContext<'_>, rest: &str, state: &AppState) -> HttpResponse {
    match load_static(ctx, rest, state).await {
        Ok(resp) => resp,
        Err(e) => respond_error(ctx, e),
    }
}

async fn load_static(
    ctx: &RequestContext<'_>,
    rest: &str,
    state: &AppState,
) -> Result<HttpResponse, RequestError> {
    let listing = &state.config.listing;
    let requested = decode_url_path(rest)?;
    let resolved = resolve_within(&listing.root, &requested)?;
    let path = resolved.absolute.as_path();

    let file_error = |source| RequestError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let meta = fs::metadata(path).await.map_err(file_error)?;
    if meta.is_dir() {
        if listing.allow_subpaths {
            return Ok(http::build_redirect_response(
                StatusCode::FOUND,
                &listing_href(&resolved),
            ));
        }
        return Err(RequestError::NotFound(ctx.path.to_string()));
    }

    let size = meta.len();
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));

    // Only the bytes actually sent are read, and only while the body is polled
    Ok(match http::parse_range_header(ctx.range_header, size) {
        RangeParseResult::Valid(range) => {
            let body = if ctx.is_head {
                response::empty_body()
            } else {
                open_span(path, range.start, range.content_length())
                    .await
                    .map_err(file_error)?
            };
            response::build_partial_response(body, content_type, range, size)
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(size),
        RangeParseResult::None => {
            let body = if ctx.is_head {
                response::empty_body()
            } else {
                open_span(path, 0, size).await.map_err(file_error)?
            };
            response::build_file_response(body, size, content_type)
        }
    })
}

/// Open `path` and stream `len` bytes starting at `start`
async fn open_span(path: &Path, start: u64, len: u64) -> io::Result<ResponseBody> {
    let mut file = fs::File::open(path).await?;
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }
    Ok(response::file_body(file, len))
}
