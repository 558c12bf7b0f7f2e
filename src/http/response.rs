//! HTTP response building module
//!
//! Builders for the responses the server emits, decoupled from request handling.

use std::convert::Infallible;
use std::io;

use futures_util::TryStreamExt;
use http_body_util::{combinators::BoxBody, BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::{Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

use super::range::ByteRange;

/// Read size for streamed file bodies
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Either an in-memory body or a file streamed from disk
pub type ResponseBody = BoxBody<Bytes, io::Error>;
pub type HttpResponse = Response<ResponseBody>;

/// Wrap bytes already in memory
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never: Infallible| -> io::Error { match never {} })
        .boxed()
}

pub fn empty_body() -> ResponseBody {
    full_body(Bytes::new())
}

/// Stream at most `len` bytes from the current position of `file`
pub fn file_body(file: File, len: u64) -> ResponseBody {
    let stream = ReaderStream::with_capacity(file.take(len), STREAM_CHUNK_SIZE);
    StreamBody::new(stream.map_ok(Frame::data)).boxed()
}

/// Build a short plain-text response, used for every error status
pub fn build_text_response(status: StatusCode, message: &'static str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", message.len())
        .body(full_body(Bytes::from_static(message.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(full_body("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            fallback(StatusCode::METHOD_NOT_ALLOWED)
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            fallback(StatusCode::NO_CONTENT)
        })
}

/// Build redirect response (301 or 302)
pub fn build_redirect_response(status: StatusCode, target: &str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Location", target)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(full_body("Redirecting..."))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> HttpResponse {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(full_body("Range Not Satisfiable"))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            fallback(StatusCode::RANGE_NOT_SATISFIABLE)
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> HttpResponse {
    let content_length = content.len();
    let body = if is_head {
        empty_body()
    } else {
        full_body(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// Build 200 response for a whole file of `content_length` bytes
///
/// `body` is empty for HEAD requests; headers are the same either way.
pub fn build_file_response(
    body: ResponseBody,
    content_length: u64,
    content_type: &str,
) -> HttpResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// Build 206 Partial Content response; `body` carries exactly the bytes of `range`
pub fn build_partial_response(
    body: ResponseBody,
    content_type: &str,
    range: ByteRange,
    total_size: u64,
) -> HttpResponse {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", content_type)
        .header("Content-Length", range.content_length())
        .header(
            "Content-Range",
            format!("bytes {}-{}/{total_size}", range.start, range.end),
        )
        .header("Accept-Ranges", "bytes")
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

fn fallback(status: StatusCode) -> HttpResponse {
    let mut resp = Response::new(empty_body());
    *resp.status_mut() = status;
    resp
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    async fn body_text(resp: HttpResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_text_response() {
        let resp = build_text_response(StatusCode::FORBIDDEN, "Forbidden");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            resp.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_text(resp).await, "Forbidden");
    }

    #[tokio::test]
    async fn test_html_head_has_length_but_no_body() {
        let resp = build_html_response("<p>hi</p>".to_string(), true);
        assert_eq!(resp.headers()["content-length"], "9");
        assert_eq!(body_text(resp).await, "");
    }

    #[test]
    fn test_partial_headers() {
        let resp = build_partial_response(
            full_body("234"),
            "text/plain",
            ByteRange { start: 2, end: 4 },
            10,
        );
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()["content-range"], "bytes 2-4/10");
        assert_eq!(resp.headers()["content-length"], "3");
    }

    #[test]
    fn test_redirect_location() {
        let resp = build_redirect_response(StatusCode::MOVED_PERMANENTLY, "/videos/");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["location"], "/videos/");
    }

    #[tokio::test]
    async fn test_file_body_stops_at_len() {
        let tmp = NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), b"0123456789").unwrap();

        let mut file = File::open(tmp.path()).await.unwrap();
        tokio::io::AsyncSeekExt::seek(&mut file, io::SeekFrom::Start(3))
            .await
            .unwrap();
        let bytes = file_body(file, 4).collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"3456");
    }
}
