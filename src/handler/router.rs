//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, prefix
//! dispatch between the static file responder and the listing page, and
//! access logging.

use crate::config::AppState;
use crate::handler::{listing, static_files};
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::{header, HeaderMap, Method, Request, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (percent-encoded) request path
    pub path: &'a str,
    pub is_head: bool,
    /// Caller address without port
    pub caller: String,
    pub range_header: Option<&'a str>,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    peer: SocketAddr,
    state: Arc<AppState>,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();
    let method = &parts.method;
    let headers = &parts.headers;

    let ctx = RequestContext {
        path: parts.uri.path(),
        is_head: *method == Method::HEAD,
        caller: peer.ip().to_string(),
        range_header: headers.get(header::RANGE).and_then(|v| v.to_str().ok()),
    };

    let response = match check_http_method(method) {
        Some(resp) => resp,
        None => route_request(&ctx, &state).await,
    };

    if state.access_log() {
        let mut entry = AccessLogEntry::new(
            ctx.caller.clone(),
            method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.http_version = format!("{:?}", parts.version)
            .trim_start_matches("HTTP/")
            .to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = if ctx.is_head {
            0
        } else {
            response
                .headers()
                .get(header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        };
        entry.referer = header_string(headers, header::REFERER);
        entry.user_agent = header_string(headers, header::USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Only GET and HEAD reach the handlers
fn check_http_method(method: &Method) -> Option<HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route by path prefix
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    let prefix = state.config.listing.static_prefix.as_str();

    // 1. Files under the static prefix
    if let Some(rest) = ctx.path.strip_prefix(prefix) {
        return static_files::serve_static(ctx, rest, state).await;
    }

    // 2. Bare mount point: "/videos" -> "/videos/"
    if ctx.path == prefix.trim_end_matches('/') {
        return http::build_redirect_response(StatusCode::MOVED_PERMANENTLY, prefix);
    }

    // 3. Everything else is a listing request
    listing::serve_listing(ctx, state).await
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::fs;
    use tempfile::TempDir;

    const ALLOWED: &str = "192.168.65.1:50000";
    const OTHER: &str = "192.168.65.2:50000";

    fn setup() -> (TempDir, Arc<AppState>) {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("file1.txt"), "Hello, file 1!").unwrap();
        fs::create_dir(root.path().join("sub")).unwrap();
        fs::write(root.path().join("sub/inner.txt"), "inner").unwrap();

        let mut cfg = Config::default();
        cfg.listing.root = root.path().to_path_buf();
        cfg.logging.access_log = false;
        (root, Arc::new(AppState::new(cfg)))
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        peer: &str,
    ) -> (StatusCode, hyper::HeaderMap, String) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap();
        let resp = handle_request(req, peer.parse().unwrap(), Arc::clone(state))
            .await
            .unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_listing_from_allowed_caller() {
        let (_root, state) = setup();
        let (status, headers, body) = send(&state, Method::GET, "/", ALLOWED).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "text/html; charset=utf-8");
        assert!(body.contains(r#"href="/videos/file1.txt""#));
        assert!(body.contains(r#"href="/videos/sub/""#));
    }

    #[tokio::test]
    async fn test_listing_from_other_caller() {
        let (_root, state) = setup();
        let (status, _, body) = send(&state, Method::GET, "/", OTHER).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Forbidden");
    }

    #[tokio::test]
    async fn test_static_file_ignores_caller() {
        let (_root, state) = setup();
        let (status, headers, body) =
            send(&state, Method::GET, "/videos/file1.txt", OTHER).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello, file 1!");
        assert_eq!(headers["content-type"], "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn test_bare_prefix_redirects() {
        let (_root, state) = setup();
        let (status, headers, _) = send(&state, Method::GET, "/videos", ALLOWED).await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(headers["location"], "/videos/");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let (_root, state) = setup();
        let (status, headers, body) = send(&state, Method::HEAD, "/", ALLOWED).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key("content-length"));
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_method_checks() {
        let (_root, state) = setup();
        let (status, headers, _) = send(&state, Method::POST, "/", ALLOWED).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers["allow"], "GET, HEAD, OPTIONS");

        let (status, _, _) = send(&state, Method::OPTIONS, "/", ALLOWED).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_error_statuses_have_plain_bodies() {
        let (_root, state) = setup();

        let (status, _, body) = send(&state, Method::GET, "/missing", ALLOWED).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Failed to read directory");

        let (status, _, body) = send(&state, Method::GET, "/%ff", ALLOWED).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid path");

        let (status, _, body) = send(&state, Method::GET, "/%2e%2e/", ALLOWED).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!body.contains("<html"));
    }
}
