//! Request handler module
//!
//! Routes each request to the static file responder or the listing page.

pub mod listing;
pub mod router;
pub mod static_files;

use crate::error::RequestError;
use crate::http::HttpResponse;
use crate::logger;
use router::RequestContext;

// Re-export main entry point
pub use router::handle_request;

/// Log a failed request and turn it into its plain-text response
fn respond_error(ctx: &RequestContext<'_>, err: RequestError) -> HttpResponse {
    let message = format!("{} {} from {}: {err}", err.status().as_u16(), ctx.path, ctx.caller);
    if err.status().is_server_error() {
        logger::log_error(&message);
    } else {
        logger::log_warning(&message);
    }
    err.into_response()
}
