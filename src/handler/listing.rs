//! Listing page endpoint

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::handler::respond_error;
use crate::http::{response, HttpResponse};
use crate::listing;

pub async fn serve_listing(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    match listing::list_directory(state, &ctx.caller, ctx.path).await {
        Ok(html) => response::build_html_response(html, ctx.is_head),
        Err(e) => respond_error(ctx, e),
    }
}
