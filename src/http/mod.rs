//! HTTP protocol layer module
//!
//! Response builders, range parsing and content types, decoupled from request handling.

pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{
    build_405_response, build_416_response, build_options_response,
    build_redirect_response, build_text_response, HttpResponse,
};
