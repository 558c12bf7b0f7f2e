//! Request error taxonomy
//!
//! Every failure while answering a request ends here and becomes a status
//! code plus a short plain-text body. Nothing is retried.

use crate::http::{build_text_response, HttpResponse};
use hyper::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("caller {0} is not allowed")]
    Forbidden(String),

    #[error("path escapes serving root: {0}")]
    PathEscape(String),

    #[error("malformed path: {0}")]
    MalformedPath(String),

    #[error("nothing to serve at {0}")]
    NotFound(String),

    #[error("failed to read directory {}: {source}", .path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render listing: {0}")]
    Render(#[from] std::fmt::Error),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) | Self::PathEscape(_) => StatusCode::FORBIDDEN,
            Self::MalformedPath(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::FileRead { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
                io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Enumeration { .. } | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client; internal details stay in the log
    pub fn public_message(&self) -> &'static str {
        match self.status() {
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::BAD_REQUEST => "Invalid path",
            StatusCode::NOT_FOUND => "404 Not Found",
            _ => match self {
                Self::Enumeration { .. } => "Failed to read directory",
                Self::Render(_) => "Failed to render listing",
                _ => "Failed to read file",
            },
        }
    }

    pub fn into_response(self) -> HttpResponse {
        build_text_response(self.status(), self.public_message())
    }
}
