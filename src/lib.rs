//! Minimal file-listing and static-file server.
//!
//! The listing page (`/`, `/<sub-path>`) shows the entries of the serving
//! root to one allowed caller address; files themselves are served below a
//! fixed prefix (`/videos/` by default).

pub mod config;
pub mod discovery;
pub mod error;
pub mod handler;
pub mod http;
pub mod listing;
pub mod logger;
pub mod server;
