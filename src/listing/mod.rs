//! Directory listing
//!
//! Authorizes the caller, resolves the requested directory under the
//! serving root and renders its entries as an HTML page.

pub mod entry;
pub mod path;
pub mod render;

pub use entry::{DirectoryEntry, PageModel};
pub use path::{resolve_within, ResolvedPath};

use crate::config::AppState;
use crate::error::RequestError;
use crate::logger;

/// Produce the listing page for `raw_path` (still percent-encoded) on behalf of `caller`
pub async fn list_directory(
    state: &AppState,
    caller: &str,
    raw_path: &str,
) -> Result<String, RequestError> {
    logger::log_info(&format!("Connection from IP: {caller}"));
    if !state.policy.allows(caller) {
        return Err(RequestError::Forbidden(caller.to_string()));
    }

    let listing = &state.config.listing;
    if !listing.allow_subpaths && raw_path != "/" {
        return Err(RequestError::NotFound(raw_path.to_string()));
    }

    let requested = path::decode_url_path(raw_path)?;
    let dir = resolve_within(&listing.root, &requested)?;
    let entries = entry::read_entries(&dir, &listing.static_prefix).await?;

    let page = PageModel {
        sub_path: dir.sub_path(),
        entries,
    };
    Ok(render::render_page(&page)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    const CALLER: &str = "192.168.65.1";

    fn state_for(root: &std::path::Path) -> AppState {
        let mut cfg = Config::default();
        cfg.listing.root = root.to_path_buf();
        cfg.listing.allowed_caller = CALLER.to_string();
        AppState::new(cfg)
    }

    fn sample_root() -> TempDir {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("a.txt"), "a").unwrap();
        fs::write(root.path().join(".hidden"), "h").unwrap();
        fs::create_dir_all(root.path().join("sub/x/y")).unwrap();
        fs::write(root.path().join("sub/x/y/deep.mp4"), "v").unwrap();
        root
    }

    #[tokio::test]
    async fn test_lists_root() {
        let root = sample_root();
        let html = list_directory(&state_for(root.path()), CALLER, "/")
            .await
            .unwrap();
        assert!(html.contains(r#"href="/videos/a.txt""#));
        assert!(html.contains(r#"href="/videos/sub/""#));
        assert!(!html.contains(".hidden"));
    }

    #[tokio::test]
    async fn test_lists_sub_path() {
        let root = sample_root();
        let html = list_directory(&state_for(root.path()), CALLER, "/sub/x/y")
            .await
            .unwrap();
        assert!(html.contains(r#"href="/videos/sub/x/y/deep.mp4""#));
    }

    #[tokio::test]
    async fn test_other_caller_forbidden_before_filesystem() {
        // Root does not exist: a 403 proves the filesystem was never read
        let state = state_for(std::path::Path::new("/definitely/not/here"));
        let err = list_directory(&state, "10.0.0.9", "/").await.unwrap_err();
        assert!(matches!(err, RequestError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_escape_forbidden_whether_or_not_target_exists() {
        let parent = TempDir::new().unwrap();
        let root = parent.path().join("videos");
        fs::create_dir(&root).unwrap();
        fs::create_dir(parent.path().join("videos-backup")).unwrap();
        let state = state_for(&root);

        for raw in ["/../videos-backup", "/../videos-missing", "/%2e%2e/", "/sub/../../.."] {
            let err = list_directory(&state, CALLER, raw).await.unwrap_err();
            assert!(
                matches!(err, RequestError::PathEscape(_)),
                "{raw} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_directory_is_server_error() {
        let root = sample_root();
        let err = list_directory(&state_for(root.path()), CALLER, "/nope")
            .await
            .unwrap_err();
        assert_eq!(err.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_malformed_path_is_bad_request() {
        let root = sample_root();
        let err = list_directory(&state_for(root.path()), CALLER, "/%ff")
            .await
            .unwrap_err();
        assert_eq!(err.status(), hyper::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_root_only_mode() {
        let root = sample_root();
        let mut state = state_for(root.path());
        state.config.listing.allow_subpaths = false;

        assert!(list_directory(&state, CALLER, "/").await.is_ok());
        let err = list_directory(&state, CALLER, "/sub").await.unwrap_err();
        assert!(matches!(err, RequestError::NotFound(_)));

        // Authorization still comes first
        let err = list_directory(&state, "10.0.0.9", "/sub").await.unwrap_err();
        assert!(matches!(err, RequestError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let root = sample_root();
        let mut cfg = Config::default();
        cfg.listing.root = root.path().to_path_buf();
        let state = AppState::with_policy(cfg, |caller: &str| caller.starts_with("10."));

        assert!(list_directory(&state, "10.1.1.1", "/").await.is_ok());
        assert!(list_directory(&state, CALLER, "/").await.is_err());
    }
}
