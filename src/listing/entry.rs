//! Directory enumeration

use super::path::{public_href, ResolvedPath};
use crate::error::RequestError;
use crate::logger;
use chrono::{DateTime, Local};
use std::time::SystemTime;
use tokio::fs;

const MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One listed file or folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    /// Public URL path under the static prefix
    pub href: String,
    pub is_dir: bool,
    /// Last modification time, `None` if metadata could not be read
    pub modified: Option<String>,
}

/// Everything the listing page shows
#[derive(Debug, Clone, Default)]
pub struct PageModel {
    /// Sub-path being listed, empty for the root
    pub sub_path: String,
    /// Entries in enumeration order (not sorted)
    pub entries: Vec<DirectoryEntry>,
}

/// Names starting with `.` are hidden; this also covers `._` metadata files
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(MODIFIED_FORMAT).to_string()
}

/// List the immediate, non-hidden entries of `dir`
///
/// Entries whose names are not valid UTF-8 are skipped with a warning.
/// Only failing to open or iterate the directory is an error; a failed
/// metadata read just leaves that entry without a timestamp.
pub async fn read_entries(
    dir: &ResolvedPath,
    static_prefix: &str,
) -> Result<Vec<DirectoryEntry>, RequestError> {
    let enumeration_error = |source| RequestError::Enumeration {
        path: dir.absolute.clone(),
        source,
    };

    let mut read_dir = fs::read_dir(&dir.absolute)
        .await
        .map_err(enumeration_error)?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await.map_err(enumeration_error)? {
        // Request paths are decoded as UTF-8, so such a name could never be fetched
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                logger::log_warning(&format!(
                    "Skipping entry with non-UTF-8 name in {}: {raw:?}",
                    dir.absolute.display()
                ));
                continue;
            }
        };
        if is_hidden(&name) {
            continue;
        }

        // Follow symlinks so a linked folder lists as a folder
        let (is_dir, modified) = match fs::metadata(entry.path()).await {
            Ok(meta) => (meta.is_dir(), meta.modified().ok().map(format_modified)),
            Err(_) => {
                let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
                (is_dir, None)
            }
        };

        entries.push(DirectoryEntry {
            href: public_href(static_prefix, dir, &name, is_dir),
            name,
            is_dir,
            modified,
        });
    }

    Ok(entries)
}
