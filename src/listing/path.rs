//! Request path resolution
//!
//! Maps a URL path onto the serving root and refuses anything that lands
//! outside it. Resolution is lexical: `.` and `..` are folded without
//! touching the filesystem, so the answer does not depend on whether the
//! target exists.

use crate::error::RequestError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path, PathBuf};

/// Characters escaped inside one URL path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A request path resolved under the serving root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Absolute, normalized filesystem path
    pub absolute: PathBuf,
    /// Components below the root, in order (empty for the root itself)
    pub segments: Vec<String>,
}

impl ResolvedPath {
    /// Relative sub-path joined with `/`, e.g. `x/y`
    pub fn sub_path(&self) -> String {
        self.segments.join("/")
    }
}

/// Percent-decode a raw URL path, rejecting invalid UTF-8 and NUL bytes
pub fn decode_url_path(raw: &str) -> Result<String, RequestError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| RequestError::MalformedPath(raw.to_string()))?;
    if decoded.contains('\0') {
        return Err(RequestError::MalformedPath(raw.to_string()));
    }
    Ok(decoded.into_owned())
}

/// Fold `.` and `..` components; `..` never climbs above the filesystem root
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Absolute, normalized form of `path` (relative paths hang off the current directory)
pub fn absolutize(path: &Path) -> Result<PathBuf, RequestError> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    let cwd = std::env::current_dir()
        .map_err(|e| RequestError::MalformedPath(format!("{}: {e}", path.display())))?;
    Ok(normalize(&cwd.join(path)))
}

/// Resolve a decoded request sub-path (leading `/` allowed) under `root`
///
/// Containment is checked component by component, so a root of
/// `/data/videos` never accepts `/data/videos-backup`.
pub fn resolve_within(root: &Path, requested: &str) -> Result<ResolvedPath, RequestError> {
    let relative = requested.trim_start_matches('/');
    let root_abs = absolutize(root)?;
    let candidate = absolutize(&root.join(relative))?;

    let Ok(rest) = candidate.strip_prefix(&root_abs) else {
        return Err(RequestError::PathEscape(requested.to_string()));
    };

    let segments = rest
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    Ok(ResolvedPath {
        absolute: candidate,
        segments,
    })
}

/// Public URL for `name` inside `dir`, below `prefix` (which ends in `/`)
pub fn public_href(prefix: &str, dir: &ResolvedPath, name: &str, is_dir: bool) -> String {
    let mut href = String::from(prefix);
    for segment in dir.segments.iter().map(String::as_str).chain([name]) {
        if !href.ends_with('/') {
            href.push('/');
        }
        href.extend(utf8_percent_encode(segment, SEGMENT));
    }
    if is_dir {
        href.push('/');
    }
    href
}

/// Listing page URL for a resolved directory, e.g. `/x/y/`
pub fn listing_href(dir: &ResolvedPath) -> String {
    let mut href = String::from("/");
    for segment in &dir.segments {
        href.extend(utf8_percent_encode(segment, SEGMENT));
        href.push('/');
    }
    href
}
