//! Remote path normalization

/// Normalize a remote path to the form used throughout the client.
///
/// # Rules
///
/// - A single leading `/` is always present: `a/b` => `/a/b`
/// - Repeated separators collapse: `/a//b` => `/a/b`
/// - Trailing separators are dropped: `/a/b/` => `/a/b`
/// - Empty input is the root: `` => `/`
pub fn normalize_path(path: &str) -> String {
    let segments = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>();

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

/// Whether a normalized path names the root folder
pub fn is_root(path: &str) -> bool {
    path == "/"
}

/// Path in the form Dropbox expects in request arguments.
///
/// The root folder is addressed by the empty string.
pub(crate) fn to_api_path(normalized: &str) -> &str {
    if is_root(normalized) {
        ""
    } else {
        normalized
    }
}

/// Last segment of a normalized path, or an empty string for the root
pub(crate) fn file_name(normalized: &str) -> &str {
    normalized.rsplit('/').next().unwrap_or_default()
}
