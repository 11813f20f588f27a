//! Shape checks for relative file paths taken from skill archives.

/// Validate a package-relative file path.
///
/// Returns `None` for empty paths, paths containing `..` or a backslash, and
/// for a bare `/`. A single leading `/` is stripped so rooted paths resolve
/// relative to the package root. Anything else is returned unchanged.
pub fn sanitize_path(path: &str) -> Option<String> {
    if path.is_empty() || path.contains("..") || path.contains('\\') {
        return None;
    }
    let relative = path.strip_prefix('/').unwrap_or(path);
    if relative.is_empty() {
        return None;
    }
    Some(relative.to_string())
}
