//! File path helpers for topology documents.

use std::path::{Path, PathBuf};

/// Append `.{extension}` when the file name has none
///
/// A trailing dot counts as "no extension": `net.` becomes `net.npgi`.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use topoedit::utils::paths::with_default_extension;
///
/// assert_eq!(with_default_extension(Path::new("out/net"), "npgi"), PathBuf::from("out/net.npgi"));
/// assert_eq!(with_default_extension(Path::new("out/net.json"), "npgi"), PathBuf::from("out/net.json"));
/// ```
pub fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    match path.extension() {
        Some(ext) if !ext.is_empty() => path.to_path_buf(),
        _ => path.with_extension(extension),
    }
}

/// Topology ID derived from a file path: the file name up to its first dot
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

/// Whether `name` names a single entry inside a directory
///
/// Separators, NUL and the `.`/`..` entries are refused, so joining the name
/// onto a directory can never leave it.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
