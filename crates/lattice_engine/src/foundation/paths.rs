//! Path handling for script-supplied file names
//!
//! Element factories take paths from untrusted script code. Every path
//! is rebased onto the configured working directory, and parent-directory
//! segments are stripped so scripts cannot climb out of it.

use std::path::{Component, Path, PathBuf};

/// Strip `..` and `.` segments and any root/drive prefix from a user path.
///
/// The result is always a relative path made of normal components only.
#[must_use]
pub fn sanitize(user_path: &str) -> PathBuf {
    let mut clean = PathBuf::new();
    for component in Path::new(user_path).components() {
        if let Component::Normal(part) = component {
            clean.push(part);
        }
    }
    clean
}

/// Resolve a script-supplied path against the engine working directory.
#[must_use]
pub fn resolve(working_dir: &Path, user_path: &str) -> PathBuf {
    working_dir.join(sanitize(user_path))
}

/// Case-insensitive extension check.
#[must_use]
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
