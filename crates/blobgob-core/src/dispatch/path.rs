//! Local destination path for a blob name.

use std::path::{Path, PathBuf};

/// Joins `blob_name` onto `root` after lexical normalisation.
///
/// - `/` and `\` both separate components
/// - empty and `.` components are dropped
/// - `..` removes the previous component but never climbs above `root`
///
/// Returns `None` when nothing remains (e.g. `"/"`, `".."`).
pub fn local_path(root: &Path, blob_name: &str) -> Option<PathBuf> {
    let mut parts: Vec<&str> = Vec::new();
    for part in blob_name.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return None;
    }

    let mut path = root.to_path_buf();
    path.extend(parts);
    Some(path)
}
