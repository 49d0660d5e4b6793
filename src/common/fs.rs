use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// List the immediate children of `dir`, sorted by file name.
///
/// Only `dir` itself is opened; nothing below it is read. Symlinks are not
/// followed. An unreadable directory yields no children.
pub fn list_children(dir: &Path) -> Vec<DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!("skipping unreadable entry under {}: {}", dir.display(), err);
                None
            }
        })
        .collect()
}
