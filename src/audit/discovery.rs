//! Directory discovery.

use crate::error::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Remove repeated paths, keeping the first occurrence of each.
pub fn dedup_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(|p| p.as_ref().to_path_buf())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// The directories to audit for `targets`.
///
/// Without `recursive` the targets are returned as given. Otherwise every
/// target is walked and each directory found is returned; entries whose base
/// name is listed in `ignore` are skipped together with everything below
/// them.
///
/// # Errors
///
/// Returns `DirectoryWalk` if a target cannot be walked.
pub fn discover_directories(
    targets: &[PathBuf],
    recursive: bool,
    ignore: &[String],
) -> Result<Vec<PathBuf>> {
    if !recursive {
        return Ok(dedup_paths(targets));
    }

    let mut directories = Vec::new();

    for root in targets {
        tracing::debug!(root = %root.display(), "Walking directory tree");

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry, ignore));

        for entry in walker {
            let entry = entry.map_err(|e| {
                crate::err!(DirectoryWalk {
                    path: root.clone(),
                    message: e.to_string(),
                })
            })?;

            if entry.file_type().is_dir() {
                directories.push(entry.into_path());
            }
        }
    }

    let directories = dedup_paths(&directories);
    tracing::debug!(count = directories.len(), "Discovered directories");
    Ok(directories)
}

fn is_ignored(entry: &DirEntry, ignore: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    let ignored = ignore.iter().any(|i| *i == name);
    if ignored {
        tracing::trace!(path = %entry.path().display(), "Skipping ignored path");
    }
    ignored
}
