use anyhow::Result;
use glob::Pattern;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::CONFIG_FILE;

/// Directory names never descended into
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", "build", ".cxx", "target", "node_modules"];

/// Expand the given paths into a sorted, de-duplicated list of files.
///
/// Directories are walked recursively, skipping [`DEFAULT_EXCLUDES`], the
/// configuration file and anything matching `exclude`. Files named explicitly
/// are taken as-is. A path that cannot be walked is logged and kept in the
/// list, so the checker reports it as unreadable instead of the run stopping.
pub fn collect_files(paths: &[PathBuf], exclude: &[Pattern]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in paths {
        if !root.exists() {
            return Err(anyhow::anyhow!("Path not found: {}", root.display()));
        }
        if root.is_file() {
            files.push(root.clone());
            continue;
        }

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry, exclude));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    warn!("Failed to walk {}: {}", root.display(), e);
                    if let Some(path) = e.path() {
                        files.push(path.to_path_buf());
                    }
                }
            }
        }
    }

    files.sort();
    files.dedup();
    debug!("Collected {} file(s) from {} path(s)", files.len(), paths.len());
    Ok(files)
}

fn is_excluded(entry: &DirEntry, exclude: &[Pattern]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() && DEFAULT_EXCLUDES.contains(&name.as_ref()) {
        return true;
    }
    if entry.file_type().is_file() && name == CONFIG_FILE {
        return true;
    }

    let path = normalize(entry.path());
    exclude
        .iter()
        .any(|pattern| pattern.matches(&name) || pattern.matches_path(path))
}

/// Strip a leading `./` so patterns can be written relative to the root
fn normalize(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}
