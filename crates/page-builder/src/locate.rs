//! Filename rewriting and lookup.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use slidershow_common::config::FilenameConfig;
use walkdir::{DirEntry, WalkDir};

/// Maps the sheet's filename column to a path on this machine.
#[derive(Debug, Clone, Default)]
pub struct FilenameLocator {
    replace: Vec<(String, String)>,
    search_dirs: Vec<PathBuf>,
}

impl FilenameLocator {
    pub fn new(replace: Vec<(String, String)>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            replace,
            search_dirs,
        }
    }

    pub fn from_config(config: &FilenameConfig) -> Self {
        Self::new(config.replace.clone(), config.search_dirs.clone())
    }

    /// Apply the replacement rules in order.
    ///
    /// `("/mnt/user", "/mnt/foo")`, `("jpg", "JPG")`:
    /// `/mnt/user/dir/img.jpg` → `/mnt/foo/dir/img.JPG`
    pub fn rewrite(&self, filename: &str) -> String {
        self.replace
            .iter()
            .fold(filename.to_string(), |name, (from, to)| name.replace(from, to))
    }

    /// Rewrite `filename`, then look a bare name that does not exist up in
    /// the search directories. The rewritten path is kept when nothing is found.
    pub fn locate(&self, filename: &str) -> PathBuf {
        let path = PathBuf::from(self.rewrite(filename));
        if self.search_dirs.is_empty() || path.exists() || has_dir_component(&path) {
            return path;
        }

        let Some(name) = path.file_name() else {
            return path;
        };
        for dir in &self.search_dirs {
            if let Some(found) = find_file(dir, name) {
                tracing::debug!(
                    filename,
                    found = %found.display(),
                    "Located file in search directory"
                );
                return found;
            }
        }

        tracing::warn!(
            filename = %path.display(),
            search_dirs = ?self.search_dirs,
            "File not found in any search directory"
        );
        path
    }
}

fn has_dir_component(path: &Path) -> bool {
    path.parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty())
}

/// Depth-first search for a file called `name`, entries in name order.
/// Symlinked directories are not followed.
fn find_file(dir: &Path, name: &OsStr) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .find(|entry| !entry.file_type().is_dir() && entry.file_name() == name)
        .map(DirEntry::into_path)
}
