//! Workspace preparation
//!
//! Each run gets its own directory under the configured save path, named
//! after the repository with a uniqueness suffix. Workspaces are never
//! deleted automatically; failed runs leave them behind for inspection.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Create a unique workspace directory for one run and return its
/// absolute path.
///
/// The save root is created (with all parents) when absent. The run
/// directory is named `<repo_full_path with '/' replaced by '-'>-<suffix>`
/// where the suffix is allocated collision-free by `tempfile`.
pub fn prepare(save_root: &Path, repo_full_path: &str) -> Result<PathBuf> {
    let workspace_err = |detail: String| Error::Workspace {
        root: save_root.display().to_string(),
        detail,
    };

    std::fs::create_dir_all(save_root).map_err(|e| workspace_err(e.to_string()))?;

    let prefix = format!("{}-", repo_full_path.replace('/', "-"));
    let dir = tempfile::Builder::new()
        .prefix(&prefix)
        .tempdir_in(save_root)
        .map_err(|e| workspace_err(e.to_string()))?;

    // Persist the directory; it outlives the run.
    let path = dir.keep();
    path.canonicalize().map_err(|e| workspace_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_missing_root() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("nested").join("save");

        let ws = prepare(&root, "group/project").unwrap();
        assert!(ws.is_dir());
        assert!(ws.is_absolute());
    }

    #[test]
    fn test_prepare_sanitizes_repo_path_into_name() {
        let base = tempfile::tempdir().unwrap();
        let ws = prepare(base.path(), "group/sub/project").unwrap();
        let name = ws.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("group-sub-project-"), "got {name}");
    }

    #[test]
    fn test_prepare_twice_yields_distinct_directories() {
        let base = tempfile::tempdir().unwrap();
        let a = prepare(base.path(), "group/project").unwrap();
        let b = prepare(base.path(), "group/project").unwrap();
        assert_ne!(a, b);
        assert!(a.is_dir());
        assert!(b.is_dir());
    }
}
