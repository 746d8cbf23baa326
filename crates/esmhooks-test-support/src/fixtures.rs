//! Scratch source trees for bundler tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Temporary directory populated with source files; removed on drop.
pub struct SourceTree {
    root: TempDir,
}

impl SourceTree {
    /// Create a tree containing `files` as `(relative path, contents)` pairs.
    ///
    /// # Errors
    /// Returns an error when the directory or any file cannot be written.
    pub fn new(files: &[(&str, &str)]) -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("esmhooks-src-")
            .tempdir()
            .context("failed to create source tree")?;
        let tree = Self { root };
        for (name, contents) in files {
            tree.write(name, contents)?;
        }
        Ok(tree)
    }

    /// Root of the tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `name` inside the tree.
    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write (or overwrite) `name`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error when the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tree_writes_nested_files() -> Result<()> {
        let tree = SourceTree::new(&[("index.tsx", "export {}"), ("hooks/a.ts", "x")])?;
        assert_eq!(fs::read_to_string(tree.join("index.tsx"))?, "export {}");
        assert!(tree.join("hooks/a.ts").is_file());
        Ok(())
    }

    #[test]
    fn source_tree_is_removed_on_drop() -> Result<()> {
        let tree = SourceTree::new(&[])?;
        let root = tree.path().to_path_buf();
        drop(tree);
        assert!(!root.exists());
        Ok(())
    }
}
