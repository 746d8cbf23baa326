//! Entry point discovery.

use std::path::{Path, PathBuf};

use globset::Glob;
use walkdir::WalkDir;

use crate::bundler::BundleError;

/// Files directly inside `dir` whose names match `pattern`, sorted.
///
/// Hidden files are skipped. An empty result is an error: esbuild would
/// otherwise run with nothing to bundle.
pub(crate) fn discover_entry_points(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, BundleError> {
    if !dir.is_dir() {
        return Err(BundleError::MissingSource {
            path: dir.to_path_buf(),
        });
    }
    let matcher = Glob::new(pattern)
        .map_err(|source| BundleError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| BundleError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if entry.file_type().is_file() && !hidden && matcher.is_match(entry.file_name()) {
            entries.push(entry.into_path());
        }
    }
    entries.sort();

    if entries.is_empty() {
        return Err(BundleError::NoEntryPoints {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use esmhooks_test_support::fixtures::SourceTree;

    #[test]
    fn matches_top_level_files_only_in_sorted_order() -> Result<()> {
        let tree = SourceTree::new(&[
            ("useToggle.tsx", ""),
            ("useStyles.tsx", ""),
            ("types.ts", ""),
            ("nested/useInner.tsx", ""),
            (".hidden.tsx", ""),
        ])?;
        let entries = discover_entry_points(tree.path(), "*.tsx")?;
        assert_eq!(
            entries,
            vec![tree.join("useStyles.tsx"), tree.join("useToggle.tsx")]
        );
        Ok(())
    }

    #[test]
    fn missing_directory_is_reported() {
        let result = discover_entry_points(Path::new("/definitely/missing/src"), "*.tsx");
        assert!(matches!(result, Err(BundleError::MissingSource { .. })));
    }

    #[test]
    fn empty_match_is_reported() -> Result<()> {
        let tree = SourceTree::new(&[("readme.md", "")])?;
        let result = discover_entry_points(tree.path(), "*.tsx");
        assert!(matches!(result, Err(BundleError::NoEntryPoints { .. })));
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_reported() -> Result<()> {
        let tree = SourceTree::new(&[("a.tsx", "")])?;
        let result = discover_entry_points(tree.path(), "[");
        assert!(matches!(result, Err(BundleError::Pattern { .. })));
        Ok(())
    }
}
