use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File filters for one scan: an extension allow-list plus ignore globs
/// matched against the path relative to the scan root.
#[derive(Debug, Clone)]
pub struct ScanFilter {
    extensions: Vec<String>,
    ignore: GlobSet,
}

impl ScanFilter {
    pub fn new(extensions: &[String], ignore_patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in ignore_patterns {
            let glob = Glob::new(pattern).map_err(|source| Error::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let ignore = builder.build().map_err(|source| Error::Pattern {
            pattern: ignore_patterns.join(", "),
            source,
        })?;
        Ok(Self {
            extensions: extensions.to_vec(),
            ignore,
        })
    }

    /// Suffix match, so `.ts` also admits `.d.ts` files (which the default
    /// ignore patterns then exclude).
    fn matches_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        let rel = path.strip_prefix(root).unwrap_or(path);
        self.ignore.is_match(rel)
    }
}

/// Dotfiles and dot-directories are always excluded; the rule is fixed and
/// applies before any caller-supplied pattern. The scan root itself is
/// exempt so a hidden directory can still serve as a root.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Recursively collect command-file candidates under `dir`.
///
/// Traversal is depth-first with siblings sorted by file name, so the
/// discovery order is stable across runs and platforms; this order is
/// observable later as sibling command ordering in help output. A
/// directory matching an ignore pattern prunes its whole subtree.
pub fn scan_dir(dir: &Path, filter: &ScanFilter) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(dir).map_err(|source| Error::Scan {
        dir: dir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::Scan {
            dir: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !is_hidden(entry) && !(entry.depth() > 0 && filter.is_ignored(dir, entry.path()))
        });
    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            dir: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && filter.matches_extension(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Async wrapper: the walk itself runs on the blocking pool so concurrent
/// root scans do not stall the runtime.
pub async fn scan_dir_async(dir: PathBuf, filter: ScanFilter) -> Result<Vec<PathBuf>> {
    let scan_root = dir.clone();
    match tokio::task::spawn_blocking(move || scan_dir(&dir, &filter)).await {
        Ok(result) => result,
        Err(join_error) => Err(Error::Scan {
            dir: scan_root,
            source: std::io::Error::other(join_error),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_EXTENSIONS, DEFAULT_IGNORE_PATTERNS};
    use std::fs;
    use tempfile::TempDir;

    fn default_filter() -> ScanFilter {
        let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        let patterns: Vec<String> = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|s| s.to_string())
            .collect();
        ScanFilter::new(&extensions, &patterns).unwrap()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn rel_paths(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_missing_root_errors_with_directory_name() {
        let err = scan_dir(Path::new("/no/such/commands"), &default_filter()).unwrap_err();
        assert!(err.to_string().contains("/no/such/commands"));
    }

    #[test]
    fn test_hidden_files_and_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".env");
        touch(dir.path(), ".hidden/secret.ts");
        touch(dir.path(), "visible.ts");

        let files = scan_dir(dir.path(), &default_filter()).unwrap();
        assert_eq!(rel_paths(dir.path(), &files), ["visible.ts"]);
    }

    #[test]
    fn test_extension_allow_list_filters_files_not_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "notes.md");
        touch(dir.path(), "db.plain/health.ts");

        let files = scan_dir(dir.path(), &default_filter()).unwrap();
        assert_eq!(rel_paths(dir.path(), &files), ["db.plain/health.ts"]);
    }

    #[test]
    fn test_default_ignore_patterns_prune_tests_and_declarations() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "db/migration.ts");
        touch(dir.path(), "db/migration.test.ts");
        touch(dir.path(), "db/types.d.ts");
        touch(dir.path(), "__tests__/helper.ts");

        let files = scan_dir(dir.path(), &default_filter()).unwrap();
        assert_eq!(rel_paths(dir.path(), &files), ["db/migration.ts"]);
    }

    #[test]
    fn test_results_are_sorted_depth_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "zeta.ts");
        touch(dir.path(), "db/migration.ts");
        touch(dir.path(), "db/health.ts");
        touch(dir.path(), "alpha.ts");

        let files = scan_dir(dir.path(), &default_filter()).unwrap();
        assert_eq!(
            rel_paths(dir.path(), &files),
            ["alpha.ts", "db/health.ts", "db/migration.ts", "zeta.ts"]
        );
    }

    #[test]
    fn test_caller_pattern_prunes_subtree() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "db/internal/debug.ts");
        touch(dir.path(), "db/health.ts");

        let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        let filter = ScanFilter::new(&extensions, &["**/internal".to_string()]).unwrap();
        let files = scan_dir(dir.path(), &filter).unwrap();
        assert_eq!(rel_paths(dir.path(), &files), ["db/health.ts"]);
    }
}
