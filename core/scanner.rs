use crate::config::ScanConfig;
use crate::error::{AppError, Result};
use crate::record::{ContentRef, FileRecord};
use ignore::{Walk, WalkBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub struct ScanEntry {
    pub name: String,
    /// `/`-separated, relative to the scan root.
    pub path: String,
    pub size: u64,
    pub content_ref: ContentRef,
    pub is_dir: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanOptions {
    pub ignore_names: HashSet<String>,
    pub use_gitignore: bool,
}

impl ScanOptions {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            ignore_names: config.ignore_dirs.iter().cloned().collect(),
            use_gitignore: config.use_gitignore,
        }
    }
}

pub trait DirectoryScanner {
    /// Walks `root` to completion. Fails with [`AppError::ScanCancelled`] if
    /// `cancel` fires before the walk finishes.
    fn scan(&self, root: &Path, cancel: &CancelToken) -> Result<Vec<ScanEntry>>;
}

#[derive(Debug, Clone, Default)]
pub struct FsScanner {
    options: ScanOptions,
}

impl FsScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Lazily walks `root` depth-first, siblings in file-name order.
    pub fn entries(&self, root: &Path, cancel: &CancelToken) -> Result<ScanEntries> {
        check_root(root)?;

        let mut builder = WalkBuilder::new(root);
        builder.standard_filters(false);
        builder.follow_links(false);
        if self.options.use_gitignore {
            builder.ignore(true);
            builder.git_ignore(true);
            builder.git_exclude(true);
            builder.git_global(true);
            builder.parents(true);
            builder.require_git(false);
        }
        builder.sort_by_file_name(|a, b| a.cmp(b));

        let ignore_names = self.options.ignore_names.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            let keep = !ignore_names.contains(name.as_ref());
            if !keep {
                log::trace!("Skipping ignored entry: {}", entry.path().display());
            }
            keep
        });
        log::debug!(
            "Scanner configured (gitignore: {}, {} ignored names)",
            self.options.use_gitignore,
            self.options.ignore_names.len()
        );

        Ok(ScanEntries {
            root: root.to_path_buf(),
            walk: builder.build(),
            cancel: cancel.clone(),
            finished: false,
        })
    }
}

impl DirectoryScanner for FsScanner {
    fn scan(&self, root: &Path, cancel: &CancelToken) -> Result<Vec<ScanEntry>> {
        log::info!("Scanning directory: {}", root.display());
        let entries = self.entries(root, cancel)?.collect::<Result<Vec<_>>>()?;
        log::info!("Scan complete. Found {} entries.", entries.len());
        Ok(entries)
    }
}

fn check_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|e| AppError::ScanFailed {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !metadata.is_dir() {
        return Err(AppError::ScanFailed {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    fs::read_dir(root).map_err(|e| AppError::ScanFailed {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Iterator over the entries of one scan. Yields a single
/// `Err(ScanCancelled)` and then stops once the token fires.
pub struct ScanEntries {
    root: PathBuf,
    walk: Walk,
    cancel: CancelToken,
    finished: bool,
}

impl Iterator for ScanEntries {
    type Item = Result<ScanEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if self.cancel.is_cancelled() {
                log::debug!("Scan of {} cancelled", self.root.display());
                self.finished = true;
                return Some(Err(AppError::ScanCancelled));
            }
            let entry = match self.walk.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Error walking directory: {}", e);
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() && !file_type.is_dir() {
                log::trace!("Skipping special entry: {}", entry.path().display());
                continue;
            }
            let Some(relative) = pathdiff::diff_paths(entry.path(), &self.root) else {
                log::warn!("Could not get relative path for: {}", entry.path().display());
                continue;
            };
            let size = if file_type.is_file() {
                match entry.metadata() {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        log::warn!("Skipping {}: {}", entry.path().display(), e);
                        continue;
                    }
                }
            } else {
                0
            };
            let scanned = ScanEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: to_slash_path(&relative),
                size,
                content_ref: ContentRef::new(entry.path()),
                is_dir: file_type.is_dir(),
            };
            log::trace!("Walked path: {}", scanned.path);
            return Some(Ok(scanned));
        }
    }
}

fn to_slash_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn into_records(entries: Vec<ScanEntry>) -> Vec<FileRecord> {
    entries
        .into_iter()
        .filter(|e| !e.is_dir)
        .map(|e| FileRecord::new(e.path, e.size, e.content_ref))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("src/b.rs"), "fn b() {}").unwrap();
        fs::write(root.join("src/a.rs"), "fn a() {}").unwrap();
        fs::write(root.join("src/nested/c.md"), "# c").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(root.join("README.md"), "hello").unwrap();
        dir
    }

    fn scanner() -> FsScanner {
        FsScanner::new(ScanOptions {
            ignore_names: ["node_modules".to_string()].into_iter().collect(),
            use_gitignore: false,
        })
    }

    #[test]
    fn walks_depth_first_in_name_order_skipping_ignored() {
        let dir = fixture();
        let entries = scanner().scan(dir.path(), &CancelToken::new()).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["README.md", "src", "src/a.rs", "src/b.rs", "src/nested", "src/nested/c.md"]
        );

        let readme = &entries[0];
        assert_eq!(readme.name, "README.md");
        assert_eq!(readme.size, 5);
        assert!(!readme.is_dir);
        assert!(entries[1].is_dir);
    }

    #[test]
    fn records_keep_only_files() {
        let dir = fixture();
        let entries = scanner().scan(dir.path(), &CancelToken::new()).unwrap();
        let records = into_records(entries);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| !r.path.starts_with("node_modules")));
        assert_eq!(records[1].extension, ".rs");
    }

    #[test]
    fn cancelled_token_aborts_scan() {
        let dir = fixture();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = scanner().scan(dir.path(), &cancel).unwrap_err();
        assert!(err.is_cancellation());
    }

    #[test]
    fn missing_root_is_scan_failed() {
        let dir = tempdir().unwrap();
        let err = scanner()
            .scan(&dir.path().join("missing"), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, AppError::ScanFailed { .. }));
    }

    #[test]
    fn file_root_is_scan_failed() {
        let dir = fixture();
        let err = scanner()
            .scan(&dir.path().join("README.md"), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, AppError::ScanFailed { .. }));
    }
}
