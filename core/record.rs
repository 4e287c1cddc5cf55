use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRef(PathBuf);

impl ContentRef {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        ContentRef(location.into())
    }

    pub fn location(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub extension: String,
    pub size: u64,
    #[serde(skip)]
    pub content_ref: ContentRef,
}

impl FileRecord {
    /// Builds a record from a `/`-separated relative path. The name and
    /// extension are always derived from the path, never supplied.
    pub fn new(path: impl Into<String>, size: u64, content_ref: ContentRef) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        let extension = extension_of(&name);
        Self {
            path,
            name,
            extension,
            size,
            content_ref,
        }
    }

    pub fn is_within(&self, folder: &str) -> bool {
        is_descendant(&self.path, folder)
    }
}

/// Lowercased tail of `name` starting at its last `.`, or `""` when there is none.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Canonical form of a user-supplied extension: lowercase with a leading dot.
/// The empty string stands for "no extension" and is kept as is.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

pub fn is_descendant(path: &str, folder: &str) -> bool {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        return false;
    }
    path.len() > folder.len() + 1
        && path.starts_with(folder)
        && path.as_bytes()[folder.len()] == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_and_keeps_dot() {
        assert_eq!(extension_of("Main.RS"), ".rs");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".gitignore"), ".gitignore");
    }

    #[test]
    fn record_derives_name_and_extension_from_path() {
        let rec = FileRecord::new("src/lib/Util.TS", 10, ContentRef::new("/tmp/x"));
        assert_eq!(rec.name, "Util.TS");
        assert_eq!(rec.extension, ".ts");

        let top = FileRecord::new("LICENSE", 3, ContentRef::new("/tmp/y"));
        assert_eq!(top.name, "LICENSE");
        assert_eq!(top.extension, "");
    }

    #[test]
    fn normalize_adds_dot_and_lowercases() {
        assert_eq!(normalize_extension("MD"), ".md");
        assert_eq!(normalize_extension(".Js"), ".js");
        assert_eq!(normalize_extension("  "), "");
    }

    #[test]
    fn descendant_requires_separator_boundary() {
        assert!(is_descendant("src/a.js", "src"));
        assert!(is_descendant("src/deep/b.js", "src/"));
        assert!(!is_descendant("srcfile.js", "src"));
        assert!(!is_descendant("src", "src"));
        assert!(!is_descendant("a.js", ""));
    }
}
