use crate::error::{AppError, Result};
use crate::project::{Project, SelectionDefaults};
use crate::reader::ContentReader;
use crate::scanner::{CancelToken, DirectoryScanner, into_records};
use crate::serializer::{ContextSerializer, FileContent};
use rayon::prelude::*;
use std::path::Path;

/// A new scan only replaces the project once it has fully succeeded.
#[derive(Debug, Default)]
pub struct Session {
    project: Option<Project>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Scans `root` and swaps in the resulting project. On error (including
    /// cancellation) the previously open project stays in place.
    pub fn open(
        &mut self,
        root: &Path,
        name: &str,
        scanner: &dyn DirectoryScanner,
        cancel: &CancelToken,
        defaults: &SelectionDefaults,
    ) -> Result<&mut Project> {
        let entries = scanner.scan(root, cancel)?;
        let project = Project::new(name, into_records(entries), defaults);
        log::debug!(
            "Opened '{}' with {} files ({} extensions detected)",
            project.name(),
            project.files().len(),
            project.detected_extensions().len()
        );
        Ok(self.project.insert(project))
    }

    pub fn close(&mut self) -> Option<Project> {
        self.project.take()
    }
}

/// Reads every selected file in parallel, in scan order. Any failure aborts
/// the whole batch.
pub fn read_selected<R: ContentReader>(project: &Project, reader: &R) -> Result<Vec<FileContent>> {
    let selected = project.selected_files();
    if selected.is_empty() {
        return Err(AppError::EmptySelection);
    }
    log::debug!("Reading {} selected files", selected.len());
    selected
        .par_iter()
        .map(|record| {
            reader.read(&record.content_ref).map(|content| FileContent {
                path: record.path.clone(),
                content,
            })
        })
        .collect()
}

/// Builds the context document for the current selection.
/// Fails with [`AppError::EmptySelection`] before touching any file. In
/// structure-only mode no content is read.
pub fn generate_context<R: ContentReader>(
    project: &Project,
    reader: &R,
    serializer: &ContextSerializer,
    structure_only: bool,
) -> Result<String> {
    let files = if structure_only {
        let selected = project.selected_files();
        if selected.is_empty() {
            return Err(AppError::EmptySelection);
        }
        selected
            .into_iter()
            .map(|record| FileContent {
                path: record.path.clone(),
                content: String::new(),
            })
            .collect()
    } else {
        read_selected(project, reader)?
    };
    let output = serializer.render(&files, structure_only);
    log::debug!("Generated context of {} bytes", output.len());
    Ok(output)
}

/// Text of one scanned file, whether selected or not.
pub fn preview<R: ContentReader>(project: &Project, path: &str, reader: &R) -> Result<String> {
    let record = project
        .file(path)
        .ok_or_else(|| AppError::InvalidArgument(format!("No scanned file at '{}'", path)))?;
    reader.read(&record.content_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ContentRef, FileRecord};
    use crate::scanner::ScanEntry;
    use std::collections::HashMap;
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryReader {
        files: HashMap<PathBuf, String>,
        reads: AtomicUsize,
    }

    impl MemoryReader {
        fn with(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(p, c)| (PathBuf::from(p), c.to_string()))
                    .collect(),
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl ContentReader for MemoryReader {
        fn read(&self, content_ref: &ContentRef) -> Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.files
                .get(content_ref.location())
                .cloned()
                .ok_or_else(|| AppError::ReadFailed {
                    path: content_ref.location().display().to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "missing"),
                })
        }
    }

    struct FakeScanner {
        outcome: fn() -> Result<Vec<ScanEntry>>,
    }

    impl DirectoryScanner for FakeScanner {
        fn scan(&self, _root: &Path, _cancel: &CancelToken) -> Result<Vec<ScanEntry>> {
            (self.outcome)()
        }
    }

    fn entry(path: &str, size: u64, is_dir: bool) -> ScanEntry {
        ScanEntry {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            size,
            content_ref: ContentRef::new(path),
            is_dir,
        }
    }

    fn sample_entries() -> Result<Vec<ScanEntry>> {
        Ok(vec![
            entry("src", 0, true),
            entry("src/a.js", 100, false),
            entry("src/b.js", 200, false),
            entry("readme.md", 50, false),
        ])
    }

    fn defaults() -> SelectionDefaults {
        SelectionDefaults {
            extensions: [".js", ".md"].iter().map(|s| s.to_string()).collect(),
            max_file_size: 1_000,
        }
    }

    fn sample_project() -> Project {
        let files = vec![
            FileRecord::new("src/a.js", 100, ContentRef::new("src/a.js")),
            FileRecord::new("src/b.js", 200, ContentRef::new("src/b.js")),
            FileRecord::new("readme.md", 50, ContentRef::new("readme.md")),
        ];
        Project::new("demo", files, &defaults())
    }

    #[test]
    fn open_replaces_project_on_success() {
        let mut session = Session::new();
        let scanner = FakeScanner {
            outcome: sample_entries,
        };
        let project = session
            .open(Path::new("/x"), "demo", &scanner, &CancelToken::new(), &defaults())
            .unwrap();
        assert_eq!(project.files().len(), 3);
        assert_eq!(project.selection().len(), 3);
    }

    #[test]
    fn failed_or_cancelled_scan_keeps_previous_project() {
        let mut session = Session::new();
        let ok = FakeScanner {
            outcome: sample_entries,
        };
        session
            .open(Path::new("/x"), "first", &ok, &CancelToken::new(), &defaults())
            .unwrap();

        let cancelled = FakeScanner {
            outcome: || Err(AppError::ScanCancelled),
        };
        let err = session
            .open(Path::new("/y"), "second", &cancelled, &CancelToken::new(), &defaults())
            .unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(session.project().map(Project::name), Some("first"));

        let failed = FakeScanner {
            outcome: || {
                Err(AppError::ScanFailed {
                    path: PathBuf::from("/z"),
                    reason: "denied".to_string(),
                })
            },
        };
        assert!(
            session
                .open(Path::new("/z"), "third", &failed, &CancelToken::new(), &defaults())
                .is_err()
        );
        assert_eq!(session.project().map(Project::name), Some("first"));
    }

    #[test]
    fn generates_document_in_scan_order() {
        let project = sample_project();
        let reader = MemoryReader::with(&[
            ("src/a.js", "let a = 1;"),
            ("src/b.js", "let b = 2;"),
            ("readme.md", "# Demo"),
        ]);
        let serializer = ContextSerializer::new("demo", "1/1/2025");
        let doc = generate_context(&project, &reader, &serializer, false).unwrap();

        assert!(doc.contains("├── readme.md\n└── src\n    ├── a.js\n    └── b.js\n\n"));
        let a = doc.find("--- FILE: src/a.js ---").unwrap();
        let b = doc.find("--- FILE: src/b.js ---").unwrap();
        let r = doc.find("--- FILE: readme.md ---").unwrap();
        assert!(a < b && b < r);
        assert!(doc.contains("let b = 2;\n--- END FILE ---"));
    }

    #[test]
    fn empty_selection_fails_before_reading() {
        let mut project = sample_project();
        project.deselect_all();
        let reader = MemoryReader::default();
        let serializer = ContextSerializer::new("demo", "1/1/2025");

        let err = generate_context(&project, &reader, &serializer, false).unwrap_err();
        assert!(matches!(err, AppError::EmptySelection));
        let err = generate_context(&project, &reader, &serializer, true).unwrap_err();
        assert!(matches!(err, AppError::EmptySelection));
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn one_failed_read_aborts_generation() {
        let project = sample_project();
        let reader = MemoryReader::with(&[("src/a.js", "a"), ("readme.md", "r")]);
        let serializer = ContextSerializer::new("demo", "1/1/2025");

        let err = generate_context(&project, &reader, &serializer, false).unwrap_err();
        assert!(matches!(err, AppError::ReadFailed { .. }));
    }

    #[test]
    fn structure_only_reads_nothing() {
        let project = sample_project();
        let reader = MemoryReader::default();
        let serializer = ContextSerializer::new("demo", "1/1/2025");

        let doc = generate_context(&project, &reader, &serializer, true).unwrap();
        assert!(doc.ends_with("    └── b.js\n\n"));
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn preview_reads_unselected_files_too() {
        let mut project = sample_project();
        project.select_file("readme.md", false);
        let reader = MemoryReader::with(&[("readme.md", "# Demo")]);

        assert_eq!(preview(&project, "readme.md", &reader).unwrap(), "# Demo");
        let err = preview(&project, "nope.md", &reader).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
