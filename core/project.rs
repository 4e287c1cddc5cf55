use crate::estimate::{Estimator, Stats};
use crate::record::{FileRecord, is_descendant, normalize_extension};
use crate::registry::ExtensionRegistry;
use crate::selection::{CheckState, SelectionDelta, SelectionSet};
use crate::tree::{self, TreeNode};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionDefaults {
    pub extensions: BTreeSet<String>,
    /// Files larger than this are never picked by bulk operations.
    pub max_file_size: u64,
}

impl Default for SelectionDefaults {
    fn default() -> Self {
        Self {
            extensions: crate::config::DEFAULT_TEXT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 1_000_000,
        }
    }
}

/// One scanned directory together with its selection state.
///
/// Created from a finished scan and replaced as a whole by the next one.
/// Every command is total: unknown paths, folders or extensions simply match
/// nothing.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    files: Vec<FileRecord>,
    index: HashMap<String, usize>,
    selection: SelectionSet,
    registry: ExtensionRegistry,
    max_file_size: u64,
}

impl Project {
    pub fn new(name: impl Into<String>, files: Vec<FileRecord>, defaults: &SelectionDefaults) -> Self {
        let mut index = HashMap::with_capacity(files.len());
        let mut unique = Vec::with_capacity(files.len());
        for file in files {
            if index.contains_key(&file.path) {
                log::warn!("Duplicate path '{}' dropped from project", file.path);
                continue;
            }
            index.insert(file.path.clone(), unique.len());
            unique.push(file);
        }

        let registry = ExtensionRegistry::from_files(&unique, &defaults.extensions);
        let mut project = Self {
            name: name.into(),
            files: unique,
            index,
            selection: SelectionSet::default(),
            registry,
            max_file_size: defaults.max_file_size,
        };

        for file in &project.files {
            if project.registry.is_enabled(&file.extension) && file.size <= project.max_file_size {
                project.selection.insert(&file.path);
            }
        }
        log::debug!(
            "Project '{}' seeded: {} of {} files selected",
            project.name,
            project.selection.len(),
            project.files.len()
        );
        project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&FileRecord> {
        self.index.get(path).map(|&i| &self.files[i])
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn detected_extensions(&self) -> &BTreeSet<String> {
        self.registry.detected()
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selection.contains(path)
    }

    /// Selected records in scan order.
    pub fn selected_files(&self) -> Vec<&FileRecord> {
        self.files
            .iter()
            .filter(|f| self.selection.contains(&f.path))
            .collect()
    }

    pub fn stats(&self, estimator: &Estimator) -> Stats {
        estimator.estimate(self.selected_files())
    }

    pub fn select_file(&mut self, path: &str, included: bool) -> SelectionDelta {
        let mut delta = SelectionDelta::default();
        if self.index.contains_key(path) {
            let changed = self.set_membership(path, included);
            delta.record(path, included, changed);
        } else {
            log::trace!("select_file: unknown path '{}'", path);
        }
        delta
    }

    pub fn select_folder(&mut self, folder: &str, included: bool) -> SelectionDelta {
        let matching: Vec<String> = self
            .files
            .iter()
            .filter(|f| is_descendant(&f.path, folder))
            .map(|f| f.path.clone())
            .collect();
        log::trace!(
            "select_folder('{}', {}): {} files",
            folder,
            included,
            matching.len()
        );
        self.apply(matching, included)
    }

    pub fn toggle_extension(&mut self, ext: &str, included: bool) -> SelectionDelta {
        let ext = normalize_extension(ext);
        if !self.registry.set_enabled(&ext, included) {
            return SelectionDelta::default();
        }
        let matching: Vec<String> = self
            .files
            .iter()
            .filter(|f| f.extension == ext && f.size <= self.max_file_size)
            .map(|f| f.path.clone())
            .collect();
        log::trace!(
            "toggle_extension('{}', {}): {} files",
            ext,
            included,
            matching.len()
        );
        self.apply(matching, included)
    }

    pub fn select_all(&mut self) -> SelectionDelta {
        self.registry.enable_all();
        let target: Vec<String> = self
            .files
            .iter()
            .filter(|f| f.size <= self.max_file_size)
            .map(|f| f.path.clone())
            .collect();
        self.replace_selection(target)
    }

    pub fn deselect_all(&mut self) -> SelectionDelta {
        self.registry.disable_all();
        self.replace_selection(Vec::new())
    }

    pub fn is_folder_fully_selected(&self, folder: &str) -> bool {
        let (total, selected) = self.folder_counts(folder);
        total > 0 && selected == total
    }

    pub fn is_folder_partially_selected(&self, folder: &str) -> bool {
        let (total, selected) = self.folder_counts(folder);
        selected > 0 && selected < total
    }

    pub fn folder_state(&self, folder: &str) -> CheckState {
        let (total, selected) = self.folder_counts(folder);
        match selected {
            0 => CheckState::Unchecked,
            n if n == total => CheckState::Checked,
            _ => CheckState::Indeterminate,
        }
    }

    pub fn tree(&self) -> TreeNode {
        tree::build_tree(self.files.iter().map(|f| f.path.as_str()))
    }

    pub fn selected_tree(&self) -> TreeNode {
        tree::build_tree(self.selection.iter())
    }

    pub fn folder_count(&self) -> usize {
        self.tree().folder_count()
    }

    /// Files whose name contains `query` (case-insensitive) and whose
    /// extension is one of `ext_filters`. No filters means any extension.
    pub fn search(&self, query: &str, ext_filters: &BTreeSet<String>) -> Vec<&FileRecord> {
        let query = query.to_lowercase();
        let filters: BTreeSet<String> = ext_filters.iter().map(|e| normalize_extension(e)).collect();
        self.files
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&query))
            .filter(|f| filters.is_empty() || filters.contains(&f.extension))
            .collect()
    }

    fn folder_counts(&self, folder: &str) -> (usize, usize) {
        self.files
            .iter()
            .filter(|f| is_descendant(&f.path, folder))
            .fold((0, 0), |(total, selected), f| {
                let hit = usize::from(self.selection.contains(&f.path));
                (total + 1, selected + hit)
            })
    }

    fn set_membership(&mut self, path: &str, included: bool) -> bool {
        if included {
            self.selection.insert(path)
        } else {
            self.selection.remove(path)
        }
    }

    fn apply(&mut self, paths: Vec<String>, included: bool) -> SelectionDelta {
        let mut delta = SelectionDelta::default();
        for path in paths {
            let changed = self.set_membership(&path, included);
            delta.record(&path, included, changed);
        }
        delta
    }

    fn replace_selection(&mut self, target: Vec<String>) -> SelectionDelta {
        let keep: BTreeSet<&str> = target.iter().map(String::as_str).collect();
        let mut delta = SelectionDelta::default();
        delta.removed = self
            .selection
            .iter()
            .filter(|p| !keep.contains(p))
            .map(str::to_string)
            .collect();
        for path in &delta.removed {
            self.selection.remove(path);
        }
        for path in &target {
            if self.selection.insert(path) {
                delta.added.push(path.clone());
            }
        }
        delta
    }
}
