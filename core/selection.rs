use indexmap::IndexSet;
use serde::Serialize;

/// Paths currently slated for the context document, in the order they were
/// selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionSet {
    paths: IndexSet<String>,
}

impl SelectionSet {
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, path: &str) -> bool {
        self.paths.insert(path.to_string())
    }

    pub(crate) fn remove(&mut self, path: &str) -> bool {
        self.paths.shift_remove(path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SelectionDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub(crate) fn record(&mut self, path: &str, included: bool, changed: bool) {
        if !changed {
            return;
        }
        if included {
            self.added.push(path.to_string());
        } else {
            self.removed.push(path.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}
