use crate::record::FileRecord;
use serde::Serialize;
use std::collections::BTreeSet;

/// Extensions seen during the scan and the subset currently included in bulk
/// selection. `enabled` never holds an extension that is not in `detected`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtensionRegistry {
    detected: BTreeSet<String>,
    enabled: BTreeSet<String>,
}

impl ExtensionRegistry {
    pub fn from_files<'a>(
        files: impl IntoIterator<Item = &'a FileRecord>,
        defaults: &BTreeSet<String>,
    ) -> Self {
        let detected: BTreeSet<String> = files.into_iter().map(|f| f.extension.clone()).collect();
        let enabled = detected.intersection(defaults).cloned().collect();
        log::debug!(
            "Extension registry: {} detected, enabled {:?}",
            detected.len(),
            enabled
        );
        Self { detected, enabled }
    }

    pub fn detected(&self) -> &BTreeSet<String> {
        &self.detected
    }

    pub fn enabled(&self) -> &BTreeSet<String> {
        &self.enabled
    }

    pub fn is_detected(&self, ext: &str) -> bool {
        self.detected.contains(ext)
    }

    pub fn is_enabled(&self, ext: &str) -> bool {
        self.enabled.contains(ext)
    }

    /// Returns false when `ext` was never detected and nothing changed.
    pub(crate) fn set_enabled(&mut self, ext: &str, enabled: bool) -> bool {
        if !self.detected.contains(ext) {
            log::trace!("Ignoring toggle of undetected extension '{}'", ext);
            return false;
        }
        if enabled {
            self.enabled.insert(ext.to_string());
        } else {
            self.enabled.remove(ext);
        }
        true
    }

    pub(crate) fn enable_all(&mut self) {
        self.enabled = self.detected.clone();
    }

    pub(crate) fn disable_all(&mut self) {
        self.enabled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContentRef;

    fn rec(path: &str) -> FileRecord {
        FileRecord::new(path, 1, ContentRef::new(path))
    }

    #[test]
    fn enabled_is_intersection_of_detected_and_defaults() {
        let files = vec![rec("a.rs"), rec("b.png"), rec("Makefile")];
        let defaults: BTreeSet<String> = [".rs", ".md"].iter().map(|s| s.to_string()).collect();
        let reg = ExtensionRegistry::from_files(&files, &defaults);

        assert_eq!(reg.detected().len(), 3);
        assert!(reg.is_enabled(".rs"));
        assert!(!reg.is_enabled(".md"));
        assert!(!reg.is_enabled(".png"));
    }

    #[test]
    fn undetected_extension_cannot_be_enabled() {
        let files = vec![rec("a.rs")];
        let mut reg = ExtensionRegistry::from_files(&files, &BTreeSet::new());
        assert!(!reg.set_enabled(".py", true));
        assert!(reg.enabled().is_empty());
        assert!(reg.set_enabled(".rs", true));
        assert!(reg.enabled().is_subset(reg.detected()));
    }
}
