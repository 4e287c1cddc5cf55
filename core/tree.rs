use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Folder/file hierarchy derived from a set of `/`-separated paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    files: BTreeSet<String>,
    folders: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    pub fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    pub fn folders(&self) -> &BTreeMap<String, TreeNode> {
        &self.folders
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }

    /// Descends along `folder` (`/`-separated); `""` is this node.
    pub fn find(&self, folder: &str) -> Option<&TreeNode> {
        folder
            .split('/')
            .filter(|seg| !seg.is_empty())
            .try_fold(self, |node, seg| node.folders.get(seg))
    }

    /// Folder and file names merged into a single key list, ordered by
    /// UTF-16 code units. A name used by both a file and a folder shows up once.
    pub fn merged_keys(&self) -> Vec<&str> {
        let keys: BTreeSet<&str> = self
            .files
            .iter()
            .chain(self.folders.keys())
            .map(String::as_str)
            .collect();
        let mut keys: Vec<&str> = keys.into_iter().collect();
        keys.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
        keys
    }

    /// Number of folders at or below this node, excluding the node itself.
    pub fn folder_count(&self) -> usize {
        self.folders
            .values()
            .map(|child| 1 + child.folder_count())
            .sum()
    }

    fn insert(&mut self, path: &str) {
        let mut segments: Vec<&str> = path.split('/').collect();
        let Some(leaf) = segments.pop() else {
            return;
        };
        let mut node = self;
        for seg in segments {
            node = node.folders.entry(seg.to_string()).or_default();
        }
        node.files.insert(leaf.to_string());
    }
}

pub fn build_tree<I, S>(paths: I) -> TreeNode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = TreeNode::default();
    let mut count = 0usize;
    for path in paths {
        let path = path.as_ref();
        if path.is_empty() {
            continue;
        }
        root.insert(path);
        count += 1;
    }
    log::trace!("Built tree from {} paths", count);
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_prefixes_share_a_folder() {
        let tree = build_tree(["src/a.js", "src/b.js", "readme.md"]);
        assert_eq!(tree.files().len(), 1);
        assert!(tree.files().contains("readme.md"));
        let src = tree.find("src").expect("src folder");
        assert_eq!(src.files().len(), 2);
        assert!(src.folders().is_empty());
    }

    #[test]
    fn order_does_not_change_the_tree() {
        let paths = ["a/b/c.txt", "a/d.txt", "e.txt", "a/b/f/g.txt", "z/y.rs"];
        let forward = build_tree(paths);
        let mut reversed = paths.to_vec();
        reversed.reverse();
        let rotated: Vec<&str> = paths.iter().cycle().skip(2).take(paths.len()).copied().collect();

        assert_eq!(forward, build_tree(reversed));
        assert_eq!(forward, build_tree(rotated));
    }

    #[test]
    fn find_walks_nested_folders() {
        let tree = build_tree(["a/b/c/d.txt"]);
        assert!(tree.find("a/b/c").is_some());
        assert!(tree.find("a/x").is_none());
        assert_eq!(tree.find("").map(TreeNode::folder_count), Some(3));
    }

    #[test]
    fn merged_keys_order_by_utf16_code_units() {
        let tree = build_tree(["\u{FF5E}.txt", "\u{1F600}.txt", "a.txt"]);
        assert_eq!(
            tree.merged_keys(),
            vec!["a.txt", "\u{1F600}.txt", "\u{FF5E}.txt"]
        );
    }

    #[test]
    fn merged_keys_interleave_files_and_folders() {
        let tree = build_tree(["src/a.js", "readme.md", "Zeta.txt", "lib/x.rs"]);
        assert_eq!(tree.merged_keys(), vec!["Zeta.txt", "lib", "readme.md", "src"]);
    }
}
