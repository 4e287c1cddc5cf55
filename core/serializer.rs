use crate::config::OutputFormat;
use crate::error::Result;
use crate::tree::{TreeNode, build_tree};
use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

pub const HEADER_RULE: &str = "====================================";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
}

/// Renders `paths` as an ASCII tree, with no trailing newline.
pub fn build_tree_string<I, S>(paths: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tree = build_tree(paths);
    let mut lines = Vec::new();
    render_node(&tree, "", &mut lines);
    lines.join("\n")
}

fn render_node(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let keys = node.merged_keys();
    let last = keys.len().saturating_sub(1);
    for (i, key) in keys.into_iter().enumerate() {
        let is_last = i == last;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{}{}{}", prefix, connector, key));
        if let Some(child) = node.folders().get(key) {
            let indent = if is_last { SPACE_INDENT } else { PIPE_INDENT };
            render_node(child, &format!("{}{}", prefix, indent), lines);
        }
    }
}

/// Date in the `M/D/YYYY` form used in the document header.
pub fn header_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

pub fn output_filename(project_name: &str, format: OutputFormat) -> String {
    format!("{}-context.{}", project_name, format.file_extension())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSerializer {
    project_name: String,
    date: String,
}

impl ContextSerializer {
    pub fn new(project_name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            date: date.into(),
        }
    }

    /// Stamped with today's local date.
    pub fn today(project_name: impl Into<String>) -> Self {
        Self::new(project_name, header_date(Local::now().date_naive()))
    }

    /// Files are emitted in the order given; content is copied verbatim.
    pub fn render(&self, files: &[FileContent], structure_only: bool) -> String {
        let tree = build_tree_string(files.iter().map(|f| f.path.as_str()));
        let body_len: usize = if structure_only {
            0
        } else {
            files.iter().map(|f| f.path.len() + f.content.len() + 32).sum()
        };
        let mut output = String::with_capacity(tree.len() + body_len + 128);

        output.push_str(&format!("Folder: {}\n", self.project_name));
        output.push_str(&format!("Date: {}\n", self.date));
        output.push_str(HEADER_RULE);
        output.push_str("\n\n");
        output.push_str("DIRECTORY STRUCTURE:\n");
        output.push_str(&tree);
        output.push_str("\n\n");

        if structure_only {
            return output;
        }

        output.push_str("FILE CONTENTS:\n");
        for file in files {
            output.push_str(&format!("\n--- FILE: {} ---\n", file.path));
            output.push_str(&file.content);
            output.push_str("\n--- END FILE ---\n");
        }
        output
    }

    pub fn export(&self, files: Vec<String>, raw: String, at: DateTime<Utc>) -> ContextExport {
        ContextExport {
            project: self.project_name.clone(),
            files,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            raw,
        }
    }
}

/// JSON download form of a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextExport {
    pub project: String,
    pub files: Vec<String>,
    pub timestamp: String,
    pub raw: String,
}

impl ContextExport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
