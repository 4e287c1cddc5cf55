use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::commands::stats::StatsReport;
use folder2context_core::{CheckState, Project, TreeNode};

const BAR_WIDTH: usize = 30;

pub fn write_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Asks before replacing `path`. Always refuses in quiet mode.
pub fn confirm_overwrite(path: &Path, quiet: bool) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    if quiet {
        anyhow::bail!(
            "Target file '{}' exists. Overwrite prevented in quiet mode.",
            path.display()
        );
    }
    print!(
        "{} '{}' already exists. Overwrite? [{}/{}] ",
        "⚠️".yellow(),
        path.display().to_string().cyan(),
        "y".green(),
        "N".red()
    );
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read user input")?;
    let confirmed = response.trim().eq_ignore_ascii_case("y");
    if !confirmed {
        println!("Save cancelled.");
    }
    Ok(confirmed)
}

/// Best effort: a missing clipboard is reported but never fails the command.
pub fn copy_to_clipboard(content: &str, quiet: bool) -> bool {
    let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(content));
    match result {
        Ok(()) => {
            if !quiet {
                eprintln!("{} Copied to clipboard", "📋".green());
            }
            true
        }
        Err(e) => {
            log::warn!("Clipboard unavailable: {}", e);
            if !quiet {
                eprintln!("{}", "Copy to clipboard failed.".yellow());
            }
            false
        }
    }
}

pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data).map_err(folder2context_core::AppError::from)?;
    write_to_stdout(&content)
}

pub fn human_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

fn marker(state: CheckState) -> ColoredString {
    match state {
        CheckState::Checked => "[x]".green(),
        CheckState::Unchecked => "[ ]".dimmed(),
        CheckState::Indeterminate => "[-]".yellow(),
    }
}

/// Folders first, then files, each level sorted by name.
pub fn print_selection_tree(project: &Project, tree: &TreeNode) {
    let mut lines = Vec::new();
    tree_lines(project, tree, "", 0, &mut lines);
    for line in lines {
        println!("{}", line);
    }
}

fn tree_lines(project: &Project, node: &TreeNode, parent: &str, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (name, child) in node.folders() {
        let full = join_path(parent, name);
        out.push(format!(
            "{}{} {}",
            indent,
            marker(project.folder_state(&full)),
            format!("{}/", name).blue().bold()
        ));
        tree_lines(project, child, &full, depth + 1, out);
    }
    for name in node.files() {
        let full = join_path(parent, name);
        let state = if project.is_selected(&full) {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        };
        let size = project
            .file(&full)
            .map(|f| human_size(f.size))
            .unwrap_or_default();
        out.push(format!(
            "{}{} {} {}",
            indent,
            marker(state),
            name,
            format!("({})", size).dimmed()
        ));
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// `[██████░░░░] 60.0%`, red once past the warning threshold.
pub fn capacity_bar(progress: f64, over_warning: bool) -> String {
    let clamped = progress.clamp(0.0, 1.0);
    let filled = ((clamped * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
    let bar = if over_warning { bar.red() } else { bar.green() };
    format!("[{}] {:.1}%", bar, clamped * 100.0)
}

pub fn print_stats_pretty(report: &StatsReport) {
    println!();
    println!("{}", " Selection Summary ".green().bold().underline());
    println!("{:<20} {}", "Project:".green(), report.project.cyan());
    println!(
        "{:<20} {} of {}",
        "Selected Files:".green(),
        report.selected_files.to_string().cyan(),
        report.total_files
    );
    println!(
        "{:<20} {}",
        "Total Size:".green(),
        report.total_size_readable.cyan()
    );
    println!(
        "{:<20} {} / {}",
        "Est. Tokens:".green(),
        report.estimated_tokens.to_string().cyan(),
        report.token_budget
    );
    println!(
        "{:<20} {}",
        "Capacity:".green(),
        capacity_bar(report.capacity, report.over_warning)
    );
    if report.over_warning {
        println!(
            "{}",
            "Warning: the selection is close to or over the token budget.".red()
        );
    }

    if report.files.is_empty() {
        println!("\n{}", "(No files selected)".yellow());
    } else {
        println!("\n{}", " Selected Files ".green().bold().underline());
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Path").fg(Color::Green),
            Cell::new("Size").fg(Color::Green),
            Cell::new("Tokens").fg(Color::Green),
        ]);
        for file in &report.files {
            table.add_row(vec![
                Cell::new(&file.path).fg(Color::Cyan),
                Cell::new(&file.size_readable)
                    .set_alignment(CellAlignment::Right)
                    .fg(Color::DarkGrey),
                Cell::new(file.estimated_tokens).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_bar_is_clamped() {
        colored::control::set_override(false);
        assert!(capacity_bar(0.0, false).ends_with("] 0.0%"));
        assert!(capacity_bar(2.0, true).ends_with("] 100.0%"));
        assert!(capacity_bar(0.5, false).contains(&"█".repeat(15)));
    }

    #[test]
    fn join_path_handles_root() {
        assert_eq!(join_path("", "src"), "src");
        assert_eq!(join_path("src", "a.rs"), "src/a.rs");
    }
}
