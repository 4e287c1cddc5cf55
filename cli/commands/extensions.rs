use crate::cli_args::ExtensionsArgs;
use crate::{LoadedProject, open_project};
use anyhow::Result;
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use folder2context_core::Project;
use std::collections::BTreeMap;

pub fn handle_extensions_command(args: ExtensionsArgs) -> Result<()> {
    let LoadedProject { project, .. } =
        open_project(&args.project_config, &args.selection, None)?;

    let counts = extension_counts(&project);
    if counts.is_empty() {
        println!("{}", "(no files found)".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Enabled").fg(Color::Green),
        Cell::new("Extension").fg(Color::Green),
        Cell::new("Files").fg(Color::Green),
        Cell::new("Selected").fg(Color::Green),
    ]);
    for (ext, (total, selected)) in &counts {
        let enabled = project.registry().is_enabled(ext);
        let label = if ext.is_empty() { "(none)" } else { ext.as_str() };
        table.add_row(vec![
            Cell::new(if enabled { "[x]" } else { "[ ]" }).fg(if enabled {
                Color::Green
            } else {
                Color::DarkGrey
            }),
            Cell::new(label).fg(Color::Cyan),
            Cell::new(total).set_alignment(CellAlignment::Right),
            Cell::new(selected).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Extension to (files, selected files), sorted by extension.
fn extension_counts(project: &Project) -> BTreeMap<String, (usize, usize)> {
    let mut counts: BTreeMap<String, (usize, usize)> = project
        .detected_extensions()
        .iter()
        .map(|ext| (ext.clone(), (0, 0)))
        .collect();
    for file in project.files() {
        let entry = counts.entry(file.extension.clone()).or_default();
        entry.0 += 1;
        if project.is_selected(&file.path) {
            entry.1 += 1;
        }
    }
    counts
}
