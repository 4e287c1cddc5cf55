use crate::cli_args::SearchArgs;
use crate::output::human_size;
use crate::{LoadedProject, open_project};
use anyhow::Result;
use colored::*;
use std::collections::BTreeSet;

pub fn handle_search_command(args: SearchArgs, quiet: bool) -> Result<()> {
    let LoadedProject { project, .. } =
        open_project(&args.project_config, &args.selection, None)?;

    let filters: BTreeSet<String> = args.ext.iter().cloned().collect();
    let hits = project.search(&args.query, &filters);
    log::debug!("Search '{}' matched {} files", args.query, hits.len());

    if hits.is_empty() {
        if !quiet {
            println!("{}", format!("No files match '{}'.", args.query).yellow());
        }
        return Ok(());
    }
    for file in &hits {
        let marker = if project.is_selected(&file.path) {
            "[x]".green()
        } else {
            "[ ]".dimmed()
        };
        println!(
            "{} {} {}",
            marker,
            file.path,
            format!("({})", human_size(file.size)).dimmed()
        );
    }
    if !quiet {
        println!("\n{} {}", hits.len().to_string().cyan(), "matching files".green());
    }
    Ok(())
}
