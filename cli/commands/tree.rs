use crate::cli_args::TreeArgs;
use crate::output::{human_size, print_selection_tree};
use crate::{LoadedProject, open_project};
use anyhow::Result;
use colored::*;
use folder2context_core::Estimator;

pub fn handle_tree_command(args: TreeArgs, quiet: bool) -> Result<()> {
    let LoadedProject {
        config, project, ..
    } = open_project(&args.project_config, &args.selection, None)?;

    let tree = if args.selected_only {
        project.selected_tree()
    } else {
        project.tree()
    };

    if !quiet {
        println!(
            "{} {}  {} files  {} folders",
            "Folder:".green().bold(),
            project.name().cyan(),
            project.files().len().to_string().cyan(),
            project.folder_count().to_string().cyan()
        );
    }
    if tree.is_empty() {
        println!("{}", "(nothing to show)".yellow());
        return Ok(());
    }
    print_selection_tree(&project, &tree);

    if !quiet {
        let stats = project.stats(&Estimator::from_config(&config.estimate));
        println!(
            "\n{} {} selected, {}, ~{} tokens",
            "Selection:".green().bold(),
            stats.count.to_string().cyan(),
            human_size(stats.total_bytes).cyan(),
            stats.tokens.to_string().cyan()
        );
    }
    Ok(())
}
