use crate::cli_args::GenerateArgs;
use crate::output;
use crate::{LoadedProject, open_project};
use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use folder2context_core::serializer::output_filename;
use folder2context_core::{
    Config, ContextSerializer, Estimator, FsContentReader, OutputFormat, generate_context,
};
use std::path::{Path, PathBuf};

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let LoadedProject {
        root,
        config,
        project,
    } = open_project(
        &args.project_config,
        &args.selection,
        Some(&args.format_output),
    )?;
    let format = config.output_format()?;

    log::info!(
        "Generating context for '{}' ({} files selected)",
        project.name(),
        project.selection().len()
    );
    let serializer = ContextSerializer::today(project.name());
    let document = generate_context(&project, &FsContentReader, &serializer, args.structure_only)
        .context("Failed to generate context")?;

    let estimator = Estimator::from_config(&config.estimate);
    let doc_stats = estimator.estimate_text(&document);

    let content = match format {
        OutputFormat::Markdown => document,
        OutputFormat::Json => {
            let paths = project
                .selected_files()
                .into_iter()
                .map(|f| f.path.clone())
                .collect();
            serializer
                .export(paths, document, Utc::now())
                .to_json_pretty()?
        }
    };

    if let Some(save_dir) = args.save.as_ref() {
        let path = save_path(&config, save_dir.as_ref(), &root, project.name(), format);
        log::info!("Saving context to file: {}", path.display());
        output::write_to_file(&path, &content)?;
        if !quiet {
            println!(
                "{} Context saved to: {}",
                "✅".green(),
                path.display().to_string().blue()
            );
        }
    }
    // stdout is the default sink when no other one was asked for
    if args.stdout || (args.save.is_none() && !args.copy) {
        output::write_to_stdout(&content)?;
    }
    if args.copy {
        output::copy_to_clipboard(&content, quiet);
    }

    if !quiet {
        eprintln!(
            "{} {} chars, ~{} tokens",
            "Generated:".green(),
            doc_stats.chars.to_string().cyan(),
            doc_stats.tokens.to_string().cyan()
        );
    }
    Ok(())
}

fn save_path(
    config: &Config,
    cli_dir: Option<&PathBuf>,
    project_root: &Path,
    project_name: &str,
    format: OutputFormat,
) -> PathBuf {
    let dir = match cli_dir {
        Some(cli_path) => {
            log::trace!("Save directory explicitly provided via CLI: {}", cli_path.display());
            cli_path.clone()
        }
        None => {
            log::trace!(
                "Save flag used without path, using configured directory: {}",
                config.save.output_dir.display()
            );
            config.save.output_dir.clone()
        }
    };
    let dir = if dir.is_absolute() {
        dir
    } else {
        project_root.join(dir)
    };
    let base = config.save.filename_base.as_deref().unwrap_or(project_name);
    dir.join(output_filename(base, format))
}
