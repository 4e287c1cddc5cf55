mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use std::path::{Path, PathBuf};
use std::process;

use cli_args::{Cli, Commands, FormatOutputOpts, ProjectConfigOpts, SelectionOpts};
use folder2context_core::{
    AppError, CancelToken, Config, FsScanner, Project, ScanOptions, SelectionDefaults, Session,
};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            if core_err.is_some_and(AppError::is_cancellation) {
                if !quiet {
                    eprintln!("{}", "Scan cancelled. Nothing changed.".yellow());
                }
                process::exit(0);
            }
            let exit_code = match core_err {
                Some(AppError::Config(_)) => 1,
                Some(AppError::TomlParse(_)) => 1,
                Some(AppError::TomlSerialize(_)) => 1,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::DirCreation { .. }) => 2,
                Some(AppError::ScanFailed { .. }) => 2,
                Some(AppError::ReadFailed { .. }) => 2,
                Some(AppError::EmptySelection) => 3,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(AppError::JsonSerialize(_)) => 6,
                Some(_) => 1,
                None => 1,
            };

            // Config and argument errors are always shown, even when quiet
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Generate(args) => {
                log::debug!("Executing 'generate' command...");
                commands::generate::handle_generate_command(args, quiet)?;
            }
            Commands::Tree(args) => {
                log::debug!("Executing 'tree' command...");
                commands::tree::handle_tree_command(args, quiet)?;
            }
            Commands::Stats(args) => {
                log::debug!("Executing 'stats' command...");
                commands::stats::handle_stats_command(args)?;
            }
            Commands::Extensions(args) => {
                log::debug!("Executing 'extensions' command...");
                commands::extensions::handle_extensions_command(args)?;
            }
            Commands::Search(args) => {
                log::debug!("Executing 'search' command...");
                commands::search::handle_search_command(args, quiet)?;
            }
            Commands::Preview(args) => {
                log::debug!("Executing 'preview' command...");
                commands::preview::handle_preview_command(args)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args, quiet)?;
            }
            Commands::Config(args) => {
                log::debug!("Executing 'config' command...");
                let project_root =
                    Config::determine_project_root(args.project_config.project_root.as_ref())
                        .context("Failed to determine project root for config command")?;
                commands::config::handle_config_command(&args, &project_root, quiet)?;
            }
        },
    }
    Ok(())
}

/// Loads the config file (if any) and applies command-line overrides on top.
pub fn load_config_for_command(
    project_root: &Path,
    project_opts: &ProjectConfigOpts,
    selection: Option<&SelectionOpts>,
    format_override: Option<&FormatOutputOpts>,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        project_root,
        project_opts.config_file.as_ref(),
        project_opts.disable_config_file,
    )
    .context("Failed to resolve configuration path")?;

    let mut config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(name) = &project_opts.project_name {
        config.general.project_name = Some(name.clone());
    }
    if project_opts.use_gitignore {
        config.scan.use_gitignore = true;
    }
    if let Some(size) = selection.and_then(|s| s.max_file_size.as_ref()) {
        config.scan.max_file_size = size.clone();
        config.max_file_size().context("Invalid --max-file-size")?;
    }
    if let Some(format) = format_override.and_then(|f| f.format.as_ref()) {
        config.output.format = format.clone();
    }

    config.general.project_name = Some(config.get_effective_project_name(project_root));
    log::trace!("Config after CLI overrides: {:?}", config);
    Ok(config)
}

/// A scanned folder with the command-line selection applied.
pub struct LoadedProject {
    pub root: PathBuf,
    pub config: Config,
    pub project: Project,
}

/// Resolves the root, loads config, scans, then applies `selection`.
pub fn open_project(
    project_opts: &ProjectConfigOpts,
    selection: &SelectionOpts,
    format_override: Option<&FormatOutputOpts>,
) -> Result<LoadedProject> {
    let root = Config::determine_project_root(project_opts.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", root.display());

    let config = load_config_for_command(&root, project_opts, Some(selection), format_override)
        .context("Failed to load configuration")?;

    let defaults = SelectionDefaults {
        extensions: config.default_extension_set(),
        max_file_size: config.max_file_size()?,
    };
    let scanner = FsScanner::new(ScanOptions::from_config(&config.scan));
    let name = config.get_effective_project_name(&root);

    let mut session = Session::new();
    let project = session
        .open(&root, &name, &scanner, &CancelToken::new(), &defaults)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    apply_selection(project, selection);

    let project = session
        .close()
        .context("Scan finished without an open project")?;
    Ok(LoadedProject {
        root,
        config,
        project,
    })
}

fn apply_selection(project: &mut Project, opts: &SelectionOpts) {
    if opts.all {
        let delta = project.select_all();
        log::debug!("--all: {} added", delta.added.len());
    } else if opts.none {
        let delta = project.deselect_all();
        log::debug!("--none: {} removed", delta.removed.len());
    }

    for ext in &opts.enable_ext {
        toggle_extension(project, ext, true);
    }
    for ext in &opts.disable_ext {
        toggle_extension(project, ext, false);
    }
    for path in &opts.include {
        select_path(project, path, true);
    }
    for path in &opts.exclude {
        select_path(project, path, false);
    }
}

fn toggle_extension(project: &mut Project, ext: &str, included: bool) {
    let normalized = folder2context_core::record::normalize_extension(ext);
    if !project.registry().is_detected(&normalized) {
        log::warn!("Extension '{}' was not found in this folder", normalized);
        return;
    }
    let delta = project.toggle_extension(&normalized, included);
    log::debug!(
        "Extension '{}' {}: +{} -{}",
        normalized,
        if included { "enabled" } else { "disabled" },
        delta.added.len(),
        delta.removed.len()
    );
}

fn select_path(project: &mut Project, raw: &str, included: bool) {
    let path = normalize_user_path(raw);
    if project.file(&path).is_some() {
        project.select_file(&path, included);
        return;
    }
    if project.files().iter().any(|f| f.is_within(&path)) {
        let delta = project.select_folder(&path, included);
        log::debug!(
            "Folder '{}': +{} -{}",
            path,
            delta.added.len(),
            delta.removed.len()
        );
    } else {
        log::warn!("No scanned file or folder matches '{}'", raw);
    }
}

fn normalize_user_path(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let mut path = unified.as_str();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path.trim_end_matches('/').to_string()
}
