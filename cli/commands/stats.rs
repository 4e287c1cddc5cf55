use crate::cli_args::StatsArgs;
use crate::output::{human_size, print_json, print_stats_pretty};
use crate::{LoadedProject, open_project};
use anyhow::Result;
use folder2context_core::{Estimator, OutputFormat, Project};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub project: String,
    pub total_files: usize,
    pub selected_files: usize,
    pub total_bytes: u64,
    pub total_size_readable: String,
    pub estimated_tokens: u64,
    pub token_budget: u64,
    pub capacity: f64,
    pub over_warning: bool,
    pub files: Vec<FileStats>,
}

#[derive(Debug, Serialize)]
pub struct FileStats {
    pub path: String,
    pub bytes: u64,
    pub size_readable: String,
    pub estimated_tokens: u64,
}

pub fn handle_stats_command(args: StatsArgs) -> Result<()> {
    let LoadedProject {
        config, project, ..
    } = open_project(
        &args.project_config,
        &args.selection,
        Some(&args.format_output),
    )?;

    let estimator = Estimator::from_config(&config.estimate);
    let report = build_report(&project, &estimator);
    log::debug!("Stats computed: {} files, {} tokens", report.selected_files, report.estimated_tokens);

    // Plain `stats` prints the table, whatever the configured document format
    let format = match args.format_output.format.as_deref() {
        Some(f) => f.parse::<OutputFormat>()?,
        None => OutputFormat::Markdown,
    };
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Markdown => {
            print_stats_pretty(&report);
            Ok(())
        }
    }
}

fn build_report(project: &Project, estimator: &Estimator) -> StatsReport {
    let stats = project.stats(estimator);
    let files = project
        .selected_files()
        .into_iter()
        .map(|f| FileStats {
            path: f.path.clone(),
            bytes: f.size,
            size_readable: human_size(f.size),
            estimated_tokens: estimator.tokens_for(f.size),
        })
        .collect();

    StatsReport {
        project: project.name().to_string(),
        total_files: project.files().len(),
        selected_files: stats.count,
        total_bytes: stats.total_bytes,
        total_size_readable: human_size(stats.total_bytes),
        estimated_tokens: stats.tokens,
        token_budget: estimator.token_budget(),
        capacity: estimator.progress(&stats),
        over_warning: estimator.is_over_warning(&stats),
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folder2context_core::{ContentRef, FileRecord, SelectionDefaults};

    #[test]
    fn report_sums_selected_files_only() {
        let files = vec![
            FileRecord::new("src/a.js", 100, ContentRef::new("src/a.js")),
            FileRecord::new("src/b.js", 200, ContentRef::new("src/b.js")),
            FileRecord::new("readme.md", 50, ContentRef::new("readme.md")),
            FileRecord::new("logo.png", 4_000, ContentRef::new("logo.png")),
        ];
        let defaults = SelectionDefaults {
            extensions: [".js", ".md"].iter().map(|s| s.to_string()).collect(),
            max_file_size: 1_000_000,
        };
        let project = Project::new("demo", files, &defaults);

        let report = build_report(&project, &Estimator::default());
        assert_eq!(report.total_files, 4);
        assert_eq!(report.selected_files, 3);
        assert_eq!(report.total_bytes, 350);
        assert_eq!(report.estimated_tokens, 98);
        assert!(!report.over_warning);
        assert_eq!(report.files.len(), 3);
        assert_eq!(report.files[0].estimated_tokens, 28);
    }
}
