use crate::cli_args::{PreviewArgs, SelectionOpts};
use crate::output::write_to_stdout;
use crate::{LoadedProject, open_project};
use anyhow::{Context, Result};
use folder2context_core::{FsContentReader, preview};

pub fn handle_preview_command(args: PreviewArgs) -> Result<()> {
    let LoadedProject { project, .. } =
        open_project(&args.project_config, &SelectionOpts::default(), None)?;

    let path = args.path.trim_start_matches("./").replace('\\', "/");
    let content = preview(&project, &path, &FsContentReader)
        .with_context(|| format!("Failed to preview {}", args.path))?;
    write_to_stdout(&content)
}
