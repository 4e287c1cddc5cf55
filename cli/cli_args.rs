use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the folder to scan (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: .folder2context/folder2context.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config_file",
        help_heading = "Project Setup"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config_file",
        help_heading = "Project Setup"
    )]
    pub disable_config_file: bool,

    #[arg(
        long,
        help = "Specify the project name shown in the header (overrides config/dir name).",
        value_name = "NAME",
        help_heading = "Project Setup"
    )]
    pub project_name: Option<String>,

    #[arg(
        long,
        help = "Skip entries listed in .gitignore files.",
        help_heading = "Project Setup"
    )]
    pub use_gitignore: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionOpts {
    #[arg(
        long,
        help = "Select every file within the size limit and enable all extensions.",
        conflicts_with = "none",
        help_heading = "Selection"
    )]
    pub all: bool,

    #[arg(
        long,
        help = "Start from an empty selection.",
        conflicts_with = "all",
        help_heading = "Selection"
    )]
    pub none: bool,

    #[arg(long = "enable-ext", value_name = "EXT", action = clap::ArgAction::Append, help = "Enable an extension (e.g. 'rs' or '.rs').", help_heading = "Selection")]
    pub enable_ext: Vec<String>,

    #[arg(long = "disable-ext", value_name = "EXT", action = clap::ArgAction::Append, help = "Disable an extension.", help_heading = "Selection")]
    pub disable_ext: Vec<String>,

    #[arg(long = "include", value_name = "PATH", action = clap::ArgAction::Append, help = "Select a file, or every file under a folder.", help_heading = "Selection")]
    pub include: Vec<String>,

    #[arg(long = "exclude", value_name = "PATH", action = clap::ArgAction::Append, help = "Deselect a file, or every file under a folder.", help_heading = "Selection")]
    pub exclude: Vec<String>,

    #[arg(
        long,
        value_name = "SIZE",
        help = "Skip larger files in bulk selection (e.g. '500KB', '2MiB').",
        help_heading = "Selection"
    )]
    pub max_file_size: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["markdown", "md", "json"], help_heading = "Output Formatting")]
    pub format: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Turn a folder into a single context document for AI models.",
    long_about = "folder2context scans a folder, pre-selects text files by extension and size, \nlets you adjust the selection, and assembles a directory tree plus file contents \ninto one document, with a size and token estimate.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  folder2context generate --stdout\n  folder2context generate --none --include src -s ./out\n  folder2context tree --enable-ext toml\n  folder2context stats -f json",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Generate the context document for the selected files."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "t",
        about = "Show the folder tree with selection markers."
    )]
    Tree(TreeArgs),

    #[command(
        visible_alias = "m",
        about = "Show size and token estimates for the selection."
    )]
    Stats(StatsArgs),

    #[command(
        visible_alias = "e",
        about = "List detected extensions and whether they are enabled."
    )]
    Extensions(ExtensionsArgs),

    #[command(visible_alias = "/", about = "Find files by name.")]
    Search(SearchArgs),

    #[command(visible_alias = "p", about = "Print the content of one file.")]
    Preview(PreviewArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),

    #[command(about = "Show or save the default configuration file structure.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub selection: SelectionOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,

    #[arg(
        long,
        help = "Emit the header and directory tree only.",
        help_heading = "Output Control"
    )]
    pub structure_only: bool,

    #[arg(
        long,
        help = "Force output of the document to standard output.",
        help_heading = "Output Control",
        conflicts_with = "save"
    )]
    pub stdout: bool,

    #[arg(
        short = 's', long, value_name = "SAVE_DIR",
        num_args = 0..=1,
        help_heading = "Output Control",
        help = "Save the document. Optional SAVE_DIR overrides config/default logic.",
    )]
    pub save: Option<Option<PathBuf>>,

    #[arg(
        short = 'c',
        long,
        help = "Copy the document to the system clipboard.",
        help_heading = "Output Control"
    )]
    pub copy: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub selection: SelectionOpts,

    #[arg(long, help = "Show only selected files.", help_heading = "Display")]
    pub selected_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub selection: SelectionOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct ExtensionsArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub selection: SelectionOpts,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub selection: SelectionOpts,

    #[arg(help = "Case-insensitive text to look for in file names.")]
    pub query: String,

    #[arg(long = "ext", value_name = "EXT", action = clap::ArgAction::Append, help = "Only show files with this extension.", help_heading = "Display")]
    pub ext: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(help = "Path of the file, relative to the project root.")]
    pub path: String,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
    #[arg(
        long,
        help = "Save completion script to default location (prompts overwrite)."
    )]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(
        long,
        help = "Save default config structure to default path (prompts overwrite)."
    )]
    pub save: bool,
}
