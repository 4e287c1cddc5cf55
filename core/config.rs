use crate::error::{AppError, Result};
use crate::record::normalize_extension;
use byte_unit::Byte;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_DIR: &str = ".folder2context";
pub const DEFAULT_CONFIG_FILENAME: &str = "folder2context.toml";
pub const DEFAULT_OUTPUT_DIR: &str = ".folder2context/out";
pub const DEFAULT_MAX_FILE_SIZE: &str = "1MB";

pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    "coverage",
    "__pycache__",
    "venv",
    ".venv",
    "env",
    ".env",
    "vendor",
    "target",
    "out",
    ".cache",
    ".idea",
    ".vscode",
    ".DS_Store",
    "bower_components",
    "tmp",
    "temp",
    "terraform.tfstate.d",
    "migrations",
    "bin",
    "obj",
    DEFAULT_CONFIG_DIR,
];

pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
    ".js",
    ".ts",
    ".jsx",
    ".tsx",
    ".json",
    ".html",
    ".css",
    ".scss",
    ".sass",
    ".less",
    ".md",
    ".markdown",
    ".txt",
    ".py",
    ".java",
    ".go",
    ".php",
    ".rb",
    ".cs",
    ".cpp",
    ".c",
    ".h",
    ".hpp",
    ".xml",
    ".yml",
    ".yaml",
    ".toml",
    ".ini",
    ".conf",
    ".config",
    ".sql",
    ".sh",
    ".bash",
    ".zsh",
    ".fish",
    ".ps1",
    ".bat",
    ".vue",
    ".svelte",
    ".swift",
    ".kt",
    ".rs",
    ".dart",
    ".lua",
    ".r",
    ".m",
    ".scala",
    ".gradle",
    ".properties",
    ".tf",
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub estimate: EstimateConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub save: SaveConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default)]
    pub project_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
    #[serde(default = "default_text_extensions")]
    pub default_extensions: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: String,
    #[serde(default = "default_false")]
    pub use_gitignore: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EstimateConfig {
    #[serde(default = "default_tokens_per_char")]
    pub tokens_per_char: f64,
    #[serde(default = "default_token_budget")]
    pub token_budget: u64,
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SaveConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub filename_base: Option<String>,
}

fn default_false() -> bool {
    false
}
fn default_ignore_dirs() -> Vec<String> {
    DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect()
}
fn default_text_extensions() -> Vec<String> {
    DEFAULT_TEXT_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_max_file_size() -> String {
    DEFAULT_MAX_FILE_SIZE.to_string()
}
fn default_tokens_per_char() -> f64 {
    crate::estimate::TOKENS_PER_CHAR
}
fn default_token_budget() -> u64 {
    crate::estimate::TOKEN_BUDGET
}
fn default_warn_threshold() -> u64 {
    crate::estimate::WARN_THRESHOLD
}
fn default_format() -> String {
    "markdown".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: default_ignore_dirs(),
            default_extensions: default_text_extensions(),
            max_file_size: default_max_file_size(),
            use_gitignore: default_false(),
        }
    }
}
impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            tokens_per_char: default_tokens_per_char(),
            token_budget: default_token_budget(),
            warn_threshold: default_warn_threshold(),
        }
    }
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}
impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            filename_base: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn file_extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" | "text" | "txt" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown output format '{}'. Use 'markdown' or 'json'.",
                other
            ))),
        }
    }
}

/// Parses a human size string such as `"1MB"` or `"512 KiB"` into bytes.
pub fn parse_size(size: &str) -> Result<u64> {
    let byte_value = Byte::from_str(size).map_err(|e| {
        AppError::InvalidArgument(format!(
            "Invalid size '{}': {}. Use B, KB, MB, KiB, etc.",
            size, e
        ))
    })?;
    let bytes: u128 = byte_value.into();
    bytes.try_into().map_err(|_| {
        AppError::InvalidArgument(format!("Size '{}' does not fit in 64 bits.", size))
    })
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve
            .canonicalize()
            .map_err(|e| AppError::ScanFailed {
                path: path_to_resolve.clone(),
                reason: format!("Failed to canonicalize project root: {}", e),
            })
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p_str) => {
                let mut path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
                if !path.exists() && path.extension().is_none() {
                    path.set_extension("toml");
                }
                if !path.is_absolute() && !path.exists() {
                    path = project_root.join(DEFAULT_CONFIG_DIR).join(&path);
                }
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = Self::default_config_path(project_root);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn default_config_path(project_root: &Path) -> PathBuf {
        project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILENAME)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| match e {
            AppError::TomlParse(msg) => AppError::TomlParse(format!(
                "Error parsing config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_content)
            .map_err(|e| AppError::TomlParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        self.max_file_size()?;
        self.output_format()?;
        if !self.estimate.tokens_per_char.is_finite() || self.estimate.tokens_per_char < 0.0 {
            return Err(AppError::Config(format!(
                "estimate.tokens_per_char must be a non-negative number, got {}",
                self.estimate.tokens_per_char
            )));
        }
        Ok(())
    }

    pub fn max_file_size(&self) -> Result<u64> {
        parse_size(&self.scan.max_file_size)
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.output.format.parse()
    }

    pub fn default_extension_set(&self) -> BTreeSet<String> {
        self.scan
            .default_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .filter(|e| !e.is_empty())
            .collect()
    }

    pub fn get_effective_project_name(&self, project_root: &Path) -> String {
        self.general.project_name.clone().unwrap_or_else(|| {
            project_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "UnknownProject".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_file_size().unwrap(), 1_000_000);
        assert_eq!(config.output_format().unwrap(), OutputFormat::Markdown);
        assert!(config.scan.ignore_dirs.iter().any(|d| d == "node_modules"));
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [general]
            project_name = "demo"

            [scan]
            ignore_dirs = ["skip"]
            default_extensions = ["RS", ".md"]
            max_file_size = "2KB"

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.general.project_name.as_deref(), Some("demo"));
        assert_eq!(config.scan.ignore_dirs, vec!["skip".to_string()]);
        assert_eq!(config.max_file_size().unwrap(), 2_000);
        assert_eq!(config.output_format().unwrap(), OutputFormat::Json);

        let exts = config.default_extension_set();
        assert!(exts.contains(".rs"));
        assert!(exts.contains(".md"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml_str("[scan]\nbogus = 1\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn bad_size_is_rejected() {
        let err = Config::from_toml_str("[scan]\nmax_file_size = \"lots\"\n").unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = Config::default().to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), Config::default());
    }

    #[test]
    fn project_name_falls_back_to_dir_name() {
        let config = Config::default();
        assert_eq!(
            config.get_effective_project_name(Path::new("/work/my-app")),
            "my-app"
        );
    }
}
