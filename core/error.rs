use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// The user abandoned the directory scan. Not a failure: callers restore
    /// the previous state and carry on.
    #[error("Scan cancelled")]
    ScanCancelled,

    #[error("Scan Failed: Path '{path}', Reason: {reason}")]
    ScanFailed { path: PathBuf, reason: String },

    #[error("Read Failed: Path '{path}', Error: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No files selected. Select at least one file.")]
    EmptySelection,

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("TOML Serialization Error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AppError::ScanCancelled)
    }
}

impl From<ignore::Error> for AppError {
    fn from(err: ignore::Error) -> Self {
        let path = match &err {
            ignore::Error::WithPath { path, .. } => path.clone(),
            _ => PathBuf::new(),
        };
        AppError::ScanFailed {
            path,
            reason: err.to_string(),
        }
    }
}
