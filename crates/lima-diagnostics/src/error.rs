//! Error types for diagnostics.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, DiagnosticsError>;

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
    #[error("read settings {}: {source}", path.display())]
    ReadSettings {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse settings {}: {source}", path.display())]
    ParseSettings {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error("unknown checker: {0}")]
    UnknownChecker(String),

    #[error(transparent)]
    LimaDirs(#[from] lima_dirs::LimaDirsError),

    #[error("checker task: {0}")]
    Task(String),
}
