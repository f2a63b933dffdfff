use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LimaDirsError>;

#[derive(Debug, thiserror::Error)]
pub enum LimaDirsError {
    #[error("unsupported platform: {0} (socket path limits are known for darwin and linux)")]
    UnsupportedPlatform(String),

    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("could not determine the application data directory")]
    NoDataDir,

    #[error("inspect {}: {source}", path.display())]
    Inspect { path: PathBuf, source: io::Error },

    #[error("move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("create {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("symlink {} -> {}: {source}", link.display(), target.display())]
    SymlinkFailed {
        link: PathBuf,
        target: PathBuf,
        source: io::Error,
    },
}
