mod check;
mod paths;
mod setup;

use std::path::PathBuf;

use lima_dirs::AppPaths;

use crate::error::{CliError, CliResult};

pub use check::{CheckArgs, run_check};
pub use paths::{PathsArgs, run_paths};
pub use setup::{SetupArgs, run_setup};

/// `--lima-dir` made absolute against the working directory, or the
/// platform application-data default.
fn resolve_lima_dir(arg: Option<PathBuf>) -> CliResult<PathBuf> {
    match arg {
        Some(dir) => std::path::absolute(&dir)
            .map_err(|e| CliError::Config(format!("invalid --lima-dir {}: {e}", dir.display()))),
        None => Ok(AppPaths::from_env()?.lima()),
    }
}
