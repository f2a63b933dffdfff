use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use lima_dirs::{Relocation, Relocator};
use tracing::{info, warn};

use crate::error::{CliError, CliResult};
use crate::lock;

#[derive(Args)]
pub struct SetupArgs {
    /// LIMA_HOME to prepare (defaults to the application-data location)
    #[arg(long)]
    lima_dir: Option<PathBuf>,
    /// Exit non-zero when the layout needs manual attention
    #[arg(long)]
    strict: bool,
}

pub async fn run_setup(args: SetupArgs) -> CliResult<ExitCode> {
    let lima_dir = super::resolve_lima_dir(args.lima_dir)?;
    let relocator = Relocator::from_env()?;

    let outcome = setup(relocator, lima_dir.clone(), &lock::lock_dir()).await?;
    println!("{}", describe(&outcome, &lima_dir));

    if args.strict && outcome.needs_attention() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Relocate `lima_dir` if needed, holding the setup lock (kept in
/// `lock_dir`) for the duration.
async fn setup(relocator: Relocator, lima_dir: PathBuf, lock_dir: &Path) -> CliResult<Relocation> {
    let _guard = lock::lock_lima_dir(lock_dir, &lima_dir).await?;

    let outcome =
        tokio::task::spawn_blocking(move || relocator.ensure_valid_socket_path(&lima_dir))
            .await
            .map_err(|e| CliError::Internal(format!("relocation task: {e}")))??;

    if outcome.needs_attention() {
        warn!(?outcome, "lima dir needs manual attention");
    } else {
        info!(mutated = outcome.mutated(), "lima dir ready");
    }
    Ok(outcome)
}

fn describe(outcome: &Relocation, lima_dir: &Path) -> String {
    match outcome {
        Relocation::AlreadyLinked => {
            format!("{} is already a symlink; nothing to do", lima_dir.display())
        }
        Relocation::Fits => format!("{} is short enough; nothing to do", lima_dir.display()),
        Relocation::Unfixable { alternate_probe } => format!(
            "socket path {} would still be too long; run as a user with a shorter username",
            alternate_probe.display()
        ),
        Relocation::Inconsistent { alternate } => format!(
            "{} exists but {} is not a symlink to it; move one of them aside and rerun",
            alternate.display(),
            lima_dir.display()
        ),
        Relocation::Moved { alternate } => format!(
            "moved {} to {} and linked it back",
            lima_dir.display(),
            alternate.display()
        ),
        Relocation::Created { alternate } => format!(
            "created {} and linked {} to it",
            alternate.display(),
            lima_dir.display()
        ),
    }
}
