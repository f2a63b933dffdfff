use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use lima_dirs::{AppPaths, effective_data_dir, path_len, probe_fits, probe_socket_path};

use crate::error::CliResult;

#[derive(Args)]
pub struct PathsArgs {
    /// LIMA_HOME to describe (defaults to the application-data location)
    #[arg(long)]
    lima_dir: Option<PathBuf>,
}

pub fn run_paths(args: PathsArgs) -> CliResult<ExitCode> {
    let app = AppPaths::from_env()?;
    let lima = super::resolve_lima_dir(args.lima_dir)?;
    let effective = effective_data_dir(&lima)?;
    let probe = probe_socket_path(&effective);
    let platform = app.platform();

    println!("lima:      {}", lima.display());
    println!("effective: {}", effective.display());
    println!("alternate: {}", app.alternate().display());
    println!(
        "socket:    {} ({} of {} bytes on {platform}, {})",
        probe.display(),
        path_len(&probe),
        platform.max_socket_path_len(),
        if probe_fits(&effective, platform) { "fits" } else { "too long" }
    );
    Ok(ExitCode::SUCCESS)
}
