mod cmd;
mod error;
mod lock;

use std::fmt;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::time::FormatTime;

struct Elapsed(Instant);

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let d = self.0.elapsed();
        let total_secs = d.as_secs();
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        let millis = d.subsec_millis();
        write!(w, "[{mins:02}:{secs:02}:{millis:03}]")
    }
}

#[derive(Parser)]
#[command(name = "lima-doctor", version)]
struct Cli {
    /// Log decisions at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Relocate LIMA_HOME to ~/.rdlima if lima's sockets would not fit (run before starting lima)
    Setup(cmd::SetupArgs),
    /// Run diagnostics and report the results
    Check(cmd::CheckArgs),
    /// Print the resolved lima directories and the socket path limit
    Paths(cmd::PathsArgs),
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_timer(Elapsed(Instant::now()))
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Setup(args) => cmd::run_setup(args).await,
        Command::Check(args) => cmd::run_check(args).await,
        Command::Paths(args) => cmd::run_paths(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["lima-doctor", "check", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["lima-doctor"]).is_err());
    }

    #[test]
    fn setup_accepts_lima_dir_and_flags() {
        let cli = Cli::try_parse_from([
            "lima-doctor",
            "setup",
            "--lima-dir",
            "/tmp/lima",
            "--strict",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Setup(_)));
    }
}
