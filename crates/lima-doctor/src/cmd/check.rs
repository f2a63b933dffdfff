use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use lima_diagnostics::checkers::ValidLimaSocketPath;
use lima_diagnostics::{
    Diagnostics, DiagnosticsChecker, DiagnosticsReport, Settings, SettingsFile, SettingsProvider,
};

use crate::error::{CliError, CliResult};

#[derive(Args)]
pub struct CheckArgs {
    /// Settings YAML file (built-in defaults when omitted)
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// LIMA_HOME to inspect (defaults to the application-data location)
    #[arg(long)]
    lima_dir: Option<PathBuf>,
    /// Run only the checker with this id
    #[arg(long)]
    id: Option<String>,
    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run_check(args: CheckArgs) -> CliResult<ExitCode> {
    let lima_dir = super::resolve_lima_dir(args.lima_dir)?;
    let settings: Arc<dyn SettingsProvider> = match args.config {
        Some(path) => Arc::new(SettingsFile::new(path)),
        None => Arc::new(Settings::default()),
    };
    let socket_path: Box<dyn DiagnosticsChecker> =
        Box::new(ValidLimaSocketPath::from_env(settings, lima_dir));
    let diagnostics = Diagnostics::new(vec![socket_path]);

    let reports = match args.id {
        Some(id) => diagnostics.run_one(&id).await?.into_iter().collect(),
        None => diagnostics.run_all().await,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| CliError::Internal(format!("serialize reports: {e}")))?;
        println!("{json}");
    } else if reports.is_empty() {
        println!("no applicable diagnostics");
    } else {
        for report in &reports {
            println!("{}", format_report(report));
        }
    }

    if reports.iter().all(|r| r.result.passed) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn format_report(report: &DiagnosticsReport) -> String {
    let status = if report.result.passed { "PASS" } else { "FAIL" };
    format!(
        "[{status}] {} ({}): {}",
        report.id, report.category, report.result.description
    )
}
