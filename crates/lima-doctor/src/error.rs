pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error("internal: {0}")]
    Internal(String),

    #[error(transparent)]
    LimaDirs(#[from] lima_dirs::LimaDirsError),

    #[error(transparent)]
    Diagnostics(#[from] lima_diagnostics::DiagnosticsError),
}
