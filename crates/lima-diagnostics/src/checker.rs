use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Grouping shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticsCategory {
    ContainerEngine,
    Kubernetes,
    Networking,
    Utilities,
}

impl fmt::Display for DiagnosticsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ContainerEngine => "ContainerEngine",
            Self::Kubernetes => "Kubernetes",
            Self::Networking => "Networking",
            Self::Utilities => "Utilities",
        };
        f.write_str(name)
    }
}

/// A remediation the operator (or the application) can apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticsFix {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub description: String,
    pub passed: bool,
    pub fixes: Vec<DiagnosticsFix>,
}

impl CheckResult {
    pub fn passed(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            passed: true,
            fixes: Vec::new(),
        }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            passed: false,
            fixes: Vec::new(),
        }
    }
}

/// A single diagnostic. The registry calls [`applicable`](Self::applicable)
/// first and only runs [`check`](Self::check) when it returns `true`.
#[async_trait]
pub trait DiagnosticsChecker: Send + Sync {
    /// Stable identifier, e.g. `VALID_LIMA_SOCKET_PATH`.
    fn id(&self) -> &str;

    fn category(&self) -> DiagnosticsCategory;

    async fn applicable(&self) -> Result<bool>;

    async fn check(&self) -> Result<CheckResult>;
}
