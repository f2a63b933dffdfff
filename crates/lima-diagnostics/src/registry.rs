use serde::Serialize;
use tracing::{debug, info, warn};

use crate::checker::{CheckResult, DiagnosticsCategory, DiagnosticsChecker};
use crate::error::{DiagnosticsError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticsReport {
    pub id: String,
    pub category: DiagnosticsCategory,
    #[serde(flatten)]
    pub result: CheckResult,
}

/// Checkers in the order they were registered.
pub struct Diagnostics {
    checkers: Vec<Box<dyn DiagnosticsChecker>>,
}

impl Diagnostics {
    pub fn new(checkers: Vec<Box<dyn DiagnosticsChecker>>) -> Self {
        Self { checkers }
    }

    /// Run every applicable checker, in registration order.
    pub async fn run_all(&self) -> Vec<DiagnosticsReport> {
        let mut reports = Vec::new();
        for checker in &self.checkers {
            if let Some(report) = run_checker(checker.as_ref()).await {
                reports.push(report);
            }
        }
        reports
    }

    /// Run a single checker by id. `Ok(None)` means it is not applicable.
    pub async fn run_one(&self, id: &str) -> Result<Option<DiagnosticsReport>> {
        let checker = self
            .checkers
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| DiagnosticsError::UnknownChecker(id.to_string()))?;
        Ok(run_checker(checker.as_ref()).await)
    }
}

async fn run_checker(checker: &dyn DiagnosticsChecker) -> Option<DiagnosticsReport> {
    let id = checker.id();
    match checker.applicable().await {
        Ok(true) => {}
        Ok(false) => {
            debug!(id, "not applicable, skipping");
            return None;
        }
        Err(e) => {
            warn!(id, error = %e, "applicability check failed");
            return Some(report(
                checker,
                CheckResult::failed(format!("Could not determine whether {id} applies: {e}")),
            ));
        }
    }

    let result = match checker.check().await {
        Ok(result) => result,
        Err(e) => {
            warn!(id, error = %e, "check failed");
            CheckResult::failed(format!("{id} could not run: {e}"))
        }
    };
    info!(id, passed = result.passed, "{}", result.description);
    Some(report(checker, result))
}

fn report(checker: &dyn DiagnosticsChecker, result: CheckResult) -> DiagnosticsReport {
    DiagnosticsReport {
        id: checker.id().to_string(),
        category: checker.category(),
        result,
    }
}
