mod checker;
pub mod checkers;
mod error;
mod registry;
mod settings;

pub use checker::{CheckResult, DiagnosticsCategory, DiagnosticsChecker, DiagnosticsFix};
pub use error::{DiagnosticsError, Result};
pub use registry::{Diagnostics, DiagnosticsReport};
pub use settings::{KubernetesSettings, Settings, SettingsFile, SettingsProvider};
