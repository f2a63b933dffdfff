//! Reports whether lima's sockets fit under the OS socket path limit.
//!
//! Read-only: it mirrors the decision `lima_dirs::Relocator` makes but never
//! touches the filesystem layout.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use lima_dirs::{
    ALT_DIR_NAME, Platform, alternate_dir, effective_data_dir, exceeds_limit, home_dir, path_len,
    probe_fits, probe_socket_path,
};
use tracing::debug;

use crate::checker::{CheckResult, DiagnosticsCategory, DiagnosticsChecker};
use crate::error::{DiagnosticsError, Result};
use crate::settings::SettingsProvider;

const UNKNOWN_ISSUE: &str = "Unknown issue determining valid lima path length.";
const SHORTER_USERNAME: &str =
    "This application will need to be run on a machine with a shorter username than";

pub struct ValidLimaSocketPath {
    settings: Arc<dyn SettingsProvider>,
    lima_dir: PathBuf,
    /// `None` when the running OS has no known limit.
    platform: Option<Platform>,
    home: Option<PathBuf>,
}

impl ValidLimaSocketPath {
    pub const ID: &'static str = "VALID_LIMA_SOCKET_PATH";

    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        lima_dir: PathBuf,
        platform: Option<Platform>,
        home: Option<PathBuf>,
    ) -> Self {
        Self {
            settings,
            lima_dir,
            platform,
            home,
        }
    }

    /// Use the running platform and `$HOME`.
    pub fn from_env(settings: Arc<dyn SettingsProvider>, lima_dir: PathBuf) -> Self {
        Self::new(
            settings,
            lima_dir,
            Platform::current().ok(),
            home_dir().ok(),
        )
    }
}

#[async_trait]
impl DiagnosticsChecker for ValidLimaSocketPath {
    fn id(&self) -> &str {
        Self::ID
    }

    fn category(&self) -> DiagnosticsCategory {
        DiagnosticsCategory::Kubernetes
    }

    async fn applicable(&self) -> Result<bool> {
        let settings = self.settings.fetch().await?;
        debug!(
            "{}: Kubernetes enabled? {}",
            Self::ID,
            settings.kubernetes.enabled
        );
        Ok(settings.kubernetes.enabled && self.platform.is_some())
    }

    async fn check(&self) -> Result<CheckResult> {
        let (Some(platform), Some(home)) = (self.platform, self.home.as_deref()) else {
            return Ok(CheckResult::failed(UNKNOWN_ISSUE));
        };

        let lima_dir = self.lima_dir.clone();
        let effective = tokio::task::spawn_blocking(move || effective_data_dir(&lima_dir))
            .await
            .map_err(|e| DiagnosticsError::Task(e.to_string()))??;
        let probe = probe_socket_path(&effective);
        debug!(
            "{}: using lima path of {}, max is {}",
            Self::ID,
            path_len(&probe),
            platform.max_socket_path_len()
        );

        if !exceeds_limit(&probe, platform) {
            return Ok(CheckResult::passed("The lima path is valid."));
        }

        let description = if probe_fits(&alternate_dir(home), platform) {
            format!(
                "The lima path {} is too long and can be moved to ~/{ALT_DIR_NAME}",
                probe.display()
            )
        } else {
            format!("{SHORTER_USERNAME} \"{}\"", current_username())
        };
        Ok(CheckResult::failed(description))
    }
}

/// Login name of the current user, for the operator-facing message.
fn current_username() -> String {
    let uid = nix::unistd::getuid();
    match nix::unistd::User::from_uid(uid) {
        Ok(Some(user)) => user.name,
        Ok(None) | Err(_) => std::env::var("USER").unwrap_or_else(|_| format!("uid {uid}")),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::settings::{KubernetesSettings, Settings};

    fn settings(enabled: bool) -> Arc<dyn SettingsProvider> {
        Arc::new(Settings {
            kubernetes: KubernetesSettings { enabled },
        })
    }

    /// Checker on linux limits with `home/` inside a temp dir.
    fn checker(dir: &TempDir, lima_dir: PathBuf) -> ValidLimaSocketPath {
        ValidLimaSocketPath::new(
            settings(true),
            lima_dir,
            Some(Platform::Linux),
            Some(dir.path().join("home")),
        )
    }

    fn long_lima_dir(dir: &TempDir) -> PathBuf {
        dir.path().join("app-data").join("x".repeat(100))
    }

    #[tokio::test]
    async fn applicable_only_with_kubernetes_on_supported_platform() {
        let lima = PathBuf::from("/tmp/lima");
        let darwin = Some(Platform::Darwin);
        let on = ValidLimaSocketPath::new(settings(true), lima.clone(), darwin, None);
        assert!(on.applicable().await.unwrap());

        let linux = Some(Platform::Linux);
        let off = ValidLimaSocketPath::new(settings(false), lima.clone(), linux, None);
        assert!(!off.applicable().await.unwrap());

        let unsupported = ValidLimaSocketPath::new(settings(true), lima, None, None);
        assert!(!unsupported.applicable().await.unwrap());
    }

    #[tokio::test]
    async fn identifies_as_kubernetes_check() {
        let c = ValidLimaSocketPath::new(settings(true), PathBuf::from("/l"), None, None);
        assert_eq!(c.id(), "VALID_LIMA_SOCKET_PATH");
        assert_eq!(c.category(), DiagnosticsCategory::Kubernetes);
    }

    #[tokio::test]
    async fn short_path_passes() {
        let dir = tempfile::tempdir().unwrap();
        let result = checker(&dir, dir.path().join("lima")).check().await.unwrap();
        assert_eq!(result, CheckResult::passed("The lima path is valid."));
    }

    #[tokio::test]
    async fn long_path_with_usable_alternate_suggests_move() {
        let dir = tempfile::tempdir().unwrap();
        let lima = long_lima_dir(&dir);
        let result = checker(&dir, lima.clone()).check().await.unwrap();

        assert!(!result.passed);
        assert!(result.fixes.is_empty());
        let probe = probe_socket_path(&lima);
        assert_eq!(
            result.description,
            format!(
                "The lima path {} is too long and can be moved to ~/.rdlima",
                probe.display()
            )
        );
    }

    #[tokio::test]
    async fn long_home_blames_username() {
        let dir = tempfile::tempdir().unwrap();
        let c = ValidLimaSocketPath::new(
            settings(true),
            long_lima_dir(&dir),
            Some(Platform::Linux),
            Some(dir.path().join("u".repeat(100))),
        );
        let result = c.check().await.unwrap();

        assert!(!result.passed);
        assert!(result.fixes.is_empty());
        assert!(
            result.description.starts_with(&format!("{SHORTER_USERNAME} \"")),
            "description: {}",
            result.description
        );
    }

    #[tokio::test]
    async fn relocated_layout_passes() {
        let dir = tempfile::tempdir().unwrap();
        let lima = long_lima_dir(&dir);
        let alternate = dir.path().join("home").join(".rdlima");
        std::fs::create_dir_all(&alternate).unwrap();
        std::fs::create_dir_all(lima.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&alternate, &lima).unwrap();

        let result = checker(&dir, lima).check().await.unwrap();
        assert!(result.passed, "description: {}", result.description);
    }

    #[tokio::test]
    async fn check_never_mutates() {
        let dir = tempfile::tempdir().unwrap();
        let lima = long_lima_dir(&dir);
        std::fs::create_dir_all(&lima).unwrap();

        checker(&dir, lima.clone()).check().await.unwrap();
        assert!(lima.is_dir());
        assert!(!std::fs::symlink_metadata(&lima).unwrap().file_type().is_symlink());
        assert!(!dir.path().join("home").join(".rdlima").exists());
    }

    #[tokio::test]
    async fn unknown_home_reports_unknown_issue() {
        let c = ValidLimaSocketPath::new(
            settings(true),
            PathBuf::from("/tmp/lima"),
            Some(Platform::Linux),
            None,
        );
        let result = c.check().await.unwrap();
        assert_eq!(result, CheckResult::failed(UNKNOWN_ISSUE));
    }

    #[tokio::test]
    async fn unreadable_lima_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let c = checker(&dir, Path::new("/dev/null").join("lima"));
        let err = c.check().await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::LimaDirs(_)));
    }

    #[test]
    fn username_is_never_empty() {
        assert!(!current_username().is_empty());
    }
}
