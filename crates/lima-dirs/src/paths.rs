use std::io;
use std::path::{Path, PathBuf};

use crate::error::{LimaDirsError, Result};
use crate::platform::Platform;

/// Application directory name under the platform data location.
pub const APP_NAME: &str = "rancher-desktop";

/// Short fallback `LIMA_HOME`, directly under the home directory.
pub const ALT_DIR_NAME: &str = ".rdlima";

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .filter(|home| !home.as_os_str().is_empty())
        .ok_or(LimaDirsError::NoHomeDir)
}

/// `~/.rdlima`.
pub fn alternate_dir(home: &Path) -> PathBuf {
    home.join(ALT_DIR_NAME)
}

/// Drop trailing separators and `.` segments. `lstat("lima/")` follows a
/// symlink at `lima`, so every inspection goes through this first.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

/// Where lima will actually put its sockets: `primary`, or its symlink target.
///
/// Relative link targets are resolved against the link's parent. Only one
/// level of link is followed, matching what `Relocator` creates.
pub fn effective_data_dir(primary: &Path) -> Result<PathBuf> {
    let primary = normalize(primary);
    match std::fs::symlink_metadata(&primary) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let target = std::fs::read_link(&primary).map_err(|source| LimaDirsError::Inspect {
                path: primary.clone(),
                source,
            })?;
            if target.is_absolute() {
                return Ok(target);
            }
            let parent = primary.parent().unwrap_or(Path::new("/"));
            Ok(parent.join(target))
        }
        Ok(_) => Ok(primary),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(primary),
        Err(source) => Err(LimaDirsError::Inspect {
            path: primary,
            source,
        }),
    }
}

/// Application-data layout for the lima backend.
pub struct AppPaths {
    home: PathBuf,
    platform: Platform,
    data_dir: PathBuf,
}

impl AppPaths {
    /// Resolve for the current user: `~/Library/Application Support` on
    /// macOS, `$XDG_DATA_HOME` (or `~/.local/share`) on linux.
    pub fn from_env() -> Result<Self> {
        let data_dir = dirs::data_dir().ok_or(LimaDirsError::NoDataDir)?;
        Ok(Self::new(home_dir()?, Platform::current()?, data_dir))
    }

    pub fn new(home: PathBuf, platform: Platform, data_dir: PathBuf) -> Self {
        Self {
            home,
            platform,
            data_dir,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Per-user application data directory.
    pub fn app_data(&self) -> PathBuf {
        self.data_dir.join(APP_NAME)
    }

    /// Default `LIMA_HOME`.
    pub fn lima(&self) -> PathBuf {
        self.app_data().join("lima")
    }

    pub fn alternate(&self) -> PathBuf {
        alternate_dir(&self.home)
    }
}
