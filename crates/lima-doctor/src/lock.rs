use std::fs::File;
use std::path::{Path, PathBuf};

use nix::fcntl::{Flock, FlockArg};
use sha2::{Digest, Sha256};

use crate::error::{CliError, CliResult};

/// Where setup locks live: the per-user runtime dir, else the temp dir.
/// Both already exist, so taking a lock never creates directories.
pub fn lock_dir() -> PathBuf {
    dirs::runtime_dir().unwrap_or_else(std::env::temp_dir)
}

/// Lock file guarding setup of `lima_dir`, keyed by a hash of the path so it
/// sits outside the directory tree being relocated.
pub fn lock_path(lock_dir: &Path, lima_dir: &Path) -> PathBuf {
    let lima_dir: PathBuf = lima_dir.components().collect();
    let hash = Sha256::digest(lima_dir.as_os_str().as_encoded_bytes());
    lock_dir.join(format!("lima-doctor-{hash:x}.lock"))
}

/// Take the setup lock for `lima_dir`, failing immediately if another setup
/// holds it. The returned guard holds the lock until dropped.
pub async fn lock_lima_dir(lock_dir: &Path, lima_dir: &Path) -> CliResult<Flock<File>> {
    let path = lock_path(lock_dir, lima_dir);
    tokio::task::spawn_blocking(move || {
        let file = File::options()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| CliError::Internal(format!("open lock {}: {e}", path.display())))?;
        Flock::lock(file, FlockArg::LockExclusiveNonblock).map_err(|(_, e)| {
            if e == nix::errno::Errno::EWOULDBLOCK {
                CliError::Config(format!(
                    "another setup is already running (lock {} is held)",
                    path.display()
                ))
            } else {
                CliError::Internal(format!("flock {}: {e}", path.display()))
            }
        })
    })
    .await
    .map_err(|e| CliError::Internal(format!("lock task: {e}")))?
}
