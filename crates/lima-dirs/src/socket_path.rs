//! Worst-case socket path under a data directory.
//!
//! lima puts per-instance sockets under `$LIMA_HOME/<instance>/`. The longest
//! one is the ssh control socket, `ssh.sock.` followed by a 16-digit hash, so
//! checking that name against the first instance is enough for all of them.

use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// Directory of the first lima instance.
pub const INSTANCE_DIR: &str = "0";

/// Placeholder with the length of the longest socket name lima creates.
pub const PROBE_SOCKET_NAME: &str = "ssh.sock.1234567890123456";

/// `<base>/0/ssh.sock.1234567890123456`.
pub fn probe_socket_path(base: &Path) -> PathBuf {
    base.join(INSTANCE_DIR).join(PROBE_SOCKET_NAME)
}

/// Length of a path as the kernel counts it: raw bytes, no normalization.
pub fn path_len(path: &Path) -> usize {
    path.as_os_str().as_encoded_bytes().len()
}

pub fn exceeds_limit(path: &Path, platform: Platform) -> bool {
    path_len(path) > platform.max_socket_path_len()
}

/// Whether the worst-case socket under `base` fits.
pub fn probe_fits(base: &Path, platform: Platform) -> bool {
    !exceeds_limit(&probe_socket_path(base), platform)
}
