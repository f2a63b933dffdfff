//! Socket-path-length mitigation for the lima backend.
//!
//! Unix domain socket paths are capped by the OS (`sun_path`). lima creates
//! `$LIMA_HOME/<instance>/ssh.sock.<hash>`, which overflows that cap when the
//! application-data directory is deep or the username is long. [`Relocator`]
//! moves `LIMA_HOME` to `~/.rdlima` behind a symlink when that happens.

mod error;
mod paths;
mod platform;
mod relocate;
mod socket_path;

pub use error::{LimaDirsError, Result};
pub use paths::{ALT_DIR_NAME, APP_NAME, AppPaths, alternate_dir, effective_data_dir, home_dir};
pub use platform::Platform;
pub use relocate::{Decision, PrimaryState, Relocation, Relocator, decide};
pub use socket_path::{
    INSTANCE_DIR, PROBE_SOCKET_NAME, exceeds_limit, path_len, probe_fits, probe_socket_path,
};
