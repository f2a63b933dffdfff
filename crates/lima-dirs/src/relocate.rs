//! Relocation of `LIMA_HOME` to the short alternate directory.
//!
//! The decision is split from the mutation: [`decide`] maps what is on disk
//! to one of six outcomes, and [`Relocator::ensure_valid_socket_path`]
//! applies it. At most one of rename / create-dir happens per call, followed
//! by the symlink. Not safe to run concurrently against the same directory;
//! callers serialize (see `lima-doctor setup`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{LimaDirsError, Result};
use crate::paths::{alternate_dir, home_dir, normalize};
use crate::platform::Platform;
use crate::socket_path::{probe_fits, probe_socket_path};

/// What occupies the primary data directory path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryState {
    Symlink,
    /// A real directory, or any other non-symlink entry.
    Present,
    Missing,
}

impl PrimaryState {
    pub fn inspect(path: &Path) -> Result<Self> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => Ok(Self::Symlink),
            Ok(_) => Ok(Self::Present),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::Missing),
            Err(source) => Err(LimaDirsError::Inspect {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    KeepSymlink,
    KeepPrimary,
    Unfixable,
    Inconsistent,
    MoveToAlternate,
    CreateAlternate,
}

/// First matching branch wins. `alternate_exists` is only called once the
/// alternate is known to be the answer.
pub fn decide<F>(
    state: PrimaryState,
    primary_fits: bool,
    alternate_fits: bool,
    alternate_exists: F,
) -> io::Result<Decision>
where
    F: FnOnce() -> io::Result<bool>,
{
    if state == PrimaryState::Symlink {
        return Ok(Decision::KeepSymlink);
    }
    if primary_fits {
        return Ok(Decision::KeepPrimary);
    }
    if !alternate_fits {
        return Ok(Decision::Unfixable);
    }
    if alternate_exists()? {
        return Ok(Decision::Inconsistent);
    }
    if state == PrimaryState::Present {
        Ok(Decision::MoveToAlternate)
    } else {
        Ok(Decision::CreateAlternate)
    }
}

/// Outcome of [`Relocator::ensure_valid_socket_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relocation {
    /// Primary was already a symlink; its target is trusted.
    AlreadyLinked,
    /// Socket path fits under the primary directory.
    Fits,
    /// Even the alternate is too long; the username is the obstacle.
    Unfixable { alternate_probe: PathBuf },
    /// The alternate exists but the primary does not link to it.
    Inconsistent { alternate: PathBuf },
    /// Existing primary was renamed to the alternate and linked.
    Moved { alternate: PathBuf },
    /// Alternate was created fresh and linked.
    Created { alternate: PathBuf },
}

impl Relocation {
    pub fn mutated(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Created { .. })
    }

    /// Left in a state an operator has to resolve.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::Unfixable { .. } | Self::Inconsistent { .. })
    }
}

pub struct Relocator {
    platform: Platform,
    home: PathBuf,
}

impl Relocator {
    pub fn new(platform: Platform, home: PathBuf) -> Self {
        Self { platform, home }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Platform::current()?, home_dir()?))
    }

    pub fn alternate(&self) -> PathBuf {
        alternate_dir(&self.home)
    }

    /// Make sure lima's sockets under `primary` fit the platform limit,
    /// relocating `primary` to `~/.rdlima` behind a symlink when they don't.
    pub fn ensure_valid_socket_path(&self, primary: &Path) -> Result<Relocation> {
        self.relocate(primary, |target, link| std::os::unix::fs::symlink(target, link))
    }

    /// `make_link(target, link)` creates the final symlink.
    fn relocate<L>(&self, primary: &Path, make_link: L) -> Result<Relocation>
    where
        L: FnOnce(&Path, &Path) -> io::Result<()>,
    {
        let primary = normalize(primary);
        let primary = primary.as_path();
        let state = PrimaryState::inspect(primary)?;
        let alternate = self.alternate();
        let decision = decide(
            state,
            probe_fits(primary, self.platform),
            probe_fits(&alternate, self.platform),
            || exists(&alternate),
        )
        .map_err(|source| LimaDirsError::Inspect {
            path: alternate.clone(),
            source,
        })?;

        match decision {
            Decision::KeepSymlink => {
                debug!(primary = %primary.display(), "lima dir is a symlink, leaving it alone");
                Ok(Relocation::AlreadyLinked)
            }
            Decision::KeepPrimary => {
                debug!(primary = %primary.display(), "socket path fits, keeping lima dir");
                Ok(Relocation::Fits)
            }
            Decision::Unfixable => {
                let alternate_probe = probe_socket_path(&alternate);
                warn!(
                    "alternative lima path {} is too long; \
                     try running on a system with a shorter username",
                    alternate_probe.display()
                );
                Ok(Relocation::Unfixable { alternate_probe })
            }
            Decision::Inconsistent => {
                warn!(
                    "directory {} exists and {} isn't a symlink to it; needs to be fixed",
                    alternate.display(),
                    primary.display()
                );
                Ok(Relocation::Inconsistent { alternate })
            }
            Decision::MoveToAlternate => {
                fs::rename(primary, &alternate).map_err(|source| {
                    warn!(
                        "moving {} to {} failed: {source}",
                        primary.display(),
                        alternate.display()
                    );
                    LimaDirsError::Move {
                        from: primary.to_path_buf(),
                        to: alternate.clone(),
                        source,
                    }
                })?;
                info!("moved {} to {}", primary.display(), alternate.display());
                link(primary, &alternate, make_link)?;
                Ok(Relocation::Moved { alternate })
            }
            Decision::CreateAlternate => {
                fs::create_dir_all(&alternate).map_err(|source| {
                    warn!("creating {} failed: {source}", alternate.display());
                    LimaDirsError::CreateDir {
                        path: alternate.clone(),
                        source,
                    }
                })?;
                info!("created {}", alternate.display());
                link(primary, &alternate, make_link)?;
                Ok(Relocation::Created { alternate })
            }
        }
    }
}

fn exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Point `primary` at `alternate`. Failure leaves the data in `alternate`
/// without a link; it is reported, not retried.
fn link<L>(primary: &Path, alternate: &Path, make_link: L) -> Result<()>
where
    L: FnOnce(&Path, &Path) -> io::Result<()>,
{
    if let Some(parent) = primary.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| {
            warn!("creating {} failed: {source}", parent.display());
            LimaDirsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            }
        })?;
    }
    make_link(alternate, primary).map_err(|source| {
        warn!("creating symlink failed: {source}");
        LimaDirsError::SymlinkFailed {
            link: primary.to_path_buf(),
            target: alternate.to_path_buf(),
            source,
        }
    })?;
    info!("linked {} -> {}", primary.display(), alternate.display());
    Ok(())
}
