use std::fmt;

use crate::error::{LimaDirsError, Result};

/// OS families with a known Unix socket path limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Darwin,
    Linux,
}

impl Platform {
    pub const SUPPORTED: [Platform; 2] = [Platform::Darwin, Platform::Linux];

    /// Platform of the running process.
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS name (`std::env::consts::OS` or node-style `darwin`).
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "macos" | "darwin" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            other => Err(LimaDirsError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Longest socket path, in bytes, that lima can still bind on this platform.
    pub const fn max_socket_path_len(self) -> usize {
        match self {
            Self::Darwin => 104,
            Self::Linux => 106,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_fixed_per_platform() {
        assert_eq!(Platform::Darwin.max_socket_path_len(), 104);
        assert_eq!(Platform::Linux.max_socket_path_len(), 106);
        for platform in Platform::SUPPORTED {
            assert!(platform.max_socket_path_len() > 0);
        }
    }

    #[test]
    fn from_os_accepts_both_darwin_spellings() {
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::Darwin);
        assert_eq!(Platform::from_os("darwin").unwrap(), Platform::Darwin);
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Linux);
    }

    #[test]
    fn from_os_rejects_unsupported() {
        let err = Platform::from_os("windows").unwrap_err();
        assert!(matches!(err, LimaDirsError::UnsupportedPlatform(ref os) if os == "windows"));
        assert!(err.to_string().contains("windows"));
    }

    #[test]
    fn current_matches_build_target() {
        let current = Platform::current();
        if cfg!(target_os = "linux") {
            assert_eq!(current.unwrap(), Platform::Linux);
        } else if cfg!(target_os = "macos") {
            assert_eq!(current.unwrap(), Platform::Darwin);
        } else {
            assert!(current.is_err());
        }
    }

    #[test]
    fn display_uses_node_names() {
        assert_eq!(Platform::Darwin.to_string(), "darwin");
        assert_eq!(Platform::Linux.to_string(), "linux");
    }
}
