//! Data server configuration.

use std::path::{Path, PathBuf};

/// Pool directory used when nothing else is configured.
pub const DEFAULT_POOL_ROOT: &str = "/tmp/pNFS";

/// Environment variable overriding the pool directory.
pub const POOL_ROOT_ENV: &str = "NFS_MAMONT_DS_POOL_ROOT";

/// Settings shared by every operation of one data server instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataServerConfig {
    /// Directory holding one backing file per object, named by the object key
    pub pool_root: PathBuf,
}

impl DataServerConfig {
    pub fn new(pool_root: impl Into<PathBuf>) -> Self {
        DataServerConfig { pool_root: pool_root.into() }
    }

    /// Reads the pool directory from `NFS_MAMONT_DS_POOL_ROOT`, falling back
    /// to [DEFAULT_POOL_ROOT].
    pub fn from_env() -> Self {
        match std::env::var_os(POOL_ROOT_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::default(),
        }
    }

    pub fn pool_root(&self) -> &Path {
        &self.pool_root
    }
}

impl Default for DataServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pool_root() {
        assert_eq!(DataServerConfig::default().pool_root(), Path::new("/tmp/pNFS"));
    }

    #[test]
    fn explicit_pool_root() {
        let config = DataServerConfig::new("/srv/pool");
        assert_eq!(config.pool_root(), Path::new("/srv/pool"));
    }

    // single test so that no other test observes the variable
    #[test]
    fn pool_root_from_environment() {
        std::env::set_var(POOL_ROOT_ENV, "/var/lib/pnfs");
        assert_eq!(DataServerConfig::from_env().pool_root(), Path::new("/var/lib/pnfs"));

        std::env::set_var(POOL_ROOT_ENV, "");
        assert_eq!(DataServerConfig::from_env(), DataServerConfig::default());

        std::env::remove_var(POOL_ROOT_ENV);
        assert_eq!(DataServerConfig::from_env().pool_root(), Path::new(DEFAULT_POOL_ROOT));
    }
}
