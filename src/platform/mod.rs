//! Platform abstraction for hosts file I/O.

use std::path::{Path, PathBuf};

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

use crate::error::{Result, WorkmodeError};

/// Document I/O on the hosts file and its backups.
///
/// All failures are reported as [`WorkmodeError`] I/O variants and are meant
/// to be fatal for the caller. Nothing here retries.
pub trait HostsIo {
    /// Create an empty file at `path` if nothing exists there yet.
    fn ensure_exists(&self, path: &Path) -> Result<()>;
    /// Read the file at `path`, creating it first if needed.
    fn read(&self, path: &Path) -> Result<String>;
    /// Overwrite the file at `path`. `backup` is only used for the error message.
    fn write(&self, path: &Path, content: &str, backup: &Path) -> Result<()>;
    /// Copy the current content of `src` over `dst`.
    fn backup(&self, src: &Path, dst: &Path) -> Result<()>;
}

/// Get the platform's system hosts file path.
pub fn default_hosts_path() -> PathBuf {
    #[cfg(unix)]
    return PathBuf::from(unix::HOSTS_PATH);

    #[cfg(windows)]
    return PathBuf::from(windows::HOSTS_PATH);
}

/// HostsIo backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileHostsIo;

impl HostsIo for FileHostsIo {
    fn ensure_exists(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        tracing::info!(path = %path.display(), "Creating missing file");
        std::fs::write(path, "").map_err(|source| WorkmodeError::Create {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.ensure_exists(path)?;
        std::fs::read_to_string(path).map_err(|source| WorkmodeError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, content: &str, backup: &Path) -> Result<()> {
        std::fs::write(path, content).map_err(|source| WorkmodeError::Write {
            path: path.to_path_buf(),
            backup: backup.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = content.len(), "Wrote hosts file");
        Ok(())
    }

    fn backup(&self, src: &Path, dst: &Path) -> Result<()> {
        let content = self.read(src)?;
        std::fs::write(dst, content).map_err(|source| WorkmodeError::Backup {
            path: dst.to_path_buf(),
            source,
        })?;
        tracing::info!(from = %src.display(), to = %dst.display(), "Backed up hosts file");
        Ok(())
    }
}
