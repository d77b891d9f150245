//! Per-invocation session: load, mutate, persist.
//!
//! [`Workmode::load`] reads and parses the hosts file once. Mutations go
//! through [`Workmode::apply`], which writes the file back only for
//! [`Outcome::Success`]. Every write is preceded by a rolling backup and a
//! fresh read of the document, so edits made by someone else since loading
//! survive unless they touch the managed block itself. This narrows the race
//! with other writers; it does not lock anything.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::blacklist::{Blacklist, Outcome};
use crate::block;
use crate::error::{Result, WorkmodeError};
use crate::parse;
use crate::platform::{FileHostsIo, HostsIo};

/// Suffix of the rolling backup, overwritten before every write.
pub const BACKUP_SUFFIX: &str = ".bak.workmode";

/// Extra suffix of the backup taken once, before the initial migration.
pub const FIRST_TIME_SUFFIX: &str = ".firstTime";

/// `<hosts>.bak.workmode`
#[must_use]
pub fn backup_path(hosts_path: &Path) -> PathBuf {
    with_suffix(hosts_path, BACKUP_SUFFIX)
}

/// `<hosts>.bak.workmode.firstTime`
#[must_use]
pub fn first_time_backup_path(hosts_path: &Path) -> PathBuf {
    with_suffix(&backup_path(hosts_path), FIRST_TIME_SUFFIX)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// The blacklist of one hosts file, bound to the I/O used to persist it.
pub struct Workmode<H: HostsIo = FileHostsIo> {
    io: H,
    hosts_path: PathBuf,
    blacklist: Blacklist,
    first_time: bool,
}

impl Workmode<FileHostsIo> {
    /// Load from the real filesystem.
    ///
    /// # Errors
    ///
    /// See [`Workmode::load`].
    pub fn open(hosts_path: impl Into<PathBuf>) -> Result<Self> {
        Self::load(FileHostsIo, hosts_path)
    }
}

impl<H: HostsIo> Workmode<H> {
    /// Read and parse the hosts file, creating it if it is missing.
    ///
    /// When the file has no managed block yet, it is backed up to
    /// [`first_time_backup_path`] and rewritten with a block holding any
    /// migrated legacy entries.
    ///
    /// # Errors
    ///
    /// Any I/O failure, or a malformed managed block.
    pub fn load(io: H, hosts_path: impl Into<PathBuf>) -> Result<Self> {
        let hosts_path = hosts_path.into();
        let content = io.read(&hosts_path)?;
        let parsed = parse::parse_hosts(&content)?;

        let session = Self {
            io,
            hosts_path,
            blacklist: parsed.blacklist,
            first_time: parsed.first_time,
        };

        if session.first_time {
            tracing::info!(path = %session.hosts_path.display(), "No managed block found, initialising");
            session
                .io
                .backup(&session.hosts_path, &first_time_backup_path(&session.hosts_path))?;
            session.write_hosts()?;
        }
        Ok(session)
    }

    #[must_use]
    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    #[must_use]
    pub fn hosts_path(&self) -> &Path {
        &self.hosts_path
    }

    /// Whether the managed block had to be created when this session was loaded.
    #[must_use]
    pub const fn first_time(&self) -> bool {
        self.first_time
    }

    /// Run one mutation and persist it if it changed anything.
    ///
    /// # Errors
    ///
    /// Failures from [`Workmode::write_hosts`].
    pub fn apply<F>(&mut self, mutation: F) -> Result<Outcome>
    where
        F: FnOnce(&mut Blacklist) -> Outcome,
    {
        let outcome = mutation(&mut self.blacklist);
        if outcome.needs_persist() {
            self.write_hosts()?;
        } else {
            tracing::debug!(outcome = %outcome, "Nothing to persist");
        }
        Ok(outcome)
    }

    /// Back up the file, re-read it, and write it back with the current block.
    ///
    /// # Errors
    ///
    /// Backup, read or write failures, or a block that became malformed on
    /// disk since loading.
    pub fn write_hosts(&self) -> Result<()> {
        let backup = backup_path(&self.hosts_path);
        self.io.backup(&self.hosts_path, &backup)?;

        let rendered = block::render_block(self.blacklist.domains(), self.blacklist.prefix());
        let fresh = self.io.read(&self.hosts_path)?;
        let merged = block::merge(&fresh, &rendered)?;

        self.io.write(&self.hosts_path, &merged, &backup)
    }

    /// Import domains from the file at `src` and persist the hosts file.
    ///
    /// The hosts file is rewritten even when nothing new was imported.
    ///
    /// # Errors
    ///
    /// [`WorkmodeError::ExternalRead`] if `src` cannot be read, or failures from
    /// [`Workmode::write_hosts`].
    pub fn import_file(&mut self, src: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(src).map_err(|source| WorkmodeError::ExternalRead {
            path: src.to_path_buf(),
            source,
        })?;
        let added = self.blacklist.import(&text);
        tracing::info!(from = %src.display(), added = added.len(), "Imported domains");
        self.write_hosts()?;
        Ok(added)
    }

    /// Write the exported list to `dest`. The hosts file is not touched.
    ///
    /// # Errors
    ///
    /// [`WorkmodeError::ExternalWrite`] if `dest` cannot be written.
    pub fn export_to(&self, dest: &Path) -> Result<()> {
        std::fs::write(dest, self.blacklist.export()).map_err(|source| {
            WorkmodeError::ExternalWrite {
                path: dest.to_path_buf(),
                source,
            }
        })
    }
}
