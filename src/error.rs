//! Error types for hosts file handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, WorkmodeError>;

/// Errors raised while loading, parsing or persisting the blacklist.
///
/// I/O variants are fatal for the CLI: it reports them and exits without
/// attempting recovery. The backup on disk is the recovery aid.
#[derive(Debug, Error)]
pub enum WorkmodeError {
    #[error("the file `{path}` does not exist and could not be created")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error while reading hosts file `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error while writing hosts file `{path}`; a backup had been created at `{backup}`")]
    Write {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the backup file `{path}` could not be created")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read `{path}`")]
    ExternalRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write `{path}`")]
    ExternalWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line inside the managed block does not look like `<prefix>127.0.0.1 <domain>`.
    #[error("malformed blacklist entry on block line {line}: {content:?}")]
    MalformedEntry { line: usize, content: String },

    /// A domain that could not be written as a block line and read back.
    #[error("invalid domain {domain:?}: {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// Markers are missing or out of order.
    #[error("malformed hosts file: {0}")]
    MalformedDocument(String),
}

impl WorkmodeError {
    /// Returns `true` if the underlying I/O error is `PermissionDenied`.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        let source = match self {
            Self::Create { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Backup { source, .. }
            | Self::ExternalRead { source, .. }
            | Self::ExternalWrite { source, .. } => source,
            Self::InvalidDomain { .. }
            | Self::MalformedEntry { .. }
            | Self::MalformedDocument(_) => return false,
        };
        source.kind() == std::io::ErrorKind::PermissionDenied
    }
}
