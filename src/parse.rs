//! Turning a hosts document into a [`Blacklist`].

use std::sync::LazyLock;

use regex::Regex;

use crate::blacklist::{Blacklist, Prefix};
use crate::block::{self, Located};
use crate::error::{Result, WorkmodeError};

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(# )?127\.0\.0\.1 +(\S+)\s*$").expect("entry pattern is valid")
});

/// Blacklist recovered from a hosts document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHosts {
    pub blacklist: Blacklist,
    /// No managed block existed: the document must be backed up and rewritten
    /// once before anything else happens.
    pub first_time: bool,
}

/// Parse the managed block of `hosts`, or migrate legacy entries when there is none.
///
/// # Errors
///
/// [`WorkmodeError::MalformedDocument`] for unpaired markers,
/// [`WorkmodeError::MalformedEntry`] for a block line that is not
/// `<prefix>127.0.0.1 <domain>`.
pub fn parse_hosts(hosts: &str) -> Result<ParsedHosts> {
    match block::locate(hosts)? {
        Located::Block { entries, .. } => Ok(ParsedHosts {
            blacklist: parse_entries(&entries)?,
            first_time: false,
        }),
        Located::Legacy { domains, .. } => Ok(migrate_legacy(domains)),
    }
}

/// Legacy entries always come back disabled.
#[must_use]
pub fn migrate_legacy(domains: Vec<String>) -> ParsedHosts {
    ParsedHosts {
        blacklist: Blacklist::new(domains, Prefix::Inactive),
        first_time: true,
    }
}

/// Parse the lines strictly between the markers.
///
/// The first line decides the prefix; every other line has to agree with it.
/// An empty block yields an empty, inactive blacklist.
///
/// # Errors
///
/// [`WorkmodeError::MalformedEntry`] naming the first offending line (1-based).
pub fn parse_entries(entries: &[&str]) -> Result<Blacklist> {
    let Some(first) = entries.first() else {
        return Ok(Blacklist::default());
    };
    let prefix = if first.starts_with('#') {
        Prefix::Inactive
    } else {
        Prefix::Active
    };

    let mut domains = Vec::with_capacity(entries.len());
    for (i, raw) in entries.iter().enumerate() {
        let line = raw.trim_end_matches('\r');
        let malformed = || WorkmodeError::MalformedEntry {
            line: i + 1,
            content: line.to_string(),
        };
        let caps = ENTRY.captures(line).ok_or_else(malformed)?;
        let commented = caps.get(1).is_some();
        if commented != (prefix == Prefix::Inactive) {
            return Err(malformed());
        }
        domains.push(caps[2].to_string());
    }

    tracing::debug!(count = domains.len(), ?prefix, "Parsed blacklist");
    Ok(Blacklist::new(domains, prefix))
}
