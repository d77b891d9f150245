//! Locating and rendering the managed block inside the hosts file.
//!
//! ```text
//! ### workmode blacklist start ###
//! # 127.0.0.1 example.com
//! ### workmode blacklist end ###
//! ```
//!
//! Files written before the markers existed carry one `<ip> <domain> # workmode`
//! line per domain instead. Those are recognized here and folded into a fresh
//! block on the next write.

use std::sync::LazyLock;

use regex::Regex;

use crate::blacklist::{validate_domain, Prefix};
use crate::error::{Result, WorkmodeError};

/// First line of the managed block.
pub const START_TAG: &str = "### workmode blacklist start ###";

/// Last line of the managed block.
pub const END_TAG: &str = "### workmode blacklist end ###";

/// Trailing comment identifying a legacy entry.
pub const LEGACY_MARKER: &str = " # workmode";

/// Address every blacklisted domain is pointed at.
pub const LOOPBACK: &str = "127.0.0.1";

static LEGACY_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\S+\s+)?(.*?) # workmode").expect("legacy entry pattern is valid")
});

/// Text around the managed block.
///
/// `after` starts with the end tag, so `before + block + after` is a complete
/// document for any block produced by [`render_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surroundings {
    pub before: String,
    pub after: String,
}

/// Outcome of scanning a hosts document for the managed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located<'a> {
    /// Both markers were found. `entries` are the raw lines between them.
    Block {
        surroundings: Surroundings,
        entries: Vec<&'a str>,
    },
    /// No start marker. `domains` were recovered from legacy lines, in file order.
    Legacy {
        surroundings: Surroundings,
        domains: Vec<String>,
    },
}

impl Located<'_> {
    #[must_use]
    pub fn into_surroundings(self) -> Surroundings {
        match self {
            Self::Block { surroundings, .. } | Self::Legacy { surroundings, .. } => surroundings,
        }
    }
}

/// Split `hosts` around the managed block, or recover legacy entries.
///
/// # Errors
///
/// Returns [`WorkmodeError::MalformedDocument`] when only one of the markers
/// is present, or when the end marker comes first.
pub fn locate(hosts: &str) -> Result<Located<'_>> {
    let start = hosts.find(START_TAG);
    let end = hosts.find(END_TAG);

    match (start, end) {
        (None, None) => Ok(locate_legacy(hosts)),
        (None, Some(_)) => Err(WorkmodeError::MalformedDocument(format!(
            "found `{END_TAG}` without `{START_TAG}`"
        ))),
        (Some(_), None) => Err(WorkmodeError::MalformedDocument(format!(
            "found `{START_TAG}` without `{END_TAG}`"
        ))),
        (Some(start), Some(end)) if end < start => Err(WorkmodeError::MalformedDocument(
            format!("`{END_TAG}` appears before `{START_TAG}`"),
        )),
        (Some(start), Some(end)) => {
            // First element is the start tag line, last is whatever precedes
            // the end tag on its own line.
            let lines: Vec<&str> = hosts[start..end].split('\n').collect();
            let entries = if lines.len() > 2 {
                lines[1..lines.len() - 1].to_vec()
            } else {
                Vec::new()
            };
            tracing::debug!(entries = entries.len(), "Found managed block");
            Ok(Located::Block {
                surroundings: Surroundings {
                    before: hosts[..start].to_string(),
                    after: hosts[end..].to_string(),
                },
                entries,
            })
        }
    }
}

/// Surroundings of the block in `hosts`, for merging a freshly rendered block.
///
/// # Errors
///
/// Same as [`locate`].
pub fn surroundings(hosts: &str) -> Result<Surroundings> {
    locate(hosts).map(Located::into_surroundings)
}

fn locate_legacy(hosts: &str) -> Located<'_> {
    let mut kept = Vec::new();
    let mut domains = Vec::new();

    for line in hosts.split('\n') {
        if !line.contains(LEGACY_MARKER) {
            kept.push(line);
            continue;
        }
        let Some(domain) = LEGACY_ENTRY.captures(line).map(|c| c[1].trim().to_string()) else {
            tracing::warn!(line = %line, "Dropping legacy line without a domain");
            continue;
        };
        match validate_domain(&domain) {
            Ok(()) => domains.push(domain),
            Err(e) => tracing::warn!(line = %line, error = %e, "Dropping legacy line"),
        }
    }

    if !domains.is_empty() {
        tracing::warn!(count = domains.len(), "Migrating legacy blacklist entries");
    }

    Located::Legacy {
        surroundings: Surroundings {
            before: kept.join("\n") + "\n",
            after: format!("{END_TAG}\n\n"),
        },
        domains,
    }
}

/// Render the block from the start tag up to (not including) the end tag.
#[must_use]
pub fn render_block(domains: &[String], prefix: Prefix) -> String {
    let mut lines = Vec::with_capacity(domains.len() + 2);
    lines.push(START_TAG.to_string());
    lines.extend(
        domains
            .iter()
            .map(|domain| format!("{}{LOOPBACK} {domain}", prefix.as_str())),
    );
    lines.push(String::new());
    lines.join("\n")
}

/// Splice `block` into `hosts`, replacing whatever block it currently holds.
///
/// # Errors
///
/// Same as [`locate`].
pub fn merge(hosts: &str, block: &str) -> Result<String> {
    let Surroundings { before, after } = surroundings(hosts)?;
    Ok(format!("{before}{block}{after}"))
}
