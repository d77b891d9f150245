//! In-memory blacklist and its mutations.
//!
//! Nothing in this module touches the filesystem. Each mutating method returns
//! an [`Outcome`]; the caller persists the hosts file when
//! [`Outcome::needs_persist`] says so.

use std::fmt;

use crate::error::{Result, WorkmodeError};

/// Leading string shared by every line of the managed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prefix {
    /// Lines are live: blacklisted domains resolve to loopback.
    Active,
    /// Lines are commented out.
    #[default]
    Inactive,
}

impl Prefix {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "",
            Self::Inactive => "# ",
        }
    }
}

/// Result of a blacklist mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and must be written back.
    Success(String),
    /// Nothing changed; the message only informs the user.
    Info(String),
}

impl Outcome {
    #[must_use]
    pub const fn needs_persist(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Info(msg) => msg,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Coarse state reported by `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Empty,
    Enabled,
    Disabled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => EMPTY,
            Self::Enabled => "Workmode is enabled.",
            Self::Disabled => "Workmode is disabled.",
        })
    }
}

const EMPTY: &str = "The blacklist is empty.";

/// Ordered domain list plus the prefix applied to all of its lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    domains: Vec<String>,
    prefix: Prefix,
}

impl Blacklist {
    /// Build a blacklist from already-parsed parts, dropping repeated domains.
    #[must_use]
    pub fn new(domains: Vec<String>, prefix: Prefix) -> Self {
        let mut list = Self {
            domains: Vec::with_capacity(domains.len()),
            prefix,
        };
        for domain in domains {
            if !list.contains(&domain) {
                list.domains.push(domain);
            }
        }
        list
    }

    #[must_use]
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    #[must_use]
    pub const fn prefix(&self) -> Prefix {
        self.prefix
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }

    /// True when there is something to block and the lines are live.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.domains.is_empty() && self.prefix == Prefix::Active
    }

    #[must_use]
    pub fn status(&self) -> Status {
        if self.domains.is_empty() {
            Status::Empty
        } else if self.enabled() {
            Status::Enabled
        } else {
            Status::Disabled
        }
    }

    pub fn start(&mut self) -> Outcome {
        if self.domains.is_empty() {
            return Outcome::Info(EMPTY.to_string());
        }
        if self.enabled() {
            return Outcome::Info("Workmode is already running.".to_string());
        }
        self.prefix = Prefix::Active;
        Outcome::Success("Workmode is now enabled.".to_string())
    }

    pub fn stop(&mut self) -> Outcome {
        if self.domains.is_empty() {
            return Outcome::Info(EMPTY.to_string());
        }
        if !self.enabled() {
            return Outcome::Info("Workmode isn't running.".to_string());
        }
        self.prefix = Prefix::Inactive;
        Outcome::Success("Workmode is now disabled.".to_string())
    }

    /// Append `domain` and re-sort the whole list.
    pub fn add(&mut self, domain: &str) -> Outcome {
        if let Err(e) = validate_domain(domain) {
            return Outcome::Info(format!("Domain `{domain}` was not added: {e}."));
        }
        if self.contains(domain) {
            return Outcome::Info(format!("Domain `{domain}` is already blacklisted."));
        }
        self.domains.push(domain.to_string());
        self.domains.sort();
        Outcome::Success(format!("Domain `{domain}` has been added to the blacklist."))
    }

    /// Remove one entry, by 1-based index when `target` is a canonical integer,
    /// by exact domain otherwise.
    pub fn remove(&mut self, target: &str) -> Outcome {
        let position = match parse_index(target) {
            Some(index) => {
                let position = index
                    .checked_sub(1)
                    .and_then(|p| usize::try_from(p).ok())
                    .filter(|&p| p < self.domains.len());
                let Some(position) = position else {
                    return Outcome::Info(format!("Index `{index}` was not found in the blacklist."));
                };
                position
            }
            None => match self.domains.iter().position(|d| d == target) {
                Some(position) => position,
                None => {
                    return Outcome::Info(format!(
                        "Domain `{target}` was not found in the blacklist."
                    ))
                }
            },
        };
        let removed = self.domains.remove(position);
        Outcome::Success(format!("Domain `{removed}` has been removed from the blacklist."))
    }

    /// Numbered listing, starting at 1.
    #[must_use]
    pub fn display_list(&self) -> String {
        self.domains
            .iter()
            .enumerate()
            .map(|(i, domain)| format!("{}. {domain}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Append the domains listed in `text`, one per line, keeping their order.
    ///
    /// Blank lines are skipped and whitespace inside a line is removed. Lines
    /// that are not valid domains are skipped with a warning.
    /// Returns the domains that were actually added.
    pub fn import(&mut self, text: &str) -> Vec<String> {
        let mut added = Vec::new();
        for line in text.lines() {
            let domain: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            if domain.is_empty() || self.contains(&domain) {
                continue;
            }
            if let Err(e) = validate_domain(&domain) {
                tracing::warn!(line = %line, error = %e, "Skipping imported line");
                continue;
            }
            self.domains.push(domain.clone());
            added.push(domain);
        }
        added
    }

    /// Newline-joined domains in list order.
    #[must_use]
    pub fn export(&self) -> String {
        self.domains.join("\n")
    }
}

/// Check that `domain` is a hostname, so its block line parses back.
///
/// Labels are ASCII alphanumerics and hyphens, non-empty, and do not start or
/// end with a hyphen.
///
/// # Errors
///
/// [`WorkmodeError::InvalidDomain`] naming the first rule broken.
pub fn validate_domain(domain: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(WorkmodeError::InvalidDomain {
            domain: domain.to_string(),
            reason: reason.to_string(),
        })
    };
    if domain.is_empty() {
        return invalid("empty hostname");
    }
    for label in domain.split('.') {
        if label.is_empty() {
            return invalid("empty label");
        }
        if let Some(c) = label.chars().find(|&c| !c.is_ascii_alphanumeric() && c != '-') {
            return invalid(&format!("illegal char {c:?}"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return invalid("label cannot start/end with hyphen");
        }
    }
    Ok(())
}

/// `Some(n)` when `input` is exactly the decimal rendering of an integer.
fn parse_index(input: &str) -> Option<i64> {
    input
        .parse::<i64>()
        .ok()
        .filter(|n| n.to_string() == input)
}
