//! Unix (macOS, Linux) platform specifics.

/// System hosts file.
pub const HOSTS_PATH: &str = "/etc/hosts";
