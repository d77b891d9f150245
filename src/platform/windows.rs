//! Windows platform specifics.

/// System hosts file.
pub const HOSTS_PATH: &str = r"C:\Windows\System32\drivers\etc\hosts";
