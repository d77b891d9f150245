//! Configuration loading and hosts path resolution.
//!
//! Supports WORKMODE_HOME and WORKMODE_HOSTS_FILE env var overrides for testing.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;

/// Env var overriding the directory holding config.toml.
pub const HOME_ENV: &str = "WORKMODE_HOME";

/// Env var overriding the hosts file path.
pub const HOSTS_FILE_ENV: &str = "WORKMODE_HOSTS_FILE";

/// Paths for workmode's own data.
#[derive(Debug, Clone)]
pub struct WorkmodePaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl WorkmodePaths {
    /// Build paths from base directory (e.g. ProjectDirs config dir or WORKMODE_HOME).
    pub fn from_base(base: PathBuf) -> Self {
        let config_file = base.join("config.toml");
        Self {
            config_dir: base,
            config_file,
        }
    }

    /// Paths for testing: use a temp dir as base.
    pub fn for_test(base: impl AsRef<Path>) -> Self {
        Self::from_base(base.as_ref().to_path_buf())
    }

    /// Get default paths (respects WORKMODE_HOME).
    pub fn default_paths() -> Self {
        let base = if let Some(home) = std::env::var_os(HOME_ENV) {
            PathBuf::from(home)
        } else if let Some(dirs) = directories::ProjectDirs::from("org", "workmode", "workmode") {
            dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from(".workmode")
        };
        Self::from_base(base)
    }
}

/// config.toml structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts_path: Option<PathBuf>,
}

impl Config {
    /// Load config from paths (with shared lock when file exists).
    pub fn load(paths: &WorkmodePaths) -> Result<Config> {
        if !paths.config_file.is_file() {
            return Ok(Config::default());
        }
        let mut file = fs::OpenOptions::new()
            .read(true)
            .open(&paths.config_file)
            .with_context(|| format!("open {}", paths.config_file.display()))?;
        fs2::FileExt::lock_shared(&file)?;
        use std::io::Read;
        let mut s = String::new();
        file.read_to_string(&mut s)?;
        let cfg: Config = toml::from_str(&s)
            .with_context(|| format!("parse {}", paths.config_file.display()))?;
        Ok(cfg)
    }

    /// Save config to paths (with exclusive lock). Creates parent dirs if needed.
    pub fn save(&self, paths: &WorkmodePaths) -> Result<()> {
        if let Some(p) = paths.config_file.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&paths.config_file)
            .with_context(|| format!("open {}", paths.config_file.display()))?;
        fs2::FileExt::lock_exclusive(&file)?;
        let s = toml::to_string_pretty(self)?;
        use std::io::Write;
        file.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// Pick the hosts file: CLI flag, then WORKMODE_HOSTS_FILE, then config.toml,
/// then the platform default.
pub fn resolve_hosts_path(flag: Option<&Path>, config: &Config) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(HOSTS_FILE_ENV) {
        return PathBuf::from(path);
    }
    config
        .hosts_path
        .clone()
        .unwrap_or_else(platform::default_hosts_path)
}
