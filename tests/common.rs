//! Shared test helpers.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;
use workmode::platform::HostsIo;
use workmode::WorkmodeError;

/// Create a temp directory for use as WORKMODE_HOME and for hosts files.
/// Uses current dir (workspace) so sandbox allows full access.
pub fn temp_home() -> TempDir {
    tempfile::Builder::new()
        .prefix("workmode_test_")
        .tempdir_in(std::env::current_dir().unwrap_or_else(|_| Path::new(".").into()))
        .expect("temp dir")
}

/// Write `content` to `<dir>/hosts` and return its path.
pub fn hosts_file(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("hosts");
    std::fs::write(&path, content).unwrap();
    path
}

/// Binary pointed at a temp home and hosts file.
pub fn workmode_cmd(home: &Path, hosts: &Path) -> Command {
    let mut cmd = Command::cargo_bin("workmode").unwrap();
    cmd.env("WORKMODE_HOME", home)
        .env("WORKMODE_HOSTS_FILE", hosts)
        .current_dir(home);
    cmd
}

/// In-memory HostsIo that counts writes and can be told to fail them.
#[derive(Default)]
pub struct MemoryHostsIo {
    pub files: RefCell<HashMap<PathBuf, String>>,
    pub writes: Cell<usize>,
    pub fail_writes: Cell<bool>,
}

impl MemoryHostsIo {
    pub fn with_file(path: &Path, content: &str) -> Self {
        let io = Self::default();
        io.set(path, content);
        io
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn set(&self, path: &Path, content: &str) {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
    }
}

impl HostsIo for &MemoryHostsIo {
    fn ensure_exists(&self, path: &Path) -> workmode::Result<()> {
        self.files
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_default();
        Ok(())
    }

    fn read(&self, path: &Path) -> workmode::Result<String> {
        self.ensure_exists(path)?;
        Ok(self.get(path).unwrap_or_default())
    }

    fn write(&self, path: &Path, content: &str, backup: &Path) -> workmode::Result<()> {
        if self.fail_writes.get() {
            return Err(WorkmodeError::Write {
                path: path.to_path_buf(),
                backup: backup.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.writes.set(self.writes.get() + 1);
        self.set(path, content);
        Ok(())
    }

    fn backup(&self, src: &Path, dst: &Path) -> workmode::Result<()> {
        let content = self.read(src)?;
        self.set(dst, &content);
        Ok(())
    }
}
