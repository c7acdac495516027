//! Test harness providing a temp directory, buffered logging, and an
//! automatic log dump when the test panics.

#![allow(dead_code)]

use super::logging::TestLogger;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestHarness {
    name: String,
    temp_dir: TempDir,
    logger: TestLogger,
}

impl TestHarness {
    /// Create a harness; `name` identifies the test in dumped logs.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let temp_dir = TempDir::new().expect("create temp directory");
        let logger = TestLogger::new();
        logger.info("harness", format!("test '{name}' started"));
        Self {
            name,
            temp_dir,
            logger,
        }
    }

    pub const fn log(&self) -> &TestLogger {
        &self.logger
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Join `path` onto the temp directory.
    pub fn temp_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Create a file under the temp directory, creating parents.
    pub fn create_file(&self, name: impl AsRef<Path>, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directories");
        }
        std::fs::write(&path, content).expect("write test file");
        self.logger
            .info("harness", format!("created {}", path.display()));
        path
    }

    /// Create an executable shell script under the temp directory.
    #[cfg(unix)]
    pub fn create_script(&self, name: impl AsRef<Path>, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.create_file(name, format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("mark script executable");
        path
    }

    /// Log a test section start.
    pub fn section(&self, name: &str) {
        self.logger.info("section", format!("=== {name} ==="));
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        if std::thread::panicking() {
            eprintln!("test '{}' failed; dumping log", self.name);
            self.logger.dump();
        }
    }
}
