//! Shared testing utilities for pxetcd CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated working directory with the shipped assets.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a working directory containing a copy of `assets/`.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let assets = root.path().join("assets");
        fs::create_dir_all(&assets).expect("Failed to create assets directory");
        for name in ["etcd.yaml.j2", "form.html"] {
            fs::copy(repo_assets().join(name), assets.join(name))
                .expect("Failed to copy shipped asset");
        }
        Self { root }
    }

    /// Create an empty working directory.
    pub fn empty() -> Self {
        Self { root: TempDir::new().expect("Failed to create temp directory for tests") }
    }

    pub fn work_dir(&self) -> &Path {
        self.root.path()
    }

    /// Write a file relative to the working directory.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Build a command for invoking the compiled `pxetcd` binary in the working directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("pxetcd").expect("Failed to locate pxetcd binary");
        cmd.current_dir(self.work_dir()).env("RUST_LOG", "warn");
        cmd
    }
}

/// `assets/` directory of this repository.
pub fn repo_assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}
