// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp directory layout mimicking an installed tool.
//!
//! ```text
//! <root>/project/
//! <root>/project/app/
//! <root>/project/app/target/
//! <root>/project/app/target/bin/   <- exe_dir()
//! <root>/work/                     <- cwd()
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Default credential file name used by fixtures.
pub const FIXTURE_FILE_NAME: &str = "credential.toml";

/// An isolated directory tree for locator and workflow tests.
///
/// Dropping the fixture removes the tree.
pub struct CredentialFixture {
    dir: TempDir,
}

impl CredentialFixture {
    /// Create the directory tree with no credential files in it.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("project/app/target/bin"))?;
        fs::create_dir_all(dir.path().join("work"))?;
        Ok(Self { dir })
    }

    /// Root of the tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Directory standing in for the running executable's directory.
    pub fn exe_dir(&self) -> PathBuf {
        self.root().join("project/app/target/bin")
    }

    /// Directory standing in for the working directory.
    pub fn cwd(&self) -> PathBuf {
        self.root().join("work")
    }

    /// Write `contents` to `relative` (under the root) and return the full path.
    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) -> io::Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Write a credential file holding only a plaintext credential next to
    /// the fake executable's parent (the first search candidate).
    pub fn with_plaintext(&self, plaintext: &str) -> io::Result<PathBuf> {
        self.write(
            Path::new("project/app/target").join(FIXTURE_FILE_NAME),
            &format!("plaintext_credential = \"{plaintext}\"\nencrypted_credential = \"\"\n"),
        )
    }

    /// Read a file back as a string.
    pub fn read(&self, path: impl AsRef<Path>) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
