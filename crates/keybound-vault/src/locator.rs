// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential file discovery.
//!
//! An explicit path always wins and disables searching. Otherwise candidates
//! are generated around the running executable first, then the working
//! directory, so a binary run from an install prefix, a wrapper script, or a
//! nested build directory still finds the file:
//!
//! ```text
//! {exe}/../F  {exe}/F  {exe}/../../F  {exe}/../../../F
//! {cwd}/F     {cwd}/../F  {cwd}/../../F
//! ```
//!
//! The first candidate that is a readable regular file is used.

use std::fs::File;
use std::path::{Path, PathBuf};

use keybound_config::CredentialFileConfig;
use keybound_core::KeyboundError;
use tracing::debug;

/// Ancestor offsets tried below the executable directory, in order.
const EXE_ASCENT: [usize; 4] = [1, 0, 2, 3];

/// Ancestor offsets tried below the working directory, in order.
const CWD_ASCENT: [usize; 3] = [0, 1, 2];

/// Finds the credential file.
#[derive(Debug, Clone)]
pub struct CredentialLocator {
    explicit: Option<PathBuf>,
    file_name: String,
    search: bool,
    exe_dir: Option<PathBuf>,
    cwd: Option<PathBuf>,
}

impl CredentialLocator {
    /// A searching locator rooted at this process's executable and working
    /// directories.
    pub fn new(file_name: impl Into<String>) -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        if exe_dir.is_none() {
            debug!("executable directory unavailable; searching working directory only");
        }

        Self {
            explicit: None,
            file_name: file_name.into(),
            search: true,
            exe_dir,
            cwd: std::env::current_dir().ok(),
        }
    }

    /// A locator following the `[credential]` settings.
    pub fn from_config(config: &CredentialFileConfig) -> Self {
        let mut locator = Self::new(config.file_name.clone());
        locator.explicit = config.explicit_path();
        locator.search = config.search;
        locator
    }

    /// Use only `path`.
    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Override the executable directory the search is rooted at.
    pub fn with_exe_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.exe_dir = dir;
        self
    }

    /// Override the working directory the search is rooted at.
    pub fn with_cwd(mut self, dir: Option<PathBuf>) -> Self {
        self.cwd = dir;
        self
    }

    /// Enable or disable the fallback search.
    pub fn with_search(mut self, search: bool) -> Self {
        self.search = search;
        self
    }

    /// Every path that [`locate`](Self::locate) would try, in priority order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.explicit {
            return vec![path.clone()];
        }
        if !self.search {
            return Vec::new();
        }

        let mut candidates = Vec::with_capacity(EXE_ASCENT.len() + CWD_ASCENT.len());
        if let Some(dir) = &self.exe_dir {
            candidates.extend(EXE_ASCENT.iter().map(|&up| ascend(dir, up).join(&self.file_name)));
        }
        if let Some(dir) = &self.cwd {
            candidates.extend(CWD_ASCENT.iter().map(|&up| ascend(dir, up).join(&self.file_name)));
        }
        candidates
    }

    /// The first candidate that exists as a readable regular file.
    pub fn locate(&self) -> Result<PathBuf, KeyboundError> {
        let candidates = self.candidates();
        match candidates.iter().find(|p| is_readable_file(p)) {
            Some(found) => {
                debug!(path = %found.display(), "credential file located");
                Ok(found.clone())
            }
            None => Err(KeyboundError::ConfigNotFound { candidates }),
        }
    }
}

/// `dir` followed by `levels` `..` components.
fn ascend(dir: &Path, levels: usize) -> PathBuf {
    let mut path = dir.to_path_buf();
    for _ in 0..levels {
        path.push("..");
    }
    path
}

fn is_readable_file(path: &Path) -> bool {
    path.metadata().is_ok_and(|m| m.is_file()) && File::open(path).is_ok()
}
