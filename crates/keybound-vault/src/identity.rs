// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine identity providers.

use std::path::{Path, PathBuf};

use keybound_config::{IdentityConfig, IdentitySource};
use keybound_core::{KeyboundError, MachineIdentity};
use tracing::debug;

/// The operating system's machine id.
///
/// Reads `/var/lib/dbus/machine-id` or `/etc/machine-id` on Linux,
/// `IOPlatformUUID` on macOS and the `MachineGuid` registry value on Windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostIdentity;

impl MachineIdentity for HostIdentity {
    fn identity(&self) -> Result<String, KeyboundError> {
        let raw = machine_uid::get()
            .map_err(|e| KeyboundError::IdentityUnavailable(format!("failed to read machine id: {e}")))?;
        normalize(raw, "host machine id")
    }
}

/// An identity read from a file, for hosts where the OS id is not visible
/// (for example a container with the host id bind-mounted).
#[derive(Debug, Clone)]
pub struct FileIdentity {
    path: PathBuf,
}

impl FileIdentity {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MachineIdentity for FileIdentity {
    fn identity(&self) -> Result<String, KeyboundError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            KeyboundError::IdentityUnavailable(format!(
                "failed to read identity file {}: {e}",
                self.path.display()
            ))
        })?;
        normalize(raw, "identity file")
    }
}

/// Build the identity provider selected in settings.
///
/// A file source without a usable path is an error; it never falls back to
/// the host id.
pub fn identity_from_config(config: &IdentityConfig) -> Result<Box<dyn MachineIdentity>, KeyboundError> {
    match config.source {
        IdentitySource::Host => {
            debug!("using host machine identity");
            Ok(Box::new(HostIdentity))
        }
        IdentitySource::File => {
            let path = config
                .path
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    KeyboundError::IdentityUnavailable(
                        "identity source is `file` but identity.path is not set".to_string(),
                    )
                })?;
            let identity = FileIdentity::new(path);
            debug!(path = %identity.path().display(), "using file machine identity");
            Ok(Box::new(identity))
        }
    }
}

fn normalize(raw: String, origin: &str) -> Result<String, KeyboundError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(KeyboundError::IdentityUnavailable(format!("{origin} is empty")));
    }
    Ok(trimmed.to_string())
}
