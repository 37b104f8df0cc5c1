// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine-bound encryption of a single API credential.
//!
//! The credential lives in a small TOML file next to the tool. Setup seals the
//! plaintext with AES-256-GCM under a key derived from the host's machine id,
//! so the file is useless when copied to another machine. Collaborators call
//! [`obtain_credential`] once at startup.

pub mod crypto;
pub mod identity;
pub mod kdf;
pub mod locator;
pub mod store;
pub mod workflow;

use std::path::PathBuf;

use keybound_config::KeyboundConfig;
use keybound_core::{KeyboundError, MachineIdentity};
use secrecy::SecretString;

pub use identity::{FileIdentity, HostIdentity, identity_from_config};
pub use locator::CredentialLocator;
pub use store::{CredentialConfig, EncryptedCredential, SealedCredential};
pub use workflow::{
    CredentialWorkflow, Inspection, SetupOptions, SetupOutcome, SetupReport, mask_secret,
};

/// Build a workflow from settings. `credential_file`, when given, takes
/// precedence over any configured path.
pub fn workflow_from_config(
    config: &KeyboundConfig,
    credential_file: Option<PathBuf>,
) -> Result<CredentialWorkflow<Box<dyn MachineIdentity>>, KeyboundError> {
    let mut locator = CredentialLocator::from_config(&config.credential);
    if let Some(path) = credential_file {
        locator = locator.with_explicit_path(path);
    }
    let identity = identity_from_config(&config.identity)?;
    Ok(CredentialWorkflow::new(locator, identity))
}

/// Locate and decrypt the credential using the host identity selected in
/// settings.
pub fn obtain_credential(config: &KeyboundConfig) -> Result<SecretString, KeyboundError> {
    workflow_from_config(config, None)?.load()
}
