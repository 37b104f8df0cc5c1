// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The on-disk credential file.
//!
//! ```toml
//! plaintext_credential = ""
//!
//! [encrypted_credential]
//! version = 2
//! algorithm = "aes-256-gcm+hkdf-sha256"
//! blob = "base64(nonce || ciphertext || tag)"
//! ```
//!
//! Files written before versioned records hold `encrypted_credential` as a bare
//! base64 string; those are read as version 1 with the padded-identity key.
//! Unknown keys are ignored on read and dropped on write.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use keybound_core::{CredentialState, KeyScheme, KeyboundError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Newest record version this build writes and reads.
pub const RECORD_VERSION: u32 = 2;

/// The two-field credential file.
///
/// `Debug` never prints field contents.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// The plaintext credential, present before setup or when retained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext_credential: Option<String>,

    /// The encrypted credential record, present once setup has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_credential: Option<EncryptedCredential>,
}

impl std::fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("plaintext_credential", &self.plaintext().map(|_| "[REDACTED]"))
            .field("encrypted_credential", &self.encrypted().map(|_| "[SEALED]"))
            .finish()
    }
}

impl CredentialConfig {
    /// The plaintext credential, if present and non-empty.
    pub fn plaintext(&self) -> Option<&str> {
        self.plaintext_credential.as_deref().filter(|p| !p.is_empty())
    }

    /// The encrypted record, if present and non-empty.
    pub fn encrypted(&self) -> Option<&EncryptedCredential> {
        self.encrypted_credential.as_ref().filter(|e| !e.is_empty())
    }

    /// Lifecycle state implied by the file contents.
    pub fn state(&self) -> CredentialState {
        match (self.encrypted(), self.plaintext()) {
            (Some(_), _) => CredentialState::Initialized,
            (None, Some(_)) => CredentialState::Uninitialized,
            (None, None) => CredentialState::Empty,
        }
    }

    /// Clear the plaintext, keeping an empty field for the operator to refill.
    pub fn scrub_plaintext(&mut self) {
        self.plaintext_credential = Some(String::new());
    }
}

/// The persisted encrypted credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncryptedCredential {
    /// A versioned record naming its algorithm.
    Sealed(SealedCredential),
    /// A bare base64 blob written before versioned records existed.
    Legacy(String),
}

/// Versioned `{version, algorithm, blob}` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedCredential {
    pub version: u32,
    pub algorithm: String,
    pub blob: String,
}

impl EncryptedCredential {
    /// A current-format record for `blob` sealed under `scheme`.
    pub fn sealed(scheme: KeyScheme, blob: String) -> Self {
        EncryptedCredential::Sealed(SealedCredential {
            version: RECORD_VERSION,
            algorithm: scheme.to_string(),
            blob,
        })
    }

    /// The base64 blob.
    pub fn blob(&self) -> &str {
        match self {
            EncryptedCredential::Sealed(record) => &record.blob,
            EncryptedCredential::Legacy(blob) => blob,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blob().trim().is_empty()
    }

    /// Key scheme the blob was sealed under.
    pub fn scheme(&self) -> Result<KeyScheme, KeyboundError> {
        match self {
            EncryptedCredential::Legacy(_) => Ok(KeyScheme::PaddedIdentity),
            EncryptedCredential::Sealed(record) => {
                let unsupported = || KeyboundError::UnsupportedFormat {
                    version: record.version,
                    algorithm: record.algorithm.clone(),
                };
                if record.version == 0 || record.version > RECORD_VERSION {
                    return Err(unsupported());
                }
                let scheme = KeyScheme::from_str(&record.algorithm).map_err(|_| unsupported())?;
                if scheme.format_version() != record.version {
                    return Err(unsupported());
                }
                Ok(scheme)
            }
        }
    }
}

/// Read and parse the credential file at `path`.
pub fn load(path: &Path) -> Result<CredentialConfig, KeyboundError> {
    let content = fs::read_to_string(path).map_err(|source| KeyboundError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: CredentialConfig = toml::from_str(&content).map_err(|e| KeyboundError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    debug!(path = %path.display(), state = %config.state(), "credential file loaded");
    Ok(config)
}

/// Serialize `config` and overwrite the file at `path`.
///
/// A file created by this call is readable by its owner only (Unix).
pub fn save(path: &Path, config: &CredentialConfig) -> Result<(), KeyboundError> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| KeyboundError::Internal(format!("failed to serialize credential file: {e}")))?;

    let write_err = |source: std::io::Error| KeyboundError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    debug!(path = %path.display(), "credential file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybound_test_utils::CredentialFixture;

    #[test]
    fn parses_legacy_string_record() {
        let config: CredentialConfig = toml::from_str(
            r#"
encrypted_credential = "AAAA"
plaintext_credential = "sk-test-123"
"#,
        )
        .unwrap();
        assert_eq!(config.encrypted_credential, Some(EncryptedCredential::Legacy("AAAA".into())));
        assert_eq!(config.encrypted().unwrap().scheme().unwrap(), KeyScheme::PaddedIdentity);
        assert_eq!(config.plaintext(), Some("sk-test-123"));
    }

    #[test]
    fn parses_sealed_record() {
        let config: CredentialConfig = toml::from_str(
            r#"
[encrypted_credential]
version = 2
algorithm = "aes-256-gcm+hkdf-sha256"
blob = "AAAA"
"#,
        )
        .unwrap();
        let record = config.encrypted().unwrap();
        assert_eq!(record.blob(), "AAAA");
        assert_eq!(record.scheme().unwrap(), KeyScheme::HkdfSha256);
        assert_eq!(config.state(), CredentialState::Initialized);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let config: CredentialConfig =
            toml::from_str("plaintext_credential = \"x-key-1\"\nowner = \"ops\"\n").unwrap();
        assert_eq!(config.plaintext(), Some("x-key-1"));
    }

    #[test]
    fn states_follow_contents() {
        let empty: CredentialConfig =
            toml::from_str("plaintext_credential = \"\"\nencrypted_credential = \"\"\n").unwrap();
        assert_eq!(empty.state(), CredentialState::Empty);
        assert!(empty.encrypted().is_none());

        let fresh: CredentialConfig = toml::from_str("plaintext_credential = \"k\"\n").unwrap();
        assert_eq!(fresh.state(), CredentialState::Uninitialized);
    }

    #[test]
    fn newer_version_is_unsupported() {
        let record = EncryptedCredential::Sealed(SealedCredential {
            version: 3,
            algorithm: "aes-256-gcm+hkdf-sha256".into(),
            blob: "AAAA".into(),
        });
        assert!(matches!(
            record.scheme().unwrap_err(),
            KeyboundError::UnsupportedFormat { version: 3, .. }
        ));
    }

    #[test]
    fn unknown_algorithm_is_unsupported() {
        let record = EncryptedCredential::Sealed(SealedCredential {
            version: 2,
            algorithm: "chacha20-poly1305+argon2".into(),
            blob: "AAAA".into(),
        });
        assert!(matches!(
            record.scheme().unwrap_err(),
            KeyboundError::UnsupportedFormat { algorithm, .. } if algorithm == "chacha20-poly1305+argon2"
        ));
    }

    #[test]
    fn version_must_match_algorithm() {
        for (version, algorithm) in [
            (1, "aes-256-gcm+hkdf-sha256"),
            (2, "aes-256-gcm+padded-identity"),
        ] {
            let record = EncryptedCredential::Sealed(SealedCredential {
                version,
                algorithm: algorithm.into(),
                blob: "AAAA".into(),
            });
            assert!(
                matches!(
                    record.scheme().unwrap_err(),
                    KeyboundError::UnsupportedFormat { version: v, .. } if v == version
                ),
                "version {version} with {algorithm} should be rejected"
            );
        }
    }

    #[test]
    fn sealed_padded_identity_record_reads_as_version_one() {
        let record = EncryptedCredential::Sealed(SealedCredential {
            version: 1,
            algorithm: "aes-256-gcm+padded-identity".into(),
            blob: "AAAA".into(),
        });
        assert_eq!(record.scheme().unwrap(), KeyScheme::PaddedIdentity);
    }

    #[test]
    fn debug_output_redacts_plaintext() {
        let config = CredentialConfig {
            plaintext_credential: Some("sk-live-secret".into()),
            encrypted_credential: None,
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-live-secret"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn save_then_load_preserves_record() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.root().join("credential.toml");
        let config = CredentialConfig {
            plaintext_credential: Some(String::new()),
            encrypted_credential: Some(EncryptedCredential::sealed(KeyScheme::HkdfSha256, "QUJD".into())),
        };

        save(&path, &config).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, config);

        let text = fixture.read(&path).unwrap();
        assert!(text.contains("[encrypted_credential]"));
        assert!(text.contains("algorithm = \"aes-256-gcm+hkdf-sha256\""));
    }

    #[cfg(unix)]
    #[test]
    fn new_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.root().join("fresh.toml");
        save(&path, &CredentialConfig::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.write("credential.toml", "encrypted_credential = [1, 2\n").unwrap();
        assert!(matches!(load(&path).unwrap_err(), KeyboundError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let fixture = CredentialFixture::new().unwrap();
        let err = load(&fixture.root().join("absent.toml")).unwrap_err();
        assert!(matches!(err, KeyboundError::Read { .. }));
    }

    #[test]
    fn unwritable_path_is_write_error() {
        let fixture = CredentialFixture::new().unwrap();
        let err = save(&fixture.root().join("no/such/dir/credential.toml"), &CredentialConfig::default())
            .unwrap_err();
        assert!(matches!(err, KeyboundError::Write { .. }));
    }
}
