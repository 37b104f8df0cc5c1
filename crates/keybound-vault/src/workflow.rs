// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Setup and load of the machine-bound credential.
//!
//! Setup seals the plaintext credential under a key derived from this host's
//! identity and writes the versioned record back to the file. Load opens that
//! record with the same key. Loads never write.

use std::path::PathBuf;

use keybound_core::{CredentialState, KeyScheme, KeyboundError, MachineIdentity};
use secrecy::SecretString;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf;
use crate::locator::CredentialLocator;
use crate::store::{self, EncryptedCredential};

/// Options for [`CredentialWorkflow::setup`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupOptions {
    /// Clear the plaintext from the file after encrypting it.
    pub scrub: bool,
}

/// What setup did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The plaintext was sealed and the file rewritten.
    Encrypted { scrubbed: bool },
    /// The file held no plaintext; it was left untouched.
    NothingToDo,
}

/// Result of a setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    /// The credential file that was processed.
    pub path: PathBuf,
    pub outcome: SetupOutcome,
}

/// Lifecycle state of the located credential file, read without decrypting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub path: PathBuf,
    pub state: CredentialState,
}

/// Setup and load against one credential file and one identity provider.
#[derive(Debug)]
pub struct CredentialWorkflow<I> {
    locator: CredentialLocator,
    identity: I,
}

impl<I: MachineIdentity> CredentialWorkflow<I> {
    pub fn new(locator: CredentialLocator, identity: I) -> Self {
        Self { locator, identity }
    }

    pub fn locator(&self) -> &CredentialLocator {
        &self.locator
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Encrypt the plaintext credential in place.
    ///
    /// A file without plaintext is a no-op and is not rewritten, so running
    /// setup twice after a scrub is harmless. Running it again with the
    /// plaintext retained re-encrypts under a fresh nonce.
    pub fn setup(&self, options: SetupOptions) -> Result<SetupReport, KeyboundError> {
        let path = self.locator.locate()?;
        let mut config = store::load(&path)?;

        let Some(plaintext) = config.plaintext().map(|p| Zeroizing::new(p.to_owned())) else {
            info!(path = %path.display(), "no plaintext credential, nothing to do");
            return Ok(SetupReport {
                path,
                outcome: SetupOutcome::NothingToDo,
            });
        };

        let identity = Zeroizing::new(self.identity.identity()?);
        config.encrypted_credential = Some(seal_credential(&plaintext, &identity)?);

        if options.scrub {
            config.scrub_plaintext();
        } else {
            warn!(
                path = %path.display(),
                "plaintext credential retained in file; rerun setup with scrub to remove it"
            );
        }

        store::save(&path, &config)?;
        info!(
            path = %path.display(),
            algorithm = %KeyScheme::CURRENT,
            scrubbed = options.scrub,
            "credential encrypted"
        );

        Ok(SetupReport {
            path,
            outcome: SetupOutcome::Encrypted {
                scrubbed: options.scrub,
            },
        })
    }

    /// Decrypt the stored credential.
    pub fn load(&self) -> Result<SecretString, KeyboundError> {
        let path = self.locator.locate()?;
        let config = store::load(&path)?;
        let record = config.encrypted().ok_or(KeyboundError::EmptyCredential)?;

        let identity = Zeroizing::new(self.identity.identity()?);
        let secret = open_credential(record, &identity).inspect_err(|e| {
            if e.is_unrecoverable() {
                warn!(
                    path = %path.display(),
                    "credential failed authentication: encrypted on another machine or modified"
                );
            }
        })?;

        debug!(path = %path.display(), "credential decrypted");
        Ok(secret)
    }

    /// Report the file's state without decrypting or consulting the identity.
    pub fn inspect(&self) -> Result<Inspection, KeyboundError> {
        let path = self.locator.locate()?;
        let state = store::load(&path)?.state();
        Ok(Inspection { path, state })
    }
}

/// Seal `plaintext` into a current-format record.
pub fn seal_credential(plaintext: &str, identity: &str) -> Result<EncryptedCredential, KeyboundError> {
    let key = kdf::derive_key(KeyScheme::CURRENT, identity)?;
    let blob = crypto::encrypt(plaintext.as_bytes(), &key)?;
    Ok(EncryptedCredential::sealed(KeyScheme::CURRENT, blob))
}

/// Open any supported record with the key scheme it names.
pub fn open_credential(record: &EncryptedCredential, identity: &str) -> Result<SecretString, KeyboundError> {
    let scheme = record.scheme()?;
    let key = kdf::derive_key(scheme, identity)?;
    let bytes = crypto::decrypt(record.blob(), &key)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| KeyboundError::InvalidUtf8)?;
    Ok(SecretString::from(text.to_owned()))
}

/// Mask a credential for display: the first and last four characters, or
/// `****` when the value is shorter than ten characters.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::store::CredentialConfig;
    use keybound_test_utils::{CredentialFixture, FIXTURE_FILE_NAME, FixedIdentity, UnavailableIdentity};
    use secrecy::ExposeSecret;
    use tracing_test::traced_test;

    const SECRET: &str = "sk-live-0123456789abcdef";

    fn workflow<I: MachineIdentity>(fixture: &CredentialFixture, identity: I) -> CredentialWorkflow<I> {
        let locator = CredentialLocator::new(FIXTURE_FILE_NAME)
            .with_exe_dir(Some(fixture.exe_dir()))
            .with_cwd(Some(fixture.cwd()));
        CredentialWorkflow::new(locator, identity)
    }

    #[test]
    fn setup_then_load_returns_plaintext() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.with_plaintext(SECRET).unwrap();
        let flow = workflow(&fixture, FixedIdentity::new("host-a"));

        let report = flow.setup(SetupOptions::default()).unwrap();
        assert_eq!(report.path, fixture.exe_dir().join("..").join(FIXTURE_FILE_NAME));
        assert_eq!(report.path.canonicalize().unwrap(), path.canonicalize().unwrap());
        assert_eq!(report.outcome, SetupOutcome::Encrypted { scrubbed: false });

        let stored = store::load(&path).unwrap();
        assert_eq!(stored.plaintext(), Some(SECRET));
        assert_eq!(stored.state(), CredentialState::Initialized);
        assert_eq!(flow.load().unwrap().expose_secret(), SECRET);
    }

    #[test]
    fn setup_writes_current_record_format() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.with_plaintext(SECRET).unwrap();
        workflow(&fixture, FixedIdentity::new("host-a"))
            .setup(SetupOptions::default())
            .unwrap();

        let record = store::load(&path).unwrap().encrypted_credential.unwrap();
        match &record {
            EncryptedCredential::Sealed(sealed) => {
                assert_eq!(sealed.version, store::RECORD_VERSION);
                assert_eq!(sealed.algorithm, KeyScheme::CURRENT.to_string());
            }
            EncryptedCredential::Legacy(_) => panic!("setup wrote a legacy record"),
        }
        assert_eq!(record.scheme().unwrap(), KeyScheme::CURRENT);
    }

    #[test]
    fn scrub_clears_plaintext_and_load_still_works() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.with_plaintext(SECRET).unwrap();
        let flow = workflow(&fixture, FixedIdentity::new("host-a"));

        let report = flow.setup(SetupOptions { scrub: true }).unwrap();
        assert_eq!(report.outcome, SetupOutcome::Encrypted { scrubbed: true });

        let raw = fixture.read(&path).unwrap();
        assert!(!raw.contains(SECRET));
        assert!(raw.contains("plaintext_credential = \"\""));
        assert_eq!(flow.load().unwrap().expose_secret(), SECRET);
    }

    #[test]
    fn setup_without_plaintext_is_a_noop() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.with_plaintext(SECRET).unwrap();
        let identity = FixedIdentity::new("host-a");
        let flow = workflow(&fixture, identity.clone());
        flow.setup(SetupOptions { scrub: true }).unwrap();
        let before = fixture.read(&path).unwrap();
        let calls = identity.calls();

        let report = flow.setup(SetupOptions { scrub: true }).unwrap();
        assert_eq!(report.outcome, SetupOutcome::NothingToDo);
        assert_eq!(fixture.read(&path).unwrap(), before);
        assert_eq!(identity.calls(), calls);
    }

    #[test]
    fn rerunning_setup_with_retained_plaintext_reseals() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.with_plaintext(SECRET).unwrap();
        let flow = workflow(&fixture, FixedIdentity::new("host-a"));

        flow.setup(SetupOptions::default()).unwrap();
        let first = store::load(&path).unwrap().encrypted_credential.unwrap();
        flow.setup(SetupOptions::default()).unwrap();
        let second = store::load(&path).unwrap().encrypted_credential.unwrap();

        assert_ne!(first.blob(), second.blob());
        assert_eq!(flow.load().unwrap().expose_secret(), SECRET);
    }

    #[test]
    #[traced_test]
    fn load_on_another_machine_fails_authentication() {
        let fixture = CredentialFixture::new().unwrap();
        fixture.with_plaintext(SECRET).unwrap();
        workflow(&fixture, FixedIdentity::new("host-a"))
            .setup(SetupOptions { scrub: true })
            .unwrap();

        let err = workflow(&fixture, FixedIdentity::new("host-b")).load().unwrap_err();
        assert!(matches!(err, KeyboundError::AuthenticationFailure));
        assert!(logs_contain("credential failed authentication"));
    }

    #[test]
    fn load_without_encrypted_credential_fails() {
        let fixture = CredentialFixture::new().unwrap();
        fixture.with_plaintext(SECRET).unwrap();
        let identity = FixedIdentity::new("host-a");

        let err = workflow(&fixture, identity.clone()).load().unwrap_err();
        assert!(matches!(err, KeyboundError::EmptyCredential));
        assert_eq!(identity.calls(), 0);
    }

    #[test]
    fn load_never_writes() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.with_plaintext(SECRET).unwrap();
        let flow = workflow(&fixture, FixedIdentity::new("host-a"));
        flow.setup(SetupOptions::default()).unwrap();
        let before = fixture.read(&path).unwrap();

        flow.load().unwrap();
        flow.load().unwrap();
        assert_eq!(fixture.read(&path).unwrap(), before);
    }

    #[test]
    fn non_utf8_plaintext_is_rejected() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.root().join("project/app/target").join(FIXTURE_FILE_NAME);
        let key = kdf::derive_key(KeyScheme::CURRENT, "host-a").unwrap();
        let blob = crypto::encrypt(&[0xff, 0xfe, 0x00, 0x80], &key).unwrap();
        let config = CredentialConfig {
            plaintext_credential: None,
            encrypted_credential: Some(EncryptedCredential::sealed(KeyScheme::CURRENT, blob)),
        };
        store::save(&path, &config).unwrap();

        let err = workflow(&fixture, FixedIdentity::new("host-a")).load().unwrap_err();
        assert!(matches!(err, KeyboundError::InvalidUtf8));
    }

    #[test]
    fn unavailable_identity_fails_setup_without_writing() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.with_plaintext(SECRET).unwrap();
        let before = fixture.read(&path).unwrap();

        let err = workflow(&fixture, UnavailableIdentity)
            .setup(SetupOptions { scrub: true })
            .unwrap_err();
        assert!(matches!(err, KeyboundError::IdentityUnavailable(_)));
        assert_eq!(fixture.read(&path).unwrap(), before);
    }

    #[test]
    fn missing_file_reports_candidates() {
        let fixture = CredentialFixture::new().unwrap();
        let err = workflow(&fixture, FixedIdentity::new("host-a"))
            .setup(SetupOptions::default())
            .unwrap_err();
        assert!(matches!(err, KeyboundError::ConfigNotFound { ref candidates } if candidates.len() == 7));
    }

    #[test]
    fn inspect_tracks_lifecycle() {
        let fixture = CredentialFixture::new().unwrap();
        let path = fixture.write(Path::new("work").join(FIXTURE_FILE_NAME), "").unwrap();
        let identity = FixedIdentity::new("host-a");
        let flow = workflow(&fixture, identity.clone());

        assert_eq!(flow.inspect().unwrap().state, CredentialState::Empty);

        fixture.write("work/credential.toml", &format!("plaintext_credential = \"{SECRET}\"\n")).unwrap();
        let inspection = flow.inspect().unwrap();
        assert_eq!(inspection.path, path);
        assert_eq!(inspection.state, CredentialState::Uninitialized);

        flow.setup(SetupOptions { scrub: true }).unwrap();
        assert_eq!(flow.inspect().unwrap().state, CredentialState::Initialized);
        assert_eq!(identity.calls(), 1);
    }

    #[test]
    #[traced_test]
    fn secret_never_reaches_logs() {
        let fixture = CredentialFixture::new().unwrap();
        fixture.with_plaintext(SECRET).unwrap();
        let flow = workflow(&fixture, FixedIdentity::new("host-identity-value"));

        flow.setup(SetupOptions::default()).unwrap();
        flow.load().unwrap();

        assert!(logs_contain("credential encrypted"));
        assert!(logs_contain("plaintext credential retained"));
        assert!(!logs_contain(SECRET));
        assert!(!logs_contain("host-identity-value"));
    }

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("sk-ant-REDACTED"), "sk-a...mnop");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn mask_secret_exact_boundary() {
        assert_eq!(mask_secret("1234567890"), "1234...7890");
    }

    #[test]
    fn mask_secret_counts_characters_not_bytes() {
        assert_eq!(mask_secret("ключ-abc"), "****");
        assert_eq!(mask_secret("ключ-0123-секрет"), "ключ...крет");
    }
}
