// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keybound setup`, `show` and `locate`.
//!
//! Each command returns the text to print so the binary stays a thin shell.

use keybound_core::{CredentialState, KeyboundError, MachineIdentity};
use keybound_vault::{CredentialWorkflow, SetupOptions, SetupOutcome, mask_secret};
use secrecy::ExposeSecret;

/// Encrypt the plaintext credential, then prove the result decrypts.
pub fn run_setup<I: MachineIdentity>(
    workflow: &CredentialWorkflow<I>,
    scrub: bool,
) -> Result<String, KeyboundError> {
    let report = workflow.setup(SetupOptions { scrub })?;
    let path = report.path.display();

    match report.outcome {
        SetupOutcome::NothingToDo => Ok(format!(
            "Nothing to do: {path} has no plaintext credential.\n"
        )),
        SetupOutcome::Encrypted { scrubbed } => {
            let secret = workflow.load()?;
            let mut out = format!("Encrypted credential in {path}\n");
            out.push_str(&format!("  verified: {}\n", mask_secret(secret.expose_secret())));
            if !scrubbed {
                out.push_str("  plaintext_credential is still set; run `keybound setup --scrub` to clear it\n");
            }
            Ok(out)
        }
    }
}

/// Decrypt and print the credential, masked unless `reveal` is set.
pub fn run_show<I: MachineIdentity>(
    workflow: &CredentialWorkflow<I>,
    reveal: bool,
) -> Result<String, KeyboundError> {
    let secret = workflow.load()?;
    let value = secret.expose_secret();
    Ok(if reveal {
        format!("{value}\n")
    } else {
        format!("{}\n", mask_secret(value))
    })
}

/// List every candidate path in search order and mark the one in use.
pub fn run_locate<I: MachineIdentity>(workflow: &CredentialWorkflow<I>) -> Result<String, KeyboundError> {
    let locator = workflow.locator();
    let found = locator.locate()?;

    let mut out = String::new();
    for (i, candidate) in locator.candidates().iter().enumerate() {
        let marker = if *candidate == found { "*" } else { " " };
        out.push_str(&format!("{marker} {}. {}\n", i + 1, candidate.display()));
    }
    out.push_str(&format!("\nUsing {}\n", found.display()));
    Ok(out)
}

/// Whether `err` leaves the credential impossible to recover on this host
/// without the original plaintext.
pub fn is_unrecoverable<I: MachineIdentity>(err: &KeyboundError, workflow: &CredentialWorkflow<I>) -> bool {
    match err {
        KeyboundError::EmptyCredential => workflow
            .inspect()
            .is_ok_and(|inspection| inspection.state == CredentialState::Empty),
        other => other.is_unrecoverable(),
    }
}
