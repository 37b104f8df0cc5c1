// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for keybound.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// The error type returned by every credential operation.
///
/// None of these are retried. Configuration problems are fixed by the
/// operator; [`KeyboundError::AuthenticationFailure`] is a security-relevant
/// refusal and must be surfaced as such.
#[derive(Debug, Error, Diagnostic)]
pub enum KeyboundError {
    /// No credential file exists at any candidate location.
    #[error("credential file not found ({} location(s) checked)", candidates.len())]
    #[diagnostic(
        code(keybound::config_not_found),
        help("checked, in order:\n{}", format_candidates(candidates))
    )]
    ConfigNotFound { candidates: Vec<PathBuf> },

    /// The credential file exists but could not be read.
    #[error("failed to read credential file {}: {source}", path.display())]
    #[diagnostic(code(keybound::read))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The credential file is not valid TOML or has the wrong shape.
    #[error("failed to parse credential file {}: {message}", path.display())]
    #[diagnostic(code(keybound::parse))]
    Parse { path: PathBuf, message: String },

    /// The credential file could not be written back.
    #[error("failed to write credential file {}: {source}", path.display())]
    #[diagnostic(code(keybound::write))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The host could not produce a machine identity.
    #[error("machine identity unavailable: {0}")]
    #[diagnostic(
        code(keybound::identity_unavailable),
        help("restricted or sandboxed environments may hide the machine id; configure [identity] source = \"file\"")
    )]
    IdentityUnavailable(String),

    /// The credential file holds no encrypted credential.
    #[error("credential file has no encrypted_credential")]
    #[diagnostic(
        code(keybound::empty_credential),
        help("set plaintext_credential and run `keybound setup`")
    )]
    EmptyCredential,

    /// The stored blob is not valid base64.
    #[error("encrypted credential is not valid base64: {0}")]
    #[diagnostic(code(keybound::base64))]
    Base64Decode(String),

    /// The decoded blob is shorter than a nonce.
    #[error("encrypted credential is too short ({len} bytes)")]
    #[diagnostic(code(keybound::ciphertext_too_short))]
    CiphertextTooShort { len: usize },

    /// The authentication tag did not verify.
    #[error("credential authentication failed: encrypted on a different machine or modified")]
    #[diagnostic(
        code(keybound::authentication_failure),
        help("do not retry: re-run `keybound setup` on this host with the original plaintext, and treat an unexpected failure as possible tampering")
    )]
    AuthenticationFailure,

    /// Encryption was asked to seal an empty plaintext.
    #[error("refusing to encrypt an empty credential")]
    #[diagnostic(code(keybound::plaintext_empty))]
    PlaintextEmpty,

    /// The system CSPRNG failed to produce a nonce.
    #[error("secure random source unavailable")]
    #[diagnostic(code(keybound::random_unavailable))]
    RandomSourceUnavailable,

    /// The sealed record uses a version or algorithm this build cannot open.
    #[error("unsupported credential record (version {version}, algorithm `{algorithm}`)")]
    #[diagnostic(
        code(keybound::unsupported_format),
        help("this record was written by a newer keybound; upgrade or re-run setup")
    )]
    UnsupportedFormat { version: u32, algorithm: String },

    /// The decrypted credential is not UTF-8 text.
    #[error("decrypted credential is not valid UTF-8")]
    #[diagnostic(code(keybound::invalid_utf8))]
    InvalidUtf8,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    #[diagnostic(code(keybound::internal))]
    Internal(String),
}

impl KeyboundError {
    /// Whether this failure leaves the credential file in the unrecoverable
    /// state: the encrypted record cannot be opened on this host.
    ///
    /// `EmptyCredential` is only unrecoverable when no plaintext remains, which
    /// the caller knows and this error does not.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(self, KeyboundError::AuthenticationFailure)
    }
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, p)| format!("  {}. {}", i + 1, p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
