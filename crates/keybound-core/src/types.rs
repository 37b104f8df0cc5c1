// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared enums describing key schemes and credential file states.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the 32-byte AES-256-GCM key is obtained from the machine identity.
///
/// The serialized form doubles as the `algorithm` field of a sealed
/// credential record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum KeyScheme {
    /// Identity right-padded with spaces or truncated to 32 bytes.
    /// Only used to open records written before HKDF was introduced.
    #[serde(rename = "aes-256-gcm+padded-identity")]
    #[strum(serialize = "aes-256-gcm+padded-identity")]
    PaddedIdentity,
    /// HKDF-SHA256 over the identity with a fixed application salt.
    #[serde(rename = "aes-256-gcm+hkdf-sha256")]
    #[strum(serialize = "aes-256-gcm+hkdf-sha256")]
    HkdfSha256,
}

impl KeyScheme {
    /// Scheme used for every newly sealed credential.
    pub const CURRENT: KeyScheme = KeyScheme::HkdfSha256;

    /// Record format version that introduced this scheme.
    pub fn format_version(self) -> u32 {
        match self {
            KeyScheme::PaddedIdentity => 1,
            KeyScheme::HkdfSha256 => 2,
        }
    }
}

/// Lifecycle state of a credential file, derived from its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CredentialState {
    /// Neither field carries a value; setup has nothing to encrypt.
    Empty,
    /// Plaintext present, no encrypted record yet.
    Uninitialized,
    /// An encrypted record is present (plaintext may be retained or scrubbed).
    Initialized,
}
