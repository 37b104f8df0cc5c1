// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key derivation from the machine identity.
//!
//! New records use HKDF-SHA256 with a fixed application salt and info string.
//! The older pad/truncate scheme is kept so records written before HKDF was
//! introduced can still be opened; it is unsalted and a short identity gives a
//! weak key.

use keybound_core::{KeyScheme, KeyboundError};
use ring::hkdf;
use zeroize::Zeroizing;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

const HKDF_SALT: &[u8] = b"keybound/machine-bound-credential/v2";
const HKDF_INFO: &[u8] = b"keybound aes-256-gcm credential key";

/// Derive the 32-byte key for `identity` under `scheme`.
///
/// The returned key is wiped on drop.
pub fn derive_key(scheme: KeyScheme, identity: &str) -> Result<Zeroizing<[u8; KEY_LEN]>, KeyboundError> {
    if identity.is_empty() {
        return Err(KeyboundError::IdentityUnavailable(
            "empty machine identity".to_string(),
        ));
    }

    match scheme {
        KeyScheme::PaddedIdentity => Ok(padded_identity_key(identity)),
        KeyScheme::HkdfSha256 => hkdf_identity_key(identity),
    }
}

/// Right-pad `identity` with ASCII spaces to 32 bytes, or keep its first 32 bytes.
pub fn padded_identity_key(identity: &str) -> Zeroizing<[u8; KEY_LEN]> {
    let bytes = identity.as_bytes();
    let take = bytes.len().min(KEY_LEN);

    let mut key = Zeroizing::new([b' '; KEY_LEN]);
    key[..take].copy_from_slice(&bytes[..take]);
    key
}

/// HKDF-SHA256(salt = application salt, ikm = identity, info = application info).
pub fn hkdf_identity_key(identity: &str) -> Result<Zeroizing<[u8; KEY_LEN]>, KeyboundError> {
    let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, HKDF_SALT).extract(identity.as_bytes());
    let okm = prk
        .expand(&[HKDF_INFO], hkdf::HKDF_SHA256)
        .map_err(|_| KeyboundError::Internal("HKDF expansion failed".to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    okm.fill(&mut key[..])
        .map_err(|_| KeyboundError::Internal("HKDF key fill failed".to_string()))?;
    Ok(key)
}
