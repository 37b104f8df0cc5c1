// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM seal/open and the base64 credential blob format.
//!
//! A blob is `nonce (12) || ciphertext || tag (16)`, encoded with standard
//! padded base64. Every call to [`seal`] draws a fresh random 96-bit nonce from
//! the system CSPRNG; nonce reuse under one key would void GCM's guarantees.

use base64::{Engine, engine::general_purpose::STANDARD};
use keybound_core::KeyboundError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// GCM nonce length in bytes.
pub const NONCE_SIZE: usize = NONCE_LEN;

/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, KeyboundError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeyboundError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt with a random nonce, returning `(ciphertext_with_tag, nonce)`.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_SIZE]), KeyboundError> {
    let less_safe = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| KeyboundError::RandomSourceUnavailable)?;

    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(Nonce::assume_unique_for_key(nonce_bytes), Aad::empty(), &mut in_out)
        .map_err(|_| KeyboundError::Internal("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt `ciphertext` (which must end with the tag appended by [`seal`]).
///
/// Any tag mismatch, including a remainder too short to hold a tag, is an
/// [`KeyboundError::AuthenticationFailure`].
pub fn open(
    key: &[u8; 32],
    nonce_bytes: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, KeyboundError> {
    let less_safe = aead_key(key)?;

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = less_safe
        .open_in_place(Nonce::assume_unique_for_key(*nonce_bytes), Aad::empty(), &mut in_out)
        .map_err(|_| KeyboundError::AuthenticationFailure)?
        .len();
    in_out.truncate(plaintext_len);

    Ok(in_out)
}

/// Encrypt `plaintext` into a base64 blob.
pub fn encrypt(plaintext: &[u8], key: &[u8; 32]) -> Result<String, KeyboundError> {
    if plaintext.is_empty() {
        return Err(KeyboundError::PlaintextEmpty);
    }

    let (ciphertext, nonce) = seal(key, plaintext)?;
    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(blob))
}

/// Decrypt a base64 blob produced by [`encrypt`].
pub fn decrypt(blob: &str, key: &[u8; 32]) -> Result<Zeroizing<Vec<u8>>, KeyboundError> {
    let raw = STANDARD
        .decode(blob.trim())
        .map_err(|e| KeyboundError::Base64Decode(e.to_string()))?;

    if raw.len() < NONCE_SIZE {
        return Err(KeyboundError::CiphertextTooShort { len: raw.len() });
    }

    let (nonce, ciphertext) = raw.split_at(NONCE_SIZE);
    let nonce: [u8; NONCE_SIZE] = nonce
        .try_into()
        .map_err(|_| KeyboundError::Internal("nonce split produced wrong length".to_string()))?;

    open(key, &nonce, ciphertext)
}
