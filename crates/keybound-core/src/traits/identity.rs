// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host identity provider trait.

use crate::error::KeyboundError;

/// Source of the host-specific string the credential key is derived from.
///
/// Implementations must be deterministic for a given host, at least for the
/// lifetime of one boot. The value is trust material rather than secret
/// material, but callers still never log it.
pub trait MachineIdentity: Send + Sync {
    /// Returns the identity string, or [`KeyboundError::IdentityUnavailable`]
    /// when the host cannot produce a non-empty value.
    fn identity(&self) -> Result<String, KeyboundError>;
}

impl<T: MachineIdentity + ?Sized> MachineIdentity for Box<T> {
    fn identity(&self) -> Result<String, KeyboundError> {
        (**self).identity()
    }
}

impl<T: MachineIdentity + ?Sized> MachineIdentity for &T {
    fn identity(&self) -> Result<String, KeyboundError> {
        (**self).identity()
    }
}
