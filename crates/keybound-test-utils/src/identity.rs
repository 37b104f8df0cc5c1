// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity providers that never touch real host state.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use keybound_core::{KeyboundError, MachineIdentity};

/// Returns the same identity string on every call and counts calls.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    value: String,
    calls: Arc<AtomicUsize>,
}

impl FixedIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times [`MachineIdentity::identity`] was called, across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MachineIdentity for FixedIdentity {
    fn identity(&self) -> Result<String, KeyboundError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.clone())
    }
}

/// Always fails, like a sandbox with no readable machine id.
#[derive(Debug, Clone, Default)]
pub struct UnavailableIdentity;

impl MachineIdentity for UnavailableIdentity {
    fn identity(&self) -> Result<String, KeyboundError> {
        Err(KeyboundError::IdentityUnavailable(
            "machine id hidden by sandbox".to_string(),
        ))
    }
}
