// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams injected into the credential workflow.

pub mod identity;

pub use identity::MachineIdentity;
