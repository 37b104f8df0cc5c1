// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for keybound.
//!
//! This crate holds the pieces every other keybound crate agrees on: the
//! [`KeyboundError`] taxonomy, the [`MachineIdentity`] trait that identity
//! providers implement, and the small shared enums describing key schemes and
//! credential file states.

pub mod error;
pub mod traits;
pub mod types;

pub use error::KeyboundError;
pub use traits::MachineIdentity;
pub use types::{CredentialState, KeyScheme};
