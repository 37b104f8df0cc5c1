// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for keybound.
//!
//! # Components
//!
//! - [`FixedIdentity`] / [`UnavailableIdentity`] - deterministic identity providers
//! - [`CredentialFixture`] - a temp directory tree for credential file tests

pub mod fixture;
pub mod identity;

pub use fixture::{CredentialFixture, FIXTURE_FILE_NAME};
pub use identity::{FixedIdentity, UnavailableIdentity};
