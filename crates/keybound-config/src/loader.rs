// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings loader using Figment for layered merging.
//!
//! Supports `./keybound.toml` > `~/.config/keybound/keybound.toml` >
//! `/etc/keybound/keybound.toml`, with `KEYBOUND_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KeyboundConfig;

/// System-wide settings file.
pub const SYSTEM_SETTINGS_PATH: &str = "/etc/keybound/keybound.toml";

/// Settings file looked up in the working directory.
pub const LOCAL_SETTINGS_FILE: &str = "keybound.toml";

/// Load settings from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/keybound/keybound.toml`
/// 3. `~/.config/keybound/keybound.toml`
/// 4. `./keybound.toml`
/// 5. `KEYBOUND_*` environment variables
pub fn load_config() -> Result<KeyboundConfig, figment::Error> {
    build_figment().extract()
}

/// Load settings from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<KeyboundConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyboundConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Build the Figment used for settings loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KeyboundConfig::default()))
        .merge(Toml::file(SYSTEM_SETTINGS_PATH))
        .merge(Toml::file(user_settings_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_SETTINGS_FILE))
        .merge(env_provider())
}

/// `~/.config/keybound/keybound.toml` (platform equivalent), if a config dir exists.
pub fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keybound").join(LOCAL_SETTINGS_FILE))
}

/// Map `KEYBOUND_SECTION_KEY` onto `section.key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `KEYBOUND_CREDENTIAL_FILE_NAME` maps to `credential.file_name`.
fn env_provider() -> Env {
    Env::prefixed("KEYBOUND_").map(|key| {
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("credential_", "credential.", 1)
            .replacen("identity_", "identity.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
