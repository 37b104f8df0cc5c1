// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of settings.

use crate::diagnostic::ConfigError;
use crate::model::{IdentitySource, KeyboundConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate settings for semantic correctness.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &KeyboundConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let file_name = config.credential.file_name.trim();
    if file_name.is_empty() {
        errors.push(ConfigError::Validation {
            message: "credential.file_name must not be empty".to_string(),
        });
    } else if file_name.contains(['/', '\\']) {
        errors.push(ConfigError::Validation {
            message: format!(
                "credential.file_name `{file_name}` must be a bare file name; use credential.path for a full path"
            ),
        });
    }

    if let Some(path) = &config.credential.path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "credential.path must not be blank when set".to_string(),
        });
    }

    if config.credential.explicit_path().is_none() && !config.credential.search {
        errors.push(ConfigError::Validation {
            message: "credential.search is disabled but credential.path is not set".to_string(),
        });
    }

    if config.identity.source == IdentitySource::File
        && config
            .identity
            .path
            .as_deref()
            .is_none_or(|p| p.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "identity.path is required when identity.source = \"file\"".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
