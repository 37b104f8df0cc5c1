// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings for keybound.
//!
//! Provides TOML settings parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `KEYBOUND_*` environment overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use keybound_config::load_and_validate;
//!
//! let config = load_and_validate().expect("settings errors");
//! println!("credential file name: {}", config.credential.file_name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_str};
pub use model::{CredentialFileConfig, IdentityConfig, IdentitySource, KeyboundConfig, LogConfig};

/// Load settings from the file hierarchy and environment, then validate.
pub fn load_and_validate() -> Result<KeyboundConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(
                explicit_path = config.credential.explicit_path().is_some(),
                search = config.credential.search,
                "settings loaded"
            );
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &collect_toml_sources())),
    }
}

/// Load settings from a TOML string and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<KeyboundConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Settings file contents, used to attach source spans to errors.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_SETTINGS_FILE) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_SETTINGS_FILE).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_SETTINGS_FILE.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_settings_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push((path.display().to_string(), content));
    }

    if let Ok(content) = std::fs::read_to_string(loader::SYSTEM_SETTINGS_PATH) {
        sources.push((loader::SYSTEM_SETTINGS_PATH.to_string(), content));
    }

    sources
}
