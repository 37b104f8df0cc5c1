// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings model for keybound.
//!
//! These are the tool's own settings, not the credential file. All structs use
//! `#[serde(deny_unknown_fields)]` so a misspelled key fails at startup with
//! a suggestion instead of being silently ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level keybound settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyboundConfig {
    /// Where the credential file lives and how to find it.
    #[serde(default)]
    pub credential: CredentialFileConfig,

    /// Which machine identity source keys are derived from.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Credential file location settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialFileConfig {
    /// Explicit credential file path. When set, no search is performed.
    #[serde(default)]
    pub path: Option<String>,

    /// File name used by the fallback search.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Whether to search around the executable and working directory when no
    /// explicit path is set.
    #[serde(default = "default_search")]
    pub search: bool,
}

impl Default for CredentialFileConfig {
    fn default() -> Self {
        Self {
            path: None,
            file_name: default_file_name(),
            search: default_search(),
        }
    }
}

impl CredentialFileConfig {
    /// The explicit path, if one is configured and non-blank.
    pub fn explicit_path(&self) -> Option<PathBuf> {
        self.path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

fn default_file_name() -> String {
    "credential.toml".to_string()
}

fn default_search() -> bool {
    true
}

/// Where the machine identity comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentitySource {
    /// The operating system's machine id.
    #[default]
    Host,
    /// The trimmed contents of `identity.path`.
    File,
}

/// Machine identity settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Identity source.
    #[serde(default)]
    pub source: IdentitySource,

    /// File holding the identity when `source = "file"`.
    #[serde(default)]
    pub path: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Log level for keybound targets (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_search_for_credential_toml() {
        let config = KeyboundConfig::default();
        assert_eq!(config.credential.file_name, "credential.toml");
        assert!(config.credential.search);
        assert!(config.credential.explicit_path().is_none());
        assert_eq!(config.identity.source, IdentitySource::Host);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn blank_explicit_path_is_ignored() {
        let credential = CredentialFileConfig {
            path: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(credential.explicit_path().is_none());
    }

    #[test]
    fn identity_source_parses_lowercase() {
        let config: KeyboundConfig = toml::from_str(
            r#"
[identity]
source = "file"
path = "/run/host-id"
"#,
        )
        .unwrap();
        assert_eq!(config.identity.source, IdentitySource::File);
        assert_eq!(config.identity.path.as_deref(), Some("/run/host-id"));
    }

    #[test]
    fn unknown_section_key_is_rejected() {
        let result = toml::from_str::<KeyboundConfig>("[credential]\nfile_nmae = \"x\"\n");
        assert!(result.is_err());
    }
}
