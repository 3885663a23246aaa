use std::path::Path;

use ordo_util::errors::{OrdoError, OrdoResult};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides [`ResolverConfig::warn_on_missing_dependencies`].
pub const WARN_ON_MISSING_ENV: &str = "ORDO_WARN_ON_MISSING_DEPENDENCIES";

/// Resolver settings, typically read from a `[resolver]` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Report unresolved dependencies as a warning instead of failing.
    #[serde(default)]
    pub warn_on_missing_dependencies: bool,
}

impl ResolverConfig {
    /// Strict configuration: unresolved dependencies fail resolution.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Permissive configuration: unresolved dependencies are only reported.
    pub fn permissive() -> Self {
        Self {
            warn_on_missing_dependencies: true,
        }
    }

    /// Parse a standalone config document.
    pub fn from_toml_str(content: &str) -> OrdoResult<Self> {
        toml::from_str(content).map_err(|e| {
            OrdoError::Config {
                message: format!("Failed to parse resolver config: {e}"),
            }
            .into()
        })
    }

    /// Load the configuration at `path`, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> OrdoResult<Self> {
        if !path.is_file() {
            tracing::debug!("no resolver config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| OrdoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply [`WARN_ON_MISSING_ENV`] if it is set.
    pub fn with_env_overrides(mut self) -> OrdoResult<Self> {
        let Ok(value) = std::env::var(WARN_ON_MISSING_ENV) else {
            return Ok(self);
        };
        self.warn_on_missing_dependencies = parse_flag(&value).ok_or_else(|| OrdoError::Config {
            message: format!("{WARN_ON_MISSING_ENV} must be a boolean, got `{value}`"),
        })?;
        Ok(self)
    }

    /// Override the missing-dependency policy from a textual flag value.
    pub fn with_override(mut self, value: &str) -> OrdoResult<Self> {
        self.warn_on_missing_dependencies = parse_flag(value).ok_or_else(|| OrdoError::Config {
            message: format!("warn-on-missing-dependencies must be a boolean, got `{value}`"),
        })?;
        Ok(self)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
