//! Allow-list configuration
//!
//! The permitted values for `source`, `tags` and `category` are injected
//! into the validation pipeline rather than compiled in. Defaults match the
//! values the service has always shipped with; deployments override them
//! through environment variables or a TOML file.

use crate::{ConfigError, RosterResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Comma-separated list of allowed sources.
pub const ENV_ALLOWED_SOURCES: &str = "ROSTER_ALLOWED_SOURCES";
/// Comma-separated list of allowed tags.
pub const ENV_ALLOWED_TAGS: &str = "ROSTER_ALLOWED_TAGS";
/// Comma-separated list of allowed categories.
pub const ENV_ALLOWED_CATEGORIES: &str = "ROSTER_ALLOWED_CATEGORIES";
/// "true" enables the unrestricted `ALL` visibility kind.
pub const ENV_ALLOW_UNRESTRICTED_SCOPE: &str = "ROSTER_ALLOW_UNRESTRICTED_SCOPE";

/// Permitted values per validated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowLists {
    pub sources: Vec<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub allow_unrestricted_scope: bool,
}

impl Default for AllowLists {
    fn default() -> Self {
        Self {
            sources: to_owned_list(&["fastgpt", "hand"]),
            tags: to_owned_list(&["大语言模型", "语音模型", "图像模型"]),
            categories: to_owned_list(&["智能助手", "效率工具"]),
            allow_unrestricted_scope: false,
        }
    }
}

impl AllowLists {
    /// Build allow-lists from environment variables, falling back to the
    /// defaults for any variable that is unset.
    ///
    /// Environment variables:
    /// - `ROSTER_ALLOWED_SOURCES`: comma-separated sources
    /// - `ROSTER_ALLOWED_TAGS`: comma-separated tags
    /// - `ROSTER_ALLOWED_CATEGORIES`: comma-separated categories
    /// - `ROSTER_ALLOW_UNRESTRICTED_SCOPE`: "true" or "false" (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sources: env_list(ENV_ALLOWED_SOURCES).unwrap_or(defaults.sources),
            tags: env_list(ENV_ALLOWED_TAGS).unwrap_or(defaults.tags),
            categories: env_list(ENV_ALLOWED_CATEGORIES).unwrap_or(defaults.categories),
            allow_unrestricted_scope: std::env::var(ENV_ALLOW_UNRESTRICTED_SCOPE)
                .map(|s| s.eq_ignore_ascii_case("true") || s == "1")
                .unwrap_or(defaults.allow_unrestricted_scope),
        }
    }

    /// Parse allow-lists from TOML. Missing keys take their default value.
    pub fn from_toml_str(raw: &str) -> RosterResult<Self> {
        let lists: Self = toml::from_str(raw).map_err(|e| ConfigError::InvalidValue {
            field: "allow_lists".to_string(),
            value: "<toml>".to_string(),
            reason: e.to_string(),
        })?;
        lists.validate()?;
        Ok(lists)
    }

    /// Load allow-lists from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RosterResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Validate the configuration.
    ///
    /// Sources and categories are required fields on every agent, so an
    /// empty allow-list for either would reject every request.
    pub fn validate(&self) -> RosterResult<()> {
        if self.sources.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "sources".to_string(),
            }
            .into());
        }
        if self.categories.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "categories".to_string(),
            }
            .into());
        }
        for (field, list) in [
            ("sources", &self.sources),
            ("tags", &self.tags),
            ("categories", &self.categories),
        ] {
            if let Some(blank) = list.iter().find(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: blank.clone(),
                    reason: "allow-list entries must not be blank".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn allows_source(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s == source)
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn allows_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|s| {
        s.split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    })
}
