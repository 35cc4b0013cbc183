//! Agent creation rules
//!
//! The rules run in a fixed order and stop at the first failure, so the
//! error a caller sees is deterministic. Name uniqueness needs storage and
//! is checked by the creation service after these rules pass.

use crate::{AgentDraft, AllowLists, ValidationError, VisibilityScope};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum agent name length, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Absolute http(s) URL: scheme, a non-empty authority, optional rest.
static HTTP_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/?#]+(?:[/?#]\S*)?$").unwrap_or_else(|e| {
        unreachable!("static URL pattern failed to compile: {e}")
    })
});

/// Returns true when `url` is an absolute `http://` or `https://` URL.
pub fn is_http_url(url: &str) -> bool {
    HTTP_URL.is_match(url)
}

/// Validates drafts against a set of allow-lists.
#[derive(Debug, Clone, Copy)]
pub struct AgentValidator<'a> {
    allow_lists: &'a AllowLists,
}

impl<'a> AgentValidator<'a> {
    pub fn new(allow_lists: &'a AllowLists) -> Self {
        Self { allow_lists }
    }

    /// Run every storage-independent rule in order.
    pub fn validate(&self, draft: &AgentDraft) -> Result<(), ValidationError> {
        validate_name(&draft.name)?;
        validate_description(&draft.description)?;
        self.validate_source(&draft.source)?;
        self.validate_tags(&draft.tags)?;
        validate_icon_url(draft.icon_url.as_deref())?;
        self.validate_category(&draft.category)?;
        validate_target_system_url(&draft.target_system_url)?;
        self.validate_visibility_scope(draft.visibility_scope.as_ref())
    }

    pub fn validate_source(&self, source: &str) -> Result<(), ValidationError> {
        if source.is_empty() || !self.allow_lists.allows_source(source) {
            return Err(ValidationError::InvalidSource {
                value: source.to_string(),
                allowed: self.allow_lists.sources.clone(),
            });
        }
        Ok(())
    }

    pub fn validate_tags(&self, tags: &[String]) -> Result<(), ValidationError> {
        match tags.iter().find(|tag| !self.allow_lists.allows_tag(tag)) {
            Some(tag) => Err(ValidationError::InvalidTag {
                tag: tag.clone(),
                allowed: self.allow_lists.tags.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn validate_category(&self, category: &str) -> Result<(), ValidationError> {
        if category.is_empty() || !self.allow_lists.allows_category(category) {
            return Err(ValidationError::InvalidCategory {
                category: category.to_string(),
                allowed: self.allow_lists.categories.clone(),
            });
        }
        Ok(())
    }

    pub fn validate_visibility_scope(
        &self,
        scope: Option<&VisibilityScope>,
    ) -> Result<(), ValidationError> {
        scope
            .ok_or_else(|| ValidationError::InvalidVisibilityScope {
                reason: "Visibility scope cannot be null".to_string(),
            })?
            .validate(self.allow_lists.allow_unrestricted_scope)
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: "Agent name is required".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            reason: format!("Agent name must not exceed {} characters", MAX_NAME_CHARS),
        });
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::InvalidDescription {
            reason: "Description is required".to_string(),
        });
    }
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::InvalidDescription {
            reason: format!(
                "Description must not exceed {} characters",
                MAX_DESCRIPTION_CHARS
            ),
        });
    }
    Ok(())
}

/// An absent or empty icon URL is accepted.
pub fn validate_icon_url(icon_url: Option<&str>) -> Result<(), ValidationError> {
    match icon_url {
        Some(url) if !url.is_empty() && !is_http_url(url) => Err(ValidationError::InvalidIconUrl {
            url: url.to_string(),
        }),
        _ => Ok(()),
    }
}

pub fn validate_target_system_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || !is_http_url(url) {
        return Err(ValidationError::InvalidTargetUrl {
            url: url.to_string(),
        });
    }
    Ok(())
}
