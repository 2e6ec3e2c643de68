//! Resource status and mutation inputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Lifecycle status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceStatus {
    /// Resource is in use.
    #[default]
    Active,
    /// Resource is parked but still visible.
    Inactive,
}

impl ResourceStatus {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown resource status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ResourceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("active") {
            Ok(Self::Active)
        } else if s.eq_ignore_ascii_case("inactive") {
            Ok(Self::Inactive)
        } else {
            Err(UnknownStatus(s.to_string()))
        }
    }
}

/// Input for creating a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateResourceInput {
    /// Resource name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Optional description.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl CreateResourceInput {
    /// Creates an input with a name and no description.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a resource.
///
/// Only fields that are `Some` overwrite the stored values.
/// `description: Some(None)` (JSON `null`) clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateResourceInput {
    /// New name.
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New description, or `Some(None)` to clear it.
    #[serde(
        default,
        with = "::serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 1000))]
    pub description: Option<Option<String>>,
    /// New status.
    #[serde(default)]
    pub status: Option<ResourceStatus>,
}

impl UpdateResourceInput {
    /// Returns true when the patch carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}
