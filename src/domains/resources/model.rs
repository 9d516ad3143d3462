//! Resource entity and creation input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ResourceError;

/// Lifecycle status of a resource.
///
/// Transitions between the two values are unrestricted and only happen
/// through an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    /// All accepted values, in wire form.
    pub const VALUES: [&'static str; 2] = ["active", "inactive"];

    /// Wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(ResourceError::invalid_argument(format!(
                "status must be one of {:?}, got '{}'",
                Self::VALUES,
                other
            ))),
        }
    }
}

/// A stored resource, exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a resource.
///
/// `name` and `description` must already be present; checking that is the
/// caller's job. `status` is kept in wire form so the store decides whether
/// it is acceptable and what an omitted value means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResource {
    pub name: String,
    pub description: String,
    pub status: Option<String>,
}

impl NewResource {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
