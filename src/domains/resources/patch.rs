//! Partial updates.
//!
//! Every field of a [`ResourcePatch`] distinguishes three cases:
//!
//! - `None` - the field was omitted, keep the current value
//! - `Some(None)` - the field was sent as `null`, clear it
//! - `Some(Some(v))` - set the field to `v`

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use std::fmt;

use super::error::{ResourceError, ResourceResult};
use super::model::{Resource, Status};

/// A partial set of fields supplied to an update.
///
/// Only a JSON object is accepted. Fields the patch does not know about
/// (including `id` and `createdAt`) are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePatch {
    pub name: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub status: Option<Option<String>>,
}

impl<'de> Deserialize<'de> for ResourcePatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PatchVisitor)
    }
}

struct PatchVisitor;

impl<'de> Visitor<'de> for PatchVisitor {
    type Value = ResourcePatch;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with any of name, description, status")
    }

    fn visit_map<A>(self, mut map: A) -> Result<ResourcePatch, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut patch = ResourcePatch::default();

        while let Some(key) = map.next_key::<String>()? {
            let (field, slot) = match key.as_str() {
                "name" => ("name", &mut patch.name),
                "description" => ("description", &mut patch.description),
                "status" => ("status", &mut patch.status),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };

            if slot.is_some() {
                return Err(de::Error::duplicate_field(field));
            }
            // `null` is kept as `Some(None)`
            *slot = Some(map.next_value::<Option<String>>()?);
        }

        Ok(patch)
    }
}

/// A patch whose values have all been checked.
#[derive(Debug, Default)]
pub(crate) struct ValidPatch {
    name: Option<String>,
    description: Option<String>,
    status: Option<Status>,
}

impl ResourcePatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Some(name.into()));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(Some(status.into()));
        self
    }

    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Check every supplied field without applying anything.
    pub(crate) fn validate(&self) -> ResourceResult<ValidPatch> {
        let name = match &self.name {
            None => None,
            Some(None) => return Err(ResourceError::invalid_argument("name cannot be cleared")),
            Some(Some(name)) => Some(name.clone()),
        };

        let description = match &self.description {
            None => None,
            Some(None) => Some(String::new()),
            Some(Some(description)) => Some(description.clone()),
        };

        let status = match &self.status {
            None => None,
            Some(None) => {
                return Err(ResourceError::invalid_argument("status cannot be cleared"));
            }
            Some(Some(status)) => Some(status.parse()?),
        };

        Ok(ValidPatch {
            name,
            description,
            status,
        })
    }
}

impl ValidPatch {
    /// Apply to a record. `id` and `created_at` are never touched.
    pub(crate) fn apply(self, resource: &mut Resource) {
        if let Some(name) = self.name {
            resource.name = name;
        }
        if let Some(description) = self.description {
            resource.description = description;
        }
        if let Some(status) = self.status {
            resource.status = status;
        }
    }
}
