//! The generic record and the tagged union over all record variants.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{display_value, is_blank, lenient_id, lenient_string};
use super::{CatalogItem, Department, Hardware, Incident, ResourceType, User};
use crate::error::SamanageError;

/// The fallback shape for endpoints without a registered variant.
///
/// Only `id` and `name` are kept; every other payload field is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericRecord {
    /// Entity ID, if the payload carried one.
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Entity name, if the payload carried one.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "is_blank")]
    pub name: Option<String>,
}

/// One entity returned by or sent to the API.
///
/// Serializes to the variant's sparse JSON form: empty and `null` fields
/// are left out, the rest appear in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// An entity from an endpoint outside the registry.
    Generic(GenericRecord),
    /// A hardware asset.
    Hardware(Hardware),
    /// A user account.
    User(User),
    /// A department.
    Department(Department),
    /// A service catalog item.
    CatalogItem(CatalogItem),
    /// An incident.
    Incident(Incident),
}

impl Record {
    /// Parses a payload returned by `endpoint`.
    ///
    /// Registered endpoints produce their specialized variant; anything else
    /// falls back to [`GenericRecord`].
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::Validation` if the payload is not a JSON
    /// object. Missing or oddly-typed fields never fail.
    pub fn parse(endpoint: &str, payload: Value) -> Result<Self, SamanageError> {
        Self::parse_as(endpoint.parse().ok(), payload)
    }

    /// Parses a payload as the variant registered for `resource_type`, or as a
    /// [`GenericRecord`] when `None`.
    pub fn parse_as(
        resource_type: Option<ResourceType>,
        payload: Value,
    ) -> Result<Self, SamanageError> {
        if !payload.is_object() {
            return Err(SamanageError::validation(format!(
                "record payload must be a JSON object, got: {}",
                payload
            )));
        }

        let record = match resource_type {
            None => Record::Generic(serde_json::from_value(payload)?),
            Some(ResourceType::Hardwares) => Record::Hardware(serde_json::from_value(payload)?),
            Some(ResourceType::Users) => Record::User(serde_json::from_value(payload)?),
            Some(ResourceType::Departments) => Record::Department(serde_json::from_value(payload)?),
            Some(ResourceType::CatalogItems) => {
                Record::CatalogItem(serde_json::from_value(payload)?)
            }
            Some(ResourceType::Incidents) => Record::Incident(serde_json::from_value(payload)?),
        };

        Ok(record)
    }

    /// Returns the resource type this variant belongs to, `None` for generic
    /// records.
    pub fn resource_type(&self) -> Option<ResourceType> {
        match self {
            Record::Generic(_) => None,
            Record::Hardware(_) => Some(ResourceType::Hardwares),
            Record::User(_) => Some(ResourceType::Users),
            Record::Department(_) => Some(ResourceType::Departments),
            Record::CatalogItem(_) => Some(ResourceType::CatalogItems),
            Record::Incident(_) => Some(ResourceType::Incidents),
        }
    }

    /// Returns the entity ID.
    pub fn id(&self) -> Option<i64> {
        match self {
            Record::Generic(r) => r.id,
            Record::Hardware(r) => r.id,
            Record::User(r) => r.id,
            Record::Department(r) => r.id,
            Record::CatalogItem(r) => r.id,
            Record::Incident(r) => r.id,
        }
    }

    /// Returns the entity name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Record::Generic(r) => r.name.as_deref(),
            Record::Hardware(r) => r.name.as_deref(),
            Record::User(r) => r.name.as_deref(),
            Record::Department(r) => r.name.as_deref(),
            Record::CatalogItem(r) => r.name.as_deref(),
            Record::Incident(r) => r.name.as_deref(),
        }
    }

    /// Returns the heading used by `Display`: the name, or the e-mail
    /// address for a user without one.
    fn heading(&self) -> Option<&str> {
        match self {
            Record::User(user) => user.display_name(),
            _ => self.name().filter(|name| !name.is_empty()),
        }
    }

    /// Returns the hardware variant, if this is one.
    pub fn as_hardware(&self) -> Option<&Hardware> {
        match self {
            Record::Hardware(hw) => Some(hw),
            _ => None,
        }
    }

    /// Returns the sparse JSON form of the record.
    pub fn dump(&self) -> Result<Value, SamanageError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Returns the sparse JSON form of the record as a string.
    pub fn to_json(&self) -> Result<String, SamanageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Wraps the sparse JSON form under the singular key for `resource_type`,
    /// e.g. `{"hardware": {...}}`, ready to send as a write body.
    pub fn to_payload(&self, resource_type: ResourceType) -> Result<Value, SamanageError> {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(resource_type.singular().to_string(), self.dump()?);
        Ok(Value::Object(wrapper))
    }
}

impl fmt::Display for Record {
    /// Writes the heading (or `#id`) followed by one `key: value` line per
    /// non-empty field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.heading(), self.id()) {
            (Some(heading), _) => write!(f, "{}", heading)?,
            (None, Some(id)) => write!(f, "#{}", id)?,
            (None, None) => write!(f, "(unnamed)")?,
        }

        if let Ok(Value::Object(fields)) = self.dump() {
            for (key, value) in fields.iter().filter(|(key, _)| key.as_str() != "name") {
                write!(f, "\n  {}: {}", key, display_value(value))?;
            }
        }

        Ok(())
    }
}
