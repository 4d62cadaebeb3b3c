//! Hardware (asset) records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{is_blank, is_blank_value, lenient_id, lenient_scalar, lenient_string};
use crate::error::SamanageError;

/// A hardware asset as returned by the `hardwares` endpoint.
///
/// Samanage returns several fields as nested objects (department, owner,
/// status); those are kept as loose JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    /// Unique hardware ID.
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Hardware name (usually the host name).
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "is_blank")]
    pub name: Option<String>,

    /// Physical address.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub address: Option<Value>,

    /// Asset tag.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub asset_tag: Option<Value>,

    /// Hardware category.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub category: Option<Value>,

    /// Owning department.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub department: Option<Value>,

    /// Free-text description.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub description: Option<Value>,

    /// Network domain.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub domain: Option<Value>,

    /// Primary IP address.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub ip: Option<Value>,

    /// Latitude (numeric in some responses, text in others).
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub latitude: Option<Value>,

    /// Longitude (numeric in some responses, text in others).
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub longitude: Option<Value>,

    /// Network adapters.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub networks: Option<Value>,

    /// Notes.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub notes: Option<Value>,

    /// Owning user.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub owner: Option<Value>,

    /// Asset status.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub status: Option<Value>,

    /// Technical contact.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub technical_contact: Option<Value>,

    /// Last logged-in user name reported by the agent.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub username: Option<Value>,
}

impl Hardware {
    /// Returns the relative path listing incidents attached to this asset.
    ///
    /// The path has the form `hardwares/{id}-{name}/incidents.json`. Slashes
    /// and dots in the name become hyphens; anything else unsafe in a path
    /// segment is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `SamanageError::Validation` if the record has no id.
    pub fn incidents_path(&self) -> Result<String, SamanageError> {
        let id = self
            .id
            .ok_or_else(|| SamanageError::validation("hardware record has no id"))?;
        let name = self
            .name
            .as_deref()
            .unwrap_or_default()
            .replace(|c| c == '/' || c == '.', "-");

        Ok(format!(
            "hardwares/{}-{}/incidents.json",
            id,
            urlencoding::encode(&name)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hardware_deserialize() {
        let json = json!({
            "id": 1001,
            "name": "web01.example.com",
            "ip": "10.0.0.5",
            "asset_tag": "A-17",
            "latitude": 51.5,
            "department": {"id": 3, "name": "IT"},
            "owner": null,
            "cpu": "ignored"
        });
        let hw: Hardware = serde_json::from_value(json).unwrap();
        assert_eq!(hw.id, Some(1001));
        assert_eq!(hw.name.as_deref(), Some("web01.example.com"));
        assert_eq!(hw.ip, Some(json!("10.0.0.5")));
        assert_eq!(hw.latitude, Some(json!(51.5)));
        assert_eq!(hw.department, Some(json!({"id": 3, "name": "IT"})));
        assert_eq!(hw.owner, None);
    }

    #[test]
    fn test_hardware_missing_fields_default() {
        let hw: Hardware = serde_json::from_value(json!({})).unwrap();
        assert_eq!(hw, Hardware::default());
    }

    #[test]
    fn test_incidents_path_normalizes_name() {
        let hw = Hardware {
            id: Some(42),
            name: Some("web01.example.com/eth0".to_string()),
            ..Default::default()
        };
        assert_eq!(
            hw.incidents_path().unwrap(),
            "hardwares/42-web01-example-com-eth0/incidents.json"
        );
    }

    #[test]
    fn test_incidents_path_encodes_spaces() {
        let hw = Hardware {
            id: Some(7),
            name: Some("Front desk PC".to_string()),
            ..Default::default()
        };
        assert_eq!(
            hw.incidents_path().unwrap(),
            "hardwares/7-Front%20desk%20PC/incidents.json"
        );
    }

    #[test]
    fn test_incidents_path_requires_id() {
        let hw = Hardware {
            name: Some("orphan".to_string()),
            ..Default::default()
        };
        assert!(hw.incidents_path().is_err());
    }
}
