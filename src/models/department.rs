//! Department records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{is_blank, is_blank_value, lenient_id, lenient_scalar, lenient_string};

/// A department as returned by the `departments` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    /// Unique department ID.
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Department name.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "is_blank")]
    pub name: Option<String>,

    /// Free-text description.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub description: Option<Value>,

    /// ID of the user new incidents are assigned to by default.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub default_assignee_id: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_department_deserialize() {
        let dept: Department = serde_json::from_value(json!({
            "id": "12",
            "name": "Finance",
            "default_assignee_id": 99
        }))
        .unwrap();
        assert_eq!(dept.id, Some(12));
        assert_eq!(dept.name.as_deref(), Some("Finance"));
        assert_eq!(dept.description, None);
        assert_eq!(dept.default_assignee_id, Some(json!(99)));
    }
}
