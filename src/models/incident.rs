//! Incident (ticket) records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{is_blank, is_blank_value, lenient_id, lenient_scalar, lenient_string};

/// An incident as returned by the `incidents` endpoint, either top-level
/// or nested under a hardware asset.
///
/// People and taxonomy fields (assignee, requester, category, site,
/// department) arrive as nested objects and are kept as loose JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Unique incident ID.
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Incident title.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "is_blank")]
    pub name: Option<String>,

    /// Human-facing ticket number (distinct from `id`).
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub number: Option<Value>,

    /// Workflow state (e.g. "New", "Assigned", "Resolved").
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub state: Option<Value>,

    /// Priority label.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub priority: Option<Value>,

    /// Description body (may contain HTML).
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub description: Option<Value>,

    /// Incident category.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub category: Option<Value>,

    /// Incident subcategory.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub subcategory: Option<Value>,

    /// Assigned user or group.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub assignee: Option<Value>,

    /// User who reported the incident.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub requester: Option<Value>,

    /// Site the incident belongs to.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub site: Option<Value>,

    /// Department the incident belongs to.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub department: Option<Value>,

    /// Due date.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub due_at: Option<Value>,

    /// Creation timestamp.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub created_at: Option<Value>,

    /// Last update timestamp.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub updated_at: Option<Value>,
}

impl Incident {
    /// Returns true if the incident is in a closed or resolved state.
    pub fn is_closed(&self) -> bool {
        matches!(
            self.state.as_ref().and_then(Value::as_str),
            Some("Closed") | Some("Resolved")
        )
    }
}
