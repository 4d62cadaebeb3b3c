//! User (requester/agent account) records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{is_blank, is_blank_value, lenient_id, lenient_scalar, lenient_string};

/// A user account as returned by the `users` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Display name.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "is_blank")]
    pub name: Option<String>,

    /// Login e-mail address.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub email: Option<Value>,

    /// Job title.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub title: Option<Value>,

    /// Office phone.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub phone: Option<Value>,

    /// Mobile phone.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub mobile_phone: Option<Value>,

    /// Department (nested object with id/name).
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub department: Option<Value>,

    /// Role (nested object with id/name).
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub role: Option<Value>,

    /// Site (nested object with id/name).
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub site: Option<Value>,

    /// Whether the account is disabled, as reported by the API.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub disabled: Option<Value>,

    /// Timestamp of the last login.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub last_login: Option<Value>,
}

impl User {
    /// Returns the display name, falling back to the e-mail address.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.email.as_ref().and_then(Value::as_str))
    }
}
