//! Service catalog item records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{is_blank, is_blank_value, lenient_id, lenient_scalar, lenient_string};

/// A service catalog item as returned by the `catalog_items` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique catalog item ID.
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Item name shown in the catalog.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "is_blank")]
    pub name: Option<String>,

    /// Free-text description.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub description: Option<Value>,

    /// Price, as the number or string the API sent.
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub price: Option<Value>,

    /// Publication state (e.g. "Enabled").
    #[serde(default, deserialize_with = "lenient_scalar", skip_serializing_if = "is_blank_value")]
    pub state: Option<Value>,

    /// Catalog category.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub category: Option<Value>,

    /// Catalog subcategory.
    #[serde(default, skip_serializing_if = "is_blank_value")]
    pub subcategory: Option<Value>,
}
