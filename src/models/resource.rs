//! The resource-type registry.
//!
//! Maps each supported endpoint name to the record variant used to parse
//! its responses and to the singular key that wraps write payloads.

use std::fmt;
use std::str::FromStr;

use crate::error::SamanageError;

/// A supported Samanage endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// `hardwares`, parsed as [`Hardware`](super::Hardware).
    Hardwares,
    /// `users`, parsed as [`User`](super::User).
    Users,
    /// `departments`, parsed as [`Department`](super::Department).
    Departments,
    /// `catalog_items`, parsed as [`CatalogItem`](super::CatalogItem).
    CatalogItems,
    /// `incidents`, parsed as [`Incident`](super::Incident).
    Incidents,
}

impl ResourceType {
    /// Every registered resource type.
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Hardwares,
        ResourceType::Users,
        ResourceType::Departments,
        ResourceType::CatalogItems,
        ResourceType::Incidents,
    ];

    /// The plural endpoint name used in URI paths.
    pub fn endpoint(self) -> &'static str {
        match self {
            ResourceType::Hardwares => "hardwares",
            ResourceType::Users => "users",
            ResourceType::Departments => "departments",
            ResourceType::CatalogItems => "catalog_items",
            ResourceType::Incidents => "incidents",
        }
    }

    /// The singular key a write payload is wrapped under.
    ///
    /// Spelled out per type rather than derived by stripping a trailing "s".
    pub fn singular(self) -> &'static str {
        match self {
            ResourceType::Hardwares => "hardware",
            ResourceType::Users => "user",
            ResourceType::Departments => "department",
            ResourceType::CatalogItems => "catalog_item",
            ResourceType::Incidents => "incident",
        }
    }
}

impl FromStr for ResourceType {
    type Err = SamanageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|kind| kind.endpoint() == s)
            .ok_or_else(|| SamanageError::unsupported(s))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}
