//! Record model layer for the Samanage API.
//!
//! This module contains the generic record, the per-resource record
//! variants, and the registry mapping endpoint names to variants.

mod catalog_item;
mod common;
mod department;
mod hardware;
mod incident;
mod record;
mod resource;
mod user;

pub use catalog_item::*;
pub use department::*;
pub use hardware::*;
pub use incident::*;
pub use record::*;
pub use resource::*;
pub use user::*;
