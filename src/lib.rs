//! # Samanage
//!
//! A client library and CLI for the Samanage IT service management REST API.
//!
//! It authenticates with HTTP Digest, issues GET/POST/PUT/DELETE requests
//! against the typed resource endpoints (`hardwares`, `users`,
//! `departments`, `catalog_items`, `incidents`) and maps the JSON responses
//! into lightweight [`Record`](models::Record) values.
//!
//! ## Architecture
//!
//! - [`config`] - Connection settings from flags or environment variables
//! - [`error`] - Error types with password-safe message sanitization
//! - [`models`] - Record variants and the resource-type registry
//! - [`samanage_client`] - HTTP client for the Samanage API
//! - [`cli`] - Command-line argument surface for the `samanage` binary
//!
//! ## Failed requests
//!
//! A response with a status other than 200/201 is not an `Err`: it is logged
//! at error level and returned as
//! [`ApiResponse::Failed`](samanage_client::ApiResponse::Failed). Check
//! [`ApiResponse::is_success`](samanage_client::ApiResponse::is_success).
//! There are no retries and no automatic pagination.
//!
//! ## Example
//!
//! ```ignore
//! use samanage::config::{Config, DEFAULT_BASE_URL};
//! use samanage::samanage_client::{ListParams, SamanageClient};
//!
//! async fn example() -> Result<(), samanage::error::SamanageError> {
//!     let config = Config::new("admin@example.com", "secret", DEFAULT_BASE_URL)?;
//!     let client = SamanageClient::new(&config)?;
//!
//!     let params = ListParams::new().with_per_page(10).with_filter("name", "web01");
//!     let response = client.get("hardwares", None, &params).await?;
//!     for record in response.records() {
//!         println!("{}", record);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod samanage_client;
