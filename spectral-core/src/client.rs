//! # Dynamic Client
//!
//! This module turns a [`Catalog`](crate::description::Catalog) into something callable.
//!
//! A [`Connection`] binds one catalog to one set of credentials. It exposes every usable catalog
//! operation by name; there is no generated code and no per-operation type: each name resolves to
//! a [`BoundOperation`], a view over the operation's description that the single generic invoker
//! uses to place arguments and dispatch the request.
//!
//! ## Example
//!
//! ```rust,no_run
//! use spectral_core::client::{Arguments, Connection, ConnectionOptions};
//! use spectral_core::description::DescriptionClient;
//! use spectral_core::transport::{Credentials, ReqwestTransport, RestClient};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::new(ReqwestTransport::new())
//!     .with_credentials(Credentials::new("admin", "admin"));
//!
//! let catalog = DescriptionClient::new(client.clone())
//!     .fetch_catalog("http://localhost:8080/rest/Geocode?_wadl")
//!     .await?;
//!
//! let connection = Connection::new(Arc::new(catalog), client, ConnectionOptions::default());
//!
//! let response = connection
//!     .call("results_json_GET", &Arguments::new().arg("Data_AddressLine1", "1 Global View"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
mod connection;
mod types;

pub use connection::{BoundOperation, CallError, Connection};
pub use types::*;
