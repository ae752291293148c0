//! # Spectral Core
//!
//! `spectral-core` is the foundational library powering the Spectral CLI. It provides a dynamic
//! REST client for Spectrum-style geospatial services, capable of calling any operation a server
//! publishes without compile-time knowledge of its API.
//!
//! ## Key Components
//!
//! * **[`description::Catalog`]:** The parsed form of a service's WADL description and the XSD grammars
//!   it includes. It maps object type names to their (inherited) attributes and elements, and
//!   operation names to their method, URL, parameters and payload types.
//! * **[`description::DescriptionClient`]:** Fetches a WADL document and every grammar it includes
//!   through a [`transport::Transport`] and builds the [`description::Catalog`].
//! * **[`client::Connection`]:** The per-credential operation table. Every catalog operation is
//!   addressable by name and dispatched through one generic invoker that validates and places
//!   the supplied named arguments.
//! * **[`query::FeatureService`]:** Paged feature queries returning GeoJSON-like collections as a
//!   lazy stream of pages.
//! * **[`server::Server`]:** Service discovery on a server's REST listing, raw authenticated GETs and
//!   a shortcut to every discovered service.
//!
//! ## Transport
//!
//! Networking goes through the [`transport::Transport`] trait. [`transport::ReqwestTransport`] is the default
//! implementation; tests and embedders can plug in anything that can turn an
//! [`transport::HttpRequest`] into an [`transport::HttpResponse`].
//!
//! ## Observability
//!
//! Nothing in this crate prints. Parse progress, dropped arguments, skipped operations and request
//! summaries are reported to an injected [`observer::Observer`], by default a
//! [`observer::TracingObserver`] forwarding to `tracing`.
//!
//! ## Re-exports
//!
//! This crate re-exports `http` and `reqwest` to ensure that consumers use compatible versions of
//! these underlying dependencies.
pub mod client;
pub mod description;
pub mod observer;
pub mod query;
pub mod registry;
pub mod server;
pub mod transport;

// Re-exports
pub use http;
pub use reqwest;
