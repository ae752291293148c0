//! # Service Descriptions
//!
//! This module contains everything needed to learn a service's API at runtime.
//!
//! A Spectrum service publishes a WADL document (`...?_wadl`) declaring its resources, methods and
//! parameters. The WADL includes XSD grammar documents declaring the object types used as request
//! and response payloads. Parsing both yields a [`Catalog`]:
//!
//! * **Operations**, keyed by a name derived from the resource path and the HTTP verb
//!   (`/tables/features.json` + `GET` → `tables_features_json_GET`).
//! * **Object types**, keyed by their XSD name, with the attributes inherited through
//!   `xs:extension` flattened into each type.
//!
//! The [`DescriptionClient`] fetches the documents from a server; [`Catalog::from_documents`] builds
//! the same catalog from documents already in memory.
pub mod catalog;
pub mod client;
mod parser;

pub use catalog::{Catalog, ObjectType, Operation, Param};
pub use client::DescriptionClient;

use crate::transport::TransportError;

/// Errors that can occur while turning description documents into a [`Catalog`].
#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("Malformed XML in '{document}': {source}")]
    Xml {
        document: String,
        #[source]
        source: roxmltree::Error,
    },
    #[error("Malformed description: <{node}> is missing its mandatory '{attribute}' attribute")]
    MissingAttribute {
        node: &'static str,
        attribute: &'static str,
    },
    #[error("Malformed description: <{node}> found outside of <{expected}>")]
    Misplaced {
        node: &'static str,
        expected: &'static str,
    },
    #[error("Malformed description: unsupported HTTP method '{0}'")]
    InvalidMethod(String),
    #[error("Grammar document '{0}' was not provided")]
    MissingGrammar(String),
    #[error("Object type inheritance cycle: {}", path.join(" -> "))]
    InheritanceCycle { type_name: String, path: Vec<String> },
    #[error("Failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: TransportError,
    },
    #[error("Document '{url}' is not valid UTF-8")]
    Utf8 {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}
