//! # Generic REST Transport
//!
//! This module contains the low-level building blocks for talking to a Spectrum server.
//!
//! The [`Transport`] trait is the only place where bytes leave the process: it takes a fully
//! prepared [`HttpRequest`] and returns the raw [`HttpResponse`]. Everything above it (basic
//! authentication, content negotiation headers, status handling, request accounting) lives in
//! [`RestClient`], so any transport implementation gets identical behaviour.
//!
//! [`codec`] holds the two encoders the dynamic client needs on the wire: query value
//! percent-encoding and the XML request body.
pub mod client;
pub mod codec;

pub use client::{
    Credentials, HttpRequest, HttpResponse, ReqwestTransport, RestClient, Transport,
    TransportError,
};

/// Type alias for the standard boxed error used in transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
