//! # Feature Queries
//!
//! Spectrum Spatial's feature service answers SQL-like queries with GeoJSON-like feature
//! collections, optionally one page at a time.
//!
//! [`FeatureService::query`] returns a [`FeatureStream`]: a lazy, finite, non-restartable sequence
//! of pages. In paging mode every advance yields one fetched page; otherwise the stream fetches
//! every page on its first advance and yields a single merged collection.
mod feature_service;
mod stream;
mod types;

pub use feature_service::{FEATURE_SERVICE_PATH, FeatureService};
pub use stream::FeatureStream;
pub use types::*;

use crate::transport::TransportError;

/// Errors that can occur while running a feature service request.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Transport error: '{0}'")]
    Transport(#[from] TransportError),
    #[error("Invalid JSON in feature service response: '{0}'")]
    Json(#[from] serde_json::Error),
}
