use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Features per request when a query does not set a page length.
pub const DEFAULT_PAGE_LENGTH: usize = 1000;

/// A page (or the merge of several pages) of a feature query result.
///
/// Only `features` is interpreted; every other member of the response (`type`, `Metadata`,
/// `BBox`...) is kept as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<Value>,
    #[serde(flatten)]
    pub members: Map<String, Value>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// How a feature query is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureQuery {
    pub query: String,
    /// Features per request; `0` means [`DEFAULT_PAGE_LENGTH`].
    pub page_length: usize,
    /// Yield each page instead of one merged collection.
    pub paging: bool,
}

impl FeatureQuery {
    /// A query fetched in full and merged into one collection.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page_length: 0,
            paging: false,
        }
    }

    /// Sets the page length; a non-zero length also turns paging on.
    pub fn page_length(mut self, page_length: usize) -> Self {
        self.page_length = page_length;
        self.paging = page_length > 0;
        self
    }

    /// Keeps the page length but merges every page into one collection.
    pub fn merged(mut self) -> Self {
        self.paging = false;
        self
    }

    /// The page length actually requested.
    pub fn effective_page_length(&self) -> usize {
        if self.page_length == 0 {
            DEFAULT_PAGE_LENGTH
        } else {
            self.page_length
        }
    }
}

/// `Metadata` entry of a table description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub total_digits: Option<u32>,
    #[serde(default)]
    pub fractional_digits: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableMetadata {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<ColumnMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableNames {
    #[serde(rename = "Response")]
    pub response: TableNamesResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TableNamesResponse {
    #[serde(default)]
    pub table: Vec<String>,
}
