use super::types::{TableMetadata, TableNames};
use super::{ColumnMetadata, FeatureCollection, FeatureQuery, FeatureStream, QueryError};
use crate::transport::{RestClient, Transport};

/// Path of the feature service below a server's root URL.
pub const FEATURE_SERVICE_PATH: &str = "rest/Spatial/FeatureService";

/// Client of a server's Spatial feature service.
#[derive(Debug, Clone)]
pub struct FeatureService<T> {
    client: RestClient<T>,
    service_url: String,
}

impl<T> FeatureService<T>
where
    T: Transport + Clone,
{
    /// Creates the feature service client of the server at `server_url` (trailing `/` expected).
    pub fn new(client: RestClient<T>, server_url: &str) -> Self {
        Self {
            client,
            service_url: format!("{server_url}{FEATURE_SERVICE_PATH}"),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Runs `query` with the given page length.
    ///
    /// A page length of `0` fetches the whole result (in pages of
    /// [`DEFAULT_PAGE_LENGTH`](super::DEFAULT_PAGE_LENGTH)) and yields it merged; any other length
    /// yields one page per advance.
    pub fn query(&self, query: &str, page_length: usize) -> FeatureStream<T> {
        self.stream(FeatureQuery::new(query).page_length(page_length))
    }

    pub fn stream(&self, query: FeatureQuery) -> FeatureStream<T> {
        FeatureStream::new(self.client.clone(), &self.service_url, query)
    }

    /// Runs `query` and returns every feature in one collection.
    pub async fn query_all(&self, query: &str) -> Result<FeatureCollection, QueryError> {
        let mut stream = self.stream(FeatureQuery::new(query));
        stream.next_page().await.unwrap_or_else(|| Ok(FeatureCollection::default()))
    }

    /// Names of every table the feature service exposes.
    pub async fn list_tables(&self) -> Result<Vec<String>, QueryError> {
        let url = format!("{}/listTableNames.json", self.service_url);
        let body = self.client.get(&url).await?;
        let names: TableNames = serde_json::from_slice(&body)?;
        Ok(names.response.table)
    }

    /// Column metadata of `table` (a named resource path such as `/Samples/NamedTables/WorldTable`).
    pub async fn describe_table(&self, table: &str) -> Result<Vec<ColumnMetadata>, QueryError> {
        let url = format!("{}/tables{table}/metadata.json", self.service_url);
        let body = self.client.get(&url).await?;
        let metadata: TableMetadata = serde_json::from_slice(&body)?;
        Ok(metadata.metadata)
    }
}
