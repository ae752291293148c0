use super::{FeatureCollection, FeatureQuery, QueryError};
use crate::transport::{RestClient, Transport, codec};
use futures_util::Stream;

/// The pages of a feature query.
///
/// Any page that does not hold exactly the page length (short, empty, or oversized when the server
/// ignores `pageLength`) ends the query: no further page is requested after it. Errors are
/// yielded once and end the stream as well. Advancing mutates the cursor in
/// place, so a finished stream cannot be replayed; run the query again instead.
#[derive(Debug)]
pub struct FeatureStream<T> {
    client: RestClient<T>,
    service_url: String,
    query: String,
    page_length: usize,
    paging: bool,
    next_page: usize,
    done: bool,
    features_returned: usize,
}

impl<T> FeatureStream<T>
where
    T: Transport,
{
    pub(crate) fn new(client: RestClient<T>, service_url: &str, query: FeatureQuery) -> Self {
        Self {
            client,
            service_url: service_url.to_string(),
            page_length: query.effective_page_length(),
            paging: query.paging,
            query: codec::encode_query_value(&query.query),
            next_page: 1,
            done: false,
            features_returned: 0,
        }
    }

    pub fn is_paging(&self) -> bool {
        self.paging
    }

    pub fn page_length(&self) -> usize {
        self.page_length
    }

    /// Features yielded so far.
    pub fn features_returned(&self) -> usize {
        self.features_returned
    }

    /// Advances the stream.
    ///
    /// # Returns
    ///
    /// * `Some(Ok(collection))` - The next page, or in merged mode the whole result.
    /// * `Some(Err(err))` - A page could not be fetched or decoded; the stream is now finished.
    /// * `None` - The stream is exhausted.
    pub async fn next_page(&mut self) -> Option<Result<FeatureCollection, QueryError>> {
        if self.done {
            return None;
        }

        let result = if self.paging {
            self.fetch_next().await
        } else {
            self.fetch_merged().await
        };

        match result {
            Ok(collection) if self.paging && collection.is_empty() => None,
            Ok(collection) => {
                self.features_returned += collection.len();
                Some(Ok(collection))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }

    /// Turns the cursor into a [`Stream`] of pages.
    pub fn into_stream(self) -> impl Stream<Item = Result<FeatureCollection, QueryError>> {
        futures_util::stream::unfold(self, |mut pages| async move {
            pages.next_page().await.map(|page| (page, pages))
        })
    }

    /// Fetches every remaining page and appends their features to the first one.
    async fn fetch_merged(&mut self) -> Result<FeatureCollection, QueryError> {
        let mut merged = self.fetch_next().await?;

        while !self.done {
            let page = self.fetch_next().await?;
            merged.features.extend(page.features);
        }

        Ok(merged)
    }

    /// Fetches the page under the cursor and moves the cursor forward.
    async fn fetch_next(&mut self) -> Result<FeatureCollection, QueryError> {
        let url = format!(
            "{}/tables/features.json?pageLength={}&page={}&q={}",
            self.service_url, self.page_length, self.next_page, self.query
        );

        let body = self.client.get(&url).await?;
        let page = serde_json::from_slice::<Option<FeatureCollection>>(&body)?
            .unwrap_or_default();

        // Only a full page can be followed by another one.
        self.next_page += 1;
        if page.len() != self.page_length {
            self.done = true;
        }

        Ok(page)
    }
}
