//! # Description Client
//!
//! Fetches a service's WADL document and every XSD grammar it includes, then builds the
//! [`Catalog`].
//!
//! **Include resolution**: the WADL is walked first; every `include` it references is resolved
//! against the WADL's own URL and fetched once. Object types from all grammars are merged before
//! inheritance is resolved, so a type may extend one declared in another grammar.
use super::{Catalog, DescriptionError, parser};
use crate::transport::{RestClient, Transport};
use std::collections::{BTreeMap, HashSet};

/// Builds catalogs from descriptions published by a server.
#[derive(Debug, Clone)]
pub struct DescriptionClient<T> {
    client: RestClient<T>,
}

impl<T> DescriptionClient<T>
where
    T: Transport,
{
    pub fn new(client: RestClient<T>) -> Self {
        Self { client }
    }

    /// Fetches the description at `url` and its grammars and parses them into a [`Catalog`].
    ///
    /// # Returns
    ///
    /// * `Ok(Catalog)` - All documents were fetched and parsed.
    /// * `Err(DescriptionError)` - A fetch failed or a document is malformed.
    pub async fn fetch_catalog(&self, url: &str) -> Result<Catalog, DescriptionError> {
        let observer = self.client.observer().clone();

        let description = self.fetch_text(url).await?;
        let parsed = parser::parse_description(url, &description, observer.as_ref())?;

        let mut object_types = BTreeMap::new();
        let mut fetched = HashSet::new();

        for include in &parsed.includes {
            if !fetched.insert(include.clone()) {
                continue;
            }

            let grammar = self.fetch_text(include).await?;
            parser::parse_grammar(include, &grammar, &mut object_types)?;
        }

        Catalog::assemble(url, parsed, object_types, observer.as_ref())
    }

    async fn fetch_text(&self, url: &str) -> Result<String, DescriptionError> {
        let bytes = self
            .client
            .get(url)
            .await
            .map_err(|source| DescriptionError::Fetch {
                url: url.to_string(),
                source,
            })?;

        String::from_utf8(bytes).map_err(|source| DescriptionError::Utf8 {
            url: url.to_string(),
            source,
        })
    }
}
