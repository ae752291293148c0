//! # Server
//!
//! A [`Server`] is a Spectrum installation reachable at a root URL with one set of credentials.
//!
//! Its REST listing (`<root>rest`) is an HTML page linking to the WADL of every deployed service
//! (`<root>rest/<Service>?_wadl`). [`Server::list_services`] scans that page; [`Server::service`]
//! turns any listed service into a ready [`Connection`].
use crate::client::{Arguments, CallError, Connection, ConnectionOptions, OperationResponse};
use crate::description::{DescriptionClient, DescriptionError};
use crate::observer::{self, Event, SharedObserver};
use crate::query::FeatureService;
use crate::transport::{Credentials, ReqwestTransport, RestClient, Transport, TransportError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The operation a deployed Spectrum flow exposes for JSON invocations.
pub const DEFAULT_SERVICE_OPERATION: &str = "results_json_GET";

const WADL_SUFFIX: &str = "?_wadl";

/// Errors that can occur when working with a server's services.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Transport error: '{0}'")]
    Transport(#[from] TransportError),
    #[error("Service description error: '{0}'")]
    Description(#[from] DescriptionError),
    #[error("Service call failed: '{0}'")]
    Call(#[from] CallError),
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),
    #[error("Service '{service}' answered with an error: {message}")]
    ServiceFailed { service: String, message: String },
    #[error("Response is not valid UTF-8: '{0}'")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A Spectrum server and the credentials used for every request sent to it.
#[derive(Debug, Clone)]
pub struct Server<T = ReqwestTransport> {
    url: String,
    client: RestClient<T>,
    options: ConnectionOptions,
}

impl Server<ReqwestTransport> {
    /// Creates a server using the default `reqwest` transport.
    pub fn connect(url: &str, credentials: Credentials) -> Self {
        Self::new(url, credentials, ReqwestTransport::new())
    }
}

impl<T> Server<T>
where
    T: Transport + Clone,
{
    /// # Arguments
    ///
    /// * `url` - The server root (e.g. `http://localhost:8080/`); a trailing `/` is added if missing.
    /// * `credentials` - Basic credentials sent with every request.
    /// * `transport` - How requests reach the server.
    pub fn new(url: &str, credentials: Credentials, transport: T) -> Self {
        let url = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        };

        Self {
            url,
            client: RestClient::new(transport).with_credentials(credentials),
            options: ConnectionOptions::default(),
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.client = self.client.with_observer(observer);
        self
    }

    /// Options applied to every [`Connection`] this server creates.
    pub fn with_options(mut self, options: ConnectionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn client(&self) -> &RestClient<T> {
        &self.client
    }

    /// Authenticated `GET` of a path relative to the server root.
    pub async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.client.get(&format!("{}{path}", self.url)).await
    }

    /// Lists the deployed REST services.
    ///
    /// # Returns
    ///
    /// Service names mapped to the URL of their WADL description.
    pub async fn list_services(&self) -> Result<BTreeMap<String, String>, ServerError> {
        let listing = String::from_utf8(self.get("rest").await?)?;
        Ok(scan_service_links(&listing, &format!("{}rest/", self.url)))
    }

    /// Fetches a service's description and binds it to this server's credentials.
    pub async fn service(&self, name: &str) -> Result<Connection<T>, ServerError> {
        let url = self
            .list_services()
            .await?
            .remove(name)
            .ok_or_else(|| ServerError::ServiceNotFound(name.to_string()))?;

        self.connection_for(&url).await
    }

    /// Builds a [`Connection`] from the WADL at `description_url`.
    pub async fn connection_for(
        &self,
        description_url: &str,
    ) -> Result<Connection<T>, ServerError> {
        let catalog = DescriptionClient::new(self.client.clone())
            .fetch_catalog(description_url)
            .await?;

        Ok(Connection::new(
            Arc::new(catalog),
            self.client.clone(),
            self.options,
        ))
    }

    /// Connections for every listed service.
    ///
    /// Services whose description cannot be fetched or parsed are left out and reported as
    /// [`Event::ServiceSkipped`].
    pub async fn services(&self) -> Result<BTreeMap<String, Connection<T>>, ServerError> {
        let mut connections = BTreeMap::new();

        for (name, url) in self.list_services().await? {
            match self.connection_for(&url).await {
                Ok(connection) => {
                    connections.insert(name, connection);
                }
                Err(err) => observer::notify(
                    self.client.observer().as_ref(),
                    Event::ServiceSkipped {
                        name: &name,
                        reason: &err.to_string(),
                    },
                ),
            }
        }

        Ok(connections)
    }

    /// Invokes a service through its [`DEFAULT_SERVICE_OPERATION`] and returns the response text.
    pub async fn call_service(&self, name: &str, args: &Arguments) -> Result<String, ServerError> {
        let connection = self.service(name).await?;

        match connection.call(DEFAULT_SERVICE_OPERATION, args).await? {
            OperationResponse::Body(body) => Ok(String::from_utf8(body)?),
            OperationResponse::Error(message) => Err(ServerError::ServiceFailed {
                service: name.to_string(),
                message,
            }),
        }
    }

    /// The Spatial feature service of this server.
    pub fn feature_service(&self) -> FeatureService<T> {
        FeatureService::new(self.client.clone(), &self.url)
    }
}

/// Extracts `name → WADL url` from the text of every anchor ending in `?_wadl`.
fn scan_service_links(listing: &str, rest_root: &str) -> BTreeMap<String, String> {
    let lowered = listing.to_ascii_lowercase();
    let mut services = BTreeMap::new();
    let mut cursor = 0;

    while let Some(found) = lowered[cursor..].find("<a") {
        let tag_start = cursor + found + 2;
        cursor = tag_start;

        // Skip <abbr>, <area>...
        if !lowered[tag_start..].starts_with(['>', ' ', '\t', '\r', '\n']) {
            continue;
        }

        let Some(tag_end) = lowered[tag_start..].find('>') else {
            break;
        };
        let text_start = tag_start + tag_end + 1;
        let text_end = lowered[text_start..]
            .find('<')
            .map_or(listing.len(), |end| text_start + end);
        cursor = text_end;

        let text = listing[text_start..text_end].trim();
        if let Some(without_suffix) = text.strip_suffix(WADL_SUFFIX) {
            let name = without_suffix.replace(rest_root, "");
            services.insert(name, text.to_string());
        }
    }

    services
}
