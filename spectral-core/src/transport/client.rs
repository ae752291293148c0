//! # REST Client
//!
//! [`RestClient`] wraps a [`Transport`] and turns it into the authenticated request/response
//! primitive used by every other module.
//!
//! ## How it works
//!
//! 1. Builds the headers: `Authorization: Basic ...` from the [`Credentials`], and when a content
//!    type is given, both `Content-Type` and `Accept` set to it.
//! 2. Hands the [`HttpRequest`] to the transport and times the round trip.
//! 3. Converts non-success statuses into [`TransportError::Status`].
//! 4. Reports the outcome to the [`Observer`](crate::observer::Observer).
use super::BoxError;
use crate::observer::{self, Event, SharedObserver};
use base64::{Engine, engine::general_purpose::STANDARD};
use http::{
    HeaderMap, HeaderValue, Method, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, InvalidHeaderValue},
};
use std::fmt::{self, Debug};
use std::future::Future;
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("Server answered '{url}' with status {status}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("Invalid header value for '{name}': {source}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: InvalidHeaderValue,
    },
}

/// A fully prepared HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// The raw answer of a [`Transport`], whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Sends a request and returns the raw response.
///
/// Implementations only move bytes: they must not interpret the status code, that is the job of
/// [`RestClient`].
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// The default [`Transport`], backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing `reqwest` client (to share its connection pool, proxies, TLS settings...).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a transport whose requests fail after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let failed = |source: reqwest::Error| TransportError::Request {
            url: request.url.clone(),
            source: source.into(),
        };

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(failed)?;
        let status = response.status();
        let body = response.bytes().await.map_err(failed)?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The `Authorization` header value: `Basic base64(username:password)`.
    pub fn authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated request execution over any [`Transport`].
#[derive(Debug, Clone)]
pub struct RestClient<T = ReqwestTransport> {
    transport: T,
    credentials: Option<Credentials>,
    observer: SharedObserver,
}

impl<T> RestClient<T>
where
    T: Transport,
{
    /// Creates an anonymous client reporting to the default observer.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            credentials: None,
            observer: observer::default_observer(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn observer(&self) -> &SharedObserver {
        &self.observer
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Executes a request and returns the response body of a successful (2xx) answer.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP verb.
    /// * `url` - The complete URL, query string included.
    /// * `content_type` - Sent as both `Content-Type` and `Accept` when present.
    /// * `body` - The request payload, if any.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        content_type: Option<&str>,
        body: Option<String>,
    ) -> Result<Vec<u8>, TransportError> {
        let headers = self.headers(content_type)?;

        observer::notify(
            self.observer.as_ref(),
            Event::RequestPrepared {
                method: &method,
                url,
                body: body.as_deref(),
            },
        );

        let bytes_sent = body.as_ref().map_or(0, String::len);
        let request = HttpRequest {
            method: method.clone(),
            url: url.to_string(),
            headers,
            body,
        };

        let started = Instant::now();
        let result = self
            .transport
            .send(request)
            .await
            .and_then(|response| check_status(url, response));

        match &result {
            Ok(body) => observer::notify(
                self.observer.as_ref(),
                Event::RequestCompleted {
                    method: &method,
                    url,
                    bytes_sent,
                    bytes_received: body.len(),
                    elapsed: started.elapsed(),
                },
            ),
            Err(err) => observer::notify(
                self.observer.as_ref(),
                Event::RequestFailed {
                    method: &method,
                    url,
                    error: &err.to_string(),
                },
            ),
        }

        result
    }

    /// Authenticated `GET` without content negotiation headers.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.execute(Method::GET, url, None, None).await
    }

    fn headers(&self, content_type: Option<&str>) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();

        if let Some(credentials) = &self.credentials {
            let value = HeaderValue::from_str(&credentials.authorization()).map_err(|source| {
                TransportError::InvalidHeader {
                    name: "authorization",
                    source,
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(content_type) = content_type {
            let value = HeaderValue::from_str(content_type).map_err(|source| {
                TransportError::InvalidHeader {
                    name: "content-type",
                    source,
                }
            })?;
            headers.insert(CONTENT_TYPE, value.clone());
            headers.insert(ACCEPT, value);
        }

        Ok(headers)
    }
}

fn check_status(url: &str, response: HttpResponse) -> Result<Vec<u8>, TransportError> {
    if response.status.is_success() {
        Ok(response.body)
    } else {
        Err(TransportError::Status {
            url: url.to_string(),
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }
}
