use http::Method;

/// Named call arguments, kept in the order they were supplied.
///
/// The order matters: URL parameters are appended to the query string in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(Vec<(String, String)>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument, builder style.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Arguments
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Per-connection behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionOptions {
    /// Report transport failures as [`OperationResponse::Error`] instead of `Err`.
    pub return_errors_as_values: bool,
}

/// The result of a dispatched operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResponse {
    /// The raw response body.
    Body(Vec<u8>),
    /// A transport failure, described, when the connection returns errors as values.
    Error(String),
}

impl OperationResponse {
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            OperationResponse::Body(body) => Some(body),
            OperationResponse::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OperationResponse::Error(_))
    }
}

/// A request ready to be sent, as produced from an operation and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub content_type: String,
    pub body: Option<String>,
    /// Arguments that matched nothing and were left out.
    pub dropped: Vec<String>,
}
