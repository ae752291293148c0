//! # Observer
//!
//! The library never prints on its own. Everything worth telling the user (operations found while
//! parsing, arguments that were dropped, operations that had to be skipped, request summaries) is
//! turned into an [`Event`] and handed to the [`Observer`] the caller injected.
//!
//! Each event carries a [`Verbosity`] level and is only delivered when the observer's configured
//! verbosity is at least that level.
use http::Method;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// How much an observer wants to hear about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Nothing at all.
    Quiet,
    /// Dropped arguments, skipped operations and failed requests.
    #[default]
    Warnings,
    /// Request summaries.
    Info,
    /// Everything, including each operation and parameter found while parsing.
    Debug,
}

/// Something that happened while parsing a description or talking to a server.
#[derive(Debug, Clone)]
pub enum Event<'a> {
    OperationDiscovered {
        name: &'a str,
        method: &'a Method,
        url: &'a str,
    },
    ParamDiscovered {
        operation: &'a str,
        local_name: &'a str,
        wire_name: &'a str,
        kind: &'a str,
    },
    /// An object type extends a type the catalog does not know about.
    UnresolvedBase { type_name: &'a str, base: &'a str },
    /// An operation was left out of a connection because its description is unusable.
    OperationSkipped { name: &'a str, reason: &'a str },
    /// A service was left out of a server listing because its description could not be loaded.
    ServiceSkipped { name: &'a str, reason: &'a str },
    /// A call argument matched no parameter, attribute or element and was dropped.
    InvalidArgument {
        operation: &'a str,
        name: &'a str,
        value: &'a str,
    },
    RequestPrepared {
        method: &'a Method,
        url: &'a str,
        body: Option<&'a str>,
    },
    RequestCompleted {
        method: &'a Method,
        url: &'a str,
        bytes_sent: usize,
        bytes_received: usize,
        elapsed: Duration,
    },
    RequestFailed {
        method: &'a Method,
        url: &'a str,
        error: &'a str,
    },
}

impl Event<'_> {
    /// The lowest verbosity at which this event is delivered.
    pub fn level(&self) -> Verbosity {
        match self {
            Event::UnresolvedBase { .. }
            | Event::OperationSkipped { .. }
            | Event::ServiceSkipped { .. }
            | Event::InvalidArgument { .. }
            | Event::RequestFailed { .. } => Verbosity::Warnings,
            Event::RequestCompleted { .. } => Verbosity::Info,
            Event::OperationDiscovered { .. }
            | Event::ParamDiscovered { .. }
            | Event::RequestPrepared { .. } => Verbosity::Debug,
        }
    }
}

/// Receives [`Event`]s from parsers, connections and servers.
pub trait Observer: Send + Sync + Debug {
    /// The most detailed level this observer wants to receive.
    fn verbosity(&self) -> Verbosity;

    /// Called for each event at or below [`Observer::verbosity`].
    fn on_event(&self, event: &Event<'_>);
}

/// Shared handle to an observer, cloned into every component that reports events.
pub type SharedObserver = Arc<dyn Observer>;

/// Delivers `event` if the observer's verbosity allows it.
pub(crate) fn notify(observer: &dyn Observer, event: Event<'_>) {
    if event.level() <= observer.verbosity() {
        observer.on_event(&event);
    }
}

/// The default observer, forwarding events to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    verbosity: Verbosity,
}

impl TracingObserver {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn shared(verbosity: Verbosity) -> SharedObserver {
        Arc::new(Self::new(verbosity))
    }
}

impl Observer for TracingObserver {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn on_event(&self, event: &Event<'_>) {
        match *event {
            Event::OperationDiscovered { name, method, url } => {
                tracing::debug!(operation = name, %method, url, "discovered operation");
            }
            Event::ParamDiscovered {
                operation,
                local_name,
                wire_name,
                kind,
            } => {
                tracing::debug!(operation, local_name, wire_name, kind, "discovered parameter");
            }
            Event::UnresolvedBase { type_name, base } => {
                tracing::warn!(type_name, base, "object type extends an unknown base type");
            }
            Event::OperationSkipped { name, reason } => {
                tracing::warn!(operation = name, reason, "skipping operation");
            }
            Event::ServiceSkipped { name, reason } => {
                tracing::warn!(service = name, reason, "skipping service");
            }
            Event::InvalidArgument {
                operation,
                name,
                value,
            } => {
                tracing::warn!(operation, argument = name, value, "invalid API argument");
            }
            Event::RequestPrepared { method, url, body } => {
                tracing::debug!(%method, url, body = body.unwrap_or_default(), "sending request");
            }
            Event::RequestCompleted {
                method,
                url,
                bytes_sent,
                bytes_received,
                elapsed,
            } => {
                tracing::info!(
                    %method,
                    url,
                    bytes_sent,
                    bytes_received,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request completed"
                );
            }
            Event::RequestFailed { method, url, error } => {
                tracing::warn!(%method, url, error, "REST API error");
            }
        }
    }
}

/// An observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn verbosity(&self) -> Verbosity {
        Verbosity::Quiet
    }

    fn on_event(&self, _event: &Event<'_>) {}
}

/// The observer used when the caller does not inject one.
pub fn default_observer() -> SharedObserver {
    TracingObserver::shared(Verbosity::default())
}
