//! # Connection
//!
//! The per-credential operation table and its generic invoker.
use super::{Arguments, ConnectionOptions, OperationResponse, PreparedRequest};
use crate::description::{Catalog, ObjectType, Operation};
use crate::observer::{self, Event};
use crate::transport::{RestClient, Transport, TransportError, codec};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Errors that can occur when calling an operation.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("Operation '{0}' not found")]
    OperationNotFound(String),
    #[error("Transport error: '{0}'")]
    Transport(#[from] TransportError),
}

/// A catalog bound to credentials: every usable operation, callable by name.
#[derive(Debug, Clone)]
pub struct Connection<T> {
    catalog: Arc<Catalog>,
    client: RestClient<T>,
    options: ConnectionOptions,
    operations: BTreeSet<String>,
}

impl<T> Connection<T>
where
    T: Transport,
{
    /// Builds the operation table.
    ///
    /// Operations whose description cannot be honoured (their request body type is not declared
    /// by any grammar) are left out and reported as [`Event::OperationSkipped`]; the rest of the
    /// catalog stays usable.
    pub fn new(catalog: Arc<Catalog>, client: RestClient<T>, options: ConnectionOptions) -> Self {
        let mut operations = BTreeSet::new();

        for operation in catalog.operations() {
            match check_operation(&catalog, operation) {
                Ok(()) => {
                    operations.insert(operation.name.clone());
                }
                Err(reason) => observer::notify(
                    client.observer().as_ref(),
                    Event::OperationSkipped {
                        name: &operation.name,
                        reason: &reason,
                    },
                ),
            }
        }

        Self {
            catalog,
            client,
            options,
            operations,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn options(&self) -> ConnectionOptions {
        self.options
    }

    /// Names of every callable operation, sorted.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(String::as_str)
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains(name)
    }

    /// Looks up an operation by name.
    pub fn operation(&self, name: &str) -> Option<BoundOperation<'_, T>> {
        if !self.operations.contains(name) {
            return None;
        }

        let operation = self.catalog.operation(name)?;
        Some(BoundOperation {
            connection: self,
            operation,
            request_type: self.catalog.request_type_of(operation),
        })
    }

    /// Calls the operation named `name` with `args`.
    pub async fn call(
        &self,
        name: &str,
        args: &Arguments,
    ) -> Result<OperationResponse, CallError> {
        let operation = self
            .operation(name)
            .ok_or_else(|| CallError::OperationNotFound(name.to_string()))?;

        operation.call(args).await
    }
}

/// One operation of a [`Connection`], ready to be invoked.
#[derive(Debug)]
pub struct BoundOperation<'a, T> {
    connection: &'a Connection<T>,
    operation: &'a Operation,
    request_type: Option<&'a ObjectType>,
}

impl<'a, T> BoundOperation<'a, T>
where
    T: Transport,
{
    pub fn name(&self) -> &'a str {
        &self.operation.name
    }

    /// The operation as described by the catalog.
    pub fn description(&self) -> &'a Operation {
        self.operation
    }

    /// The object type serialized as the request body, if any.
    pub fn request_type(&self) -> Option<&'a ObjectType> {
        self.request_type
    }

    /// Places every argument and builds the request without sending it.
    ///
    /// Each argument goes to the first place that accepts its name:
    ///
    /// 1. a declared URL parameter: percent-encoded into the query string under its wire name;
    /// 2. an attribute of the request type: an attribute of the body's root element;
    /// 3. an element of the request type: a child element of the body's root element.
    ///
    /// Anything else is reported as [`Event::InvalidArgument`] and dropped.
    pub fn prepare(&self, args: &Arguments) -> PreparedRequest {
        let operation = self.operation;
        let observer = self.connection.client.observer();

        let mut url = operation.url.clone();
        let mut first_param = true;
        let mut body = self
            .request_type
            .map(|object_type| codec::XmlBody::new(&object_type.name));
        let mut dropped = Vec::new();

        for (name, value) in args.iter() {
            if let Some(param) = operation.params.get(name) {
                url.push(if first_param { '?' } else { '&' });
                url.push_str(&param.name);
                url.push('=');
                url.push_str(&codec::encode_query_value(value));
                first_param = false;
                continue;
            }

            if let (Some(object_type), Some(body)) = (self.request_type, body.as_mut()) {
                if object_type.has_attribute(name) {
                    body.attribute(name, value);
                    continue;
                }
                if object_type.has_element(name) {
                    body.element(name, value);
                    continue;
                }
            }

            observer::notify(
                observer.as_ref(),
                Event::InvalidArgument {
                    operation: &operation.name,
                    name,
                    value,
                },
            );
            dropped.push(name.to_string());
        }

        PreparedRequest {
            method: operation.method.clone(),
            url,
            content_type: operation.content_type.clone(),
            body: body.filter(|b| !b.is_empty()).map(|b| b.render()),
            dropped,
        }
    }

    /// Prepares and sends the request.
    ///
    /// # Returns
    ///
    /// * `Ok(OperationResponse::Body)` - The response body of a successful call.
    /// * `Ok(OperationResponse::Error)` - The call failed and the connection returns errors as values.
    /// * `Err(CallError::Transport)` - The call failed.
    pub async fn call(&self, args: &Arguments) -> Result<OperationResponse, CallError> {
        let request = self.prepare(args);

        let result = self
            .connection
            .client
            .execute(
                request.method,
                &request.url,
                Some(&request.content_type),
                request.body,
            )
            .await;

        match result {
            Ok(body) => Ok(OperationResponse::Body(body)),
            Err(err) if self.connection.options.return_errors_as_values => {
                Ok(OperationResponse::Error(format!("{err} - ERROR!")))
            }
            Err(err) => Err(CallError::Transport(err)),
        }
    }
}

fn check_operation(catalog: &Catalog, operation: &Operation) -> Result<(), String> {
    match operation.request_type.as_deref() {
        Some(name) if catalog.object_type(name).is_none() => Err(format!(
            "request type '{name}' is not declared by any grammar"
        )),
        _ => Ok(()),
    }
}
