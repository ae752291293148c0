//! WADL and XSD traversal.
//!
//! Both documents are walked depth first. The context a node sees (running URL, current
//! operation, current complex type) is passed by value to its children, so changes made by one
//! node are visible to its descendants but never to its siblings.
use super::DescriptionError;
use super::catalog::{DEFAULT_CONTENT_TYPE, ObjectType, Operation, Param};
use crate::observer::{self, Event, Observer};
use http::Method;
use roxmltree::{Document, Node};
use std::collections::BTreeMap;

/// The parameter type WADL assumes when a `param` does not declare one.
const DEFAULT_PARAM_TYPE: &str = "xs:string";

/// Operations and grammar references found in a WADL document.
#[derive(Debug, Default)]
pub(crate) struct ParsedDescription {
    pub base_url: Option<String>,
    pub operations: BTreeMap<String, Operation>,
    /// Grammar document URLs, resolved against the description URL, in document order.
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct Scope {
    url: Option<String>,
    operation: Option<String>,
}

struct DescriptionWalker<'a> {
    description_url: &'a str,
    observer: &'a dyn Observer,
    parsed: ParsedDescription,
}

pub(crate) fn parse_description(
    description_url: &str,
    text: &str,
    observer: &dyn Observer,
) -> Result<ParsedDescription, DescriptionError> {
    let document = Document::parse(text).map_err(|source| DescriptionError::Xml {
        document: description_url.to_string(),
        source,
    })?;

    let mut walker = DescriptionWalker {
        description_url,
        observer,
        parsed: ParsedDescription::default(),
    };
    walker.visit(document.root_element(), None, Scope::default())?;

    Ok(walker.parsed)
}

impl DescriptionWalker<'_> {
    fn visit(
        &mut self,
        node: Node<'_, '_>,
        parent: Option<Node<'_, '_>>,
        mut scope: Scope,
    ) -> Result<(), DescriptionError> {
        match node.tag_name().name() {
            "include" => {
                let href = required(node, "include", "href")?;
                self.parsed
                    .includes
                    .push(resolve_reference(self.description_url, href));
            }
            "resources" => {
                let base = required(node, "resources", "base")?;
                let base = base.strip_suffix('/').unwrap_or(base).to_string();
                self.parsed.base_url = Some(base.clone());
                scope.url = Some(base);
            }
            "resource" => {
                let path = required(node, "resource", "path")?;
                let url = scope.url.as_mut().ok_or(DescriptionError::Misplaced {
                    node: "resource",
                    expected: "resources",
                })?;
                url.push_str(path);
            }
            "method" => {
                let verb = required(node, "method", "name")?;
                let (Some(url), Some(base)) = (&scope.url, &self.parsed.base_url) else {
                    return Err(DescriptionError::Misplaced {
                        node: "method",
                        expected: "resources",
                    });
                };

                let method = parse_method(verb)?;
                let name = operation_name(base, url, verb);

                observer::notify(
                    self.observer,
                    Event::OperationDiscovered {
                        name: &name,
                        method: &method,
                        url,
                    },
                );

                let operation = Operation::new(name.clone(), method, url.clone());
                self.parsed.operations.insert(name.clone(), operation);
                scope.operation = Some(name);
            }
            "representation" => {
                let in_request = parent.is_some_and(|p| p.tag_name().name() == "request");
                if let Some(operation) = self.current_operation(&scope) {
                    apply_representation(node, in_request, operation);
                }
            }
            "param" => {
                let observer = self.observer;
                if let Some(operation) = self.current_operation(&scope) {
                    let wire_name = required(node, "param", "name")?;
                    let kind = node.attribute("type").unwrap_or(DEFAULT_PARAM_TYPE);
                    let local_name = wire_name.replace('.', "_");

                    observer::notify(
                        observer,
                        Event::ParamDiscovered {
                            operation: &operation.name,
                            local_name: &local_name,
                            wire_name,
                            kind,
                        },
                    );

                    operation.params.insert(
                        local_name,
                        Param {
                            name: wire_name.to_string(),
                            kind: kind.to_string(),
                        },
                    );
                }
            }
            _ => {}
        }

        for child in node.children().filter(Node::is_element) {
            self.visit(child, Some(node), scope.clone())?;
        }

        Ok(())
    }

    fn current_operation(&mut self, scope: &Scope) -> Option<&mut Operation> {
        scope
            .operation
            .as_ref()
            .and_then(|name| self.parsed.operations.get_mut(name))
    }
}

fn apply_representation(node: Node<'_, '_>, in_request: bool, operation: &mut Operation) {
    let media_type = node.attribute("mediaType");
    if let Some(media_type) = media_type {
        operation.content_type = media_type.to_string();
    }

    let Some(element) = node.attribute("element") else {
        return;
    };

    if media_type.unwrap_or(&operation.content_type) != DEFAULT_CONTENT_TYPE {
        return;
    }

    let element = strip_namespace(element).to_string();
    if in_request {
        operation.request_type = Some(element);
    } else {
        operation.response_type = Some(element);
    }
}

/// Parses an XSD grammar, adding every named complex type to `object_types`.
///
/// Inheritance is not resolved here: a type may extend one declared later or in another grammar.
pub(crate) fn parse_grammar(
    url: &str,
    text: &str,
    object_types: &mut BTreeMap<String, ObjectType>,
) -> Result<(), DescriptionError> {
    let document = Document::parse(text).map_err(|source| DescriptionError::Xml {
        document: url.to_string(),
        source,
    })?;

    visit_grammar(document.root_element(), None, object_types)
}

fn visit_grammar(
    node: Node<'_, '_>,
    mut current: Option<String>,
    object_types: &mut BTreeMap<String, ObjectType>,
) -> Result<(), DescriptionError> {
    let name = node.tag_name().name();

    if name == "complexType" {
        let type_name = required(node, "complexType", "name")?;
        object_types.insert(type_name.to_string(), ObjectType::new(type_name));
        current = Some(type_name.to_string());
    } else if let Some(object_type) = current.as_ref().and_then(|t| object_types.get_mut(t)) {
        match name {
            "attribute" => {
                let attribute = node
                    .attribute("name")
                    .or_else(|| node.attribute("ref").map(strip_namespace))
                    .ok_or(DescriptionError::MissingAttribute {
                        node: "attribute",
                        attribute: "name",
                    })?;
                object_type.attributes.push(attribute.to_string());
            }
            "extension" => {
                let base = required(node, "extension", "base")?;
                object_type.bases.push(strip_namespace(base).to_string());
            }
            "element" => {
                if let Some(element) = node.attribute("name") {
                    object_type.elements.push(element.to_string());
                }
            }
            _ => {}
        }
    }

    for child in node.children().filter(Node::is_element) {
        visit_grammar(child, current.clone(), object_types)?;
    }

    Ok(())
}

fn required<'a>(
    node: Node<'a, '_>,
    node_name: &'static str,
    attribute: &'static str,
) -> Result<&'a str, DescriptionError> {
    node.attribute(attribute)
        .ok_or(DescriptionError::MissingAttribute {
            node: node_name,
            attribute,
        })
}

fn parse_method(verb: &str) -> Result<Method, DescriptionError> {
    match verb.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "PATCH" => Ok(Method::PATCH),
        "HEAD" => Ok(Method::HEAD),
        "OPTIONS" => Ok(Method::OPTIONS),
        _ => Err(DescriptionError::InvalidMethod(verb.to_string())),
    }
}

/// Derives an operation name from its URL relative to the base, and its verb.
///
/// `http://host/rest/Svc/tables/features.json` + `GET` under `http://host/rest/Svc`
/// gives `tables_features_json_GET`.
pub(crate) fn operation_name(base_url: &str, url: &str, verb: &str) -> String {
    let relative = url.strip_prefix(base_url).unwrap_or(url);
    let relative = relative.strip_prefix('/').unwrap_or(relative);
    let relative = relative.strip_suffix('/').unwrap_or(relative);

    format!("{}_{}", relative.replace('/', "_"), verb).replace('.', "_")
}

/// Resolves an `include` reference against the description URL.
///
/// Relative references replace the last path segment of the description URL.
pub(crate) fn resolve_reference(description_url: &str, href: &str) -> String {
    if href.contains("://") {
        return href.to_string();
    }

    match description_url.rfind('/') {
        Some(index) => format!("{}{}", &description_url[..=index], href),
        None => href.to_string(),
    }
}

/// `tns:Feature` → `Feature`.
fn strip_namespace(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}
