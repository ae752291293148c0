//! # Catalog
//!
//! The queryable result of parsing a WADL description and its grammars.
use super::DescriptionError;
use super::parser::{self, ParsedDescription};
use crate::observer::{self, Event, Observer};
use http::Method;
use std::collections::{BTreeMap, HashMap};

/// The media type operations use unless their description says otherwise.
pub const DEFAULT_CONTENT_TYPE: &str = "application/xml";

/// A complex type declared in a grammar document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    /// Own attributes first, then the attributes of each base, recursively, in declared base order.
    pub attributes: Vec<String>,
    pub elements: Vec<String>,
    /// Base type names with their namespace prefix stripped.
    pub bases: Vec<String>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            elements: Vec::new(),
            bases: Vec::new(),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e == name)
    }
}

/// A URL parameter of an [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// The name sent on the wire (e.g. `q.filter`).
    pub name: String,
    /// The declared type (e.g. `xs:string`).
    pub kind: String,
}

/// A remote procedure declared by a WADL `method`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub method: Method,
    pub content_type: String,
    /// The base URL followed by every enclosing resource path.
    pub url: String,
    /// URL parameters keyed by local argument name (wire name with `.` replaced by `_`).
    pub params: BTreeMap<String, Param>,
    /// The object type serialized as the request body.
    pub request_type: Option<String>,
    /// The object type of the XML response, informative only.
    pub response_type: Option<String>,
}

impl Operation {
    pub(crate) fn new(name: String, method: Method, url: String) -> Self {
        Self {
            name,
            method,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            url,
            params: BTreeMap::new(),
            request_type: None,
            response_type: None,
        }
    }
}

/// Object types and operations of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    description_url: String,
    base_url: String,
    object_types: BTreeMap<String, ObjectType>,
    operations: BTreeMap<String, Operation>,
}

impl Catalog {
    /// Builds a catalog from documents already in memory.
    ///
    /// # Arguments
    ///
    /// * `description_url` - Where the WADL was published; includes are resolved against it.
    /// * `description` - The WADL document.
    /// * `grammars` - Grammar documents keyed by their resolved URL.
    ///
    /// # Returns
    ///
    /// * `Ok(Catalog)` - Every include was found and every document is well formed.
    /// * `Err(DescriptionError)` - Otherwise. No partial catalog is produced.
    pub fn from_documents(
        description_url: &str,
        description: &str,
        grammars: &HashMap<String, String>,
        observer: &dyn Observer,
    ) -> Result<Self, DescriptionError> {
        let parsed = parser::parse_description(description_url, description, observer)?;

        let mut object_types = BTreeMap::new();
        for include in &parsed.includes {
            let grammar = grammars
                .get(include)
                .ok_or_else(|| DescriptionError::MissingGrammar(include.clone()))?;
            parser::parse_grammar(include, grammar, &mut object_types)?;
        }

        Self::assemble(description_url, parsed, object_types, observer)
    }

    /// Resolves inheritance and freezes the catalog.
    pub(crate) fn assemble(
        description_url: &str,
        parsed: ParsedDescription,
        object_types: BTreeMap<String, ObjectType>,
        observer: &dyn Observer,
    ) -> Result<Self, DescriptionError> {
        let object_types = resolve_inheritance(object_types, observer)?;

        Ok(Self {
            description_url: description_url.to_string(),
            base_url: parsed.base_url.unwrap_or_default(),
            object_types,
            operations: parsed.operations,
        })
    }

    pub fn description_url(&self) -> &str {
        &self.description_url
    }

    /// The `resources` base URL, trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.object_types.get(name)
    }

    pub fn object_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.object_types.values()
    }

    /// The object type an operation serializes as its body, if it declares one and it is known.
    pub fn request_type_of(&self, operation: &Operation) -> Option<&ObjectType> {
        operation
            .request_type
            .as_deref()
            .and_then(|name| self.object_type(name))
    }
}

/// Appends to every type the attributes it inherits from its bases.
///
/// Inherited attributes are collected from the bases' own declarations, so the result does not
/// depend on the order in which types are visited.
fn resolve_inheritance(
    object_types: BTreeMap<String, ObjectType>,
    observer: &dyn Observer,
) -> Result<BTreeMap<String, ObjectType>, DescriptionError> {
    let mut resolved = object_types.clone();

    for (name, object_type) in &object_types {
        let mut path = vec![name.clone()];
        let mut inherited = Vec::new();

        for base in &object_type.bases {
            collect_attributes(&object_types, name, base, &mut path, &mut inherited, observer)?;
        }

        if let Some(target) = resolved.get_mut(name) {
            target.attributes.extend(inherited);
        }
    }

    Ok(resolved)
}

fn collect_attributes(
    object_types: &BTreeMap<String, ObjectType>,
    referrer: &str,
    name: &str,
    path: &mut Vec<String>,
    out: &mut Vec<String>,
    observer: &dyn Observer,
) -> Result<(), DescriptionError> {
    if path.iter().any(|seen| seen == name) {
        let mut cycle = path.clone();
        cycle.push(name.to_string());
        return Err(DescriptionError::InheritanceCycle {
            type_name: path[0].clone(),
            path: cycle,
        });
    }

    let Some(object_type) = object_types.get(name) else {
        observer::notify(
            observer,
            Event::UnresolvedBase {
                type_name: referrer,
                base: name,
            },
        );
        return Ok(());
    };

    out.extend(object_type.attributes.iter().cloned());

    path.push(name.to_string());
    for base in &object_type.bases {
        collect_attributes(object_types, name, base, path, out, observer)?;
    }
    path.pop();

    Ok(())
}
