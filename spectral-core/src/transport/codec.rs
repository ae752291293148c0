//! # Wire Encoders
//!
//! The dynamic client places call arguments in two places:
//!
//! * **URL query**: values are percent-encoded with every character outside the unreserved set
//!   (`A-Z a-z 0-9 - . _ ~`) escaped, so `/`, `&`, `=` and spaces never leak into the URL structure.
//! * **XML body**: [`XmlBody`] accumulates attributes and child elements for a single root element
//!   named after the operation's request type, and renders
//!   `<?xml version="1.0" ?><Root a="v"><e>v</e></Root>` with reserved characters escaped.
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes a value for use in a query string.
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Escapes the five XML reserved characters.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// A request body under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlBody {
    root: String,
    attributes: String,
    elements: String,
}

impl XmlBody {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            attributes: String::new(),
            elements: String::new(),
        }
    }

    pub fn attribute(&mut self, name: &str, value: &str) -> &mut Self {
        self.attributes
            .push_str(&format!(" {name}=\"{}\"", escape_xml(value)));
        self
    }

    pub fn element(&mut self, name: &str, value: &str) -> &mut Self {
        self.elements
            .push_str(&format!("<{name}>{}</{name}>", escape_xml(value)));
        self
    }

    /// `true` when neither an attribute nor an element was added.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.elements.is_empty()
    }

    pub fn render(&self) -> String {
        format!(
            "<?xml version=\"1.0\" ?><{root}{attributes}>{elements}</{root}>",
            root = self.root,
            attributes = self.attributes,
            elements = self.elements,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_value_encoding_escapes_reserved_characters() {
        assert_eq!(
            encode_query_value("SELECT * FROM \"/Samples/USA\""),
            "SELECT%20%2A%20FROM%20%22%2FSamples%2FUSA%22"
        );
        assert_eq!(encode_query_value("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_query_value("keep-._~"), "keep-._~");
    }

    #[test]
    fn test_body_shape() {
        let mut body = XmlBody::new("Type");
        body.attribute("x", "1").element("y", "2");

        assert_eq!(
            body.render(),
            "<?xml version=\"1.0\" ?><Type x=\"1\"><y>2</y></Type>"
        );
    }

    #[test]
    fn test_body_values_are_escaped() {
        let mut body = XmlBody::new("Filter");
        body.attribute("name", "a\"b").element("expr", "x < 5 & y > 'z'");

        assert_eq!(
            body.render(),
            "<?xml version=\"1.0\" ?><Filter name=\"a&quot;b\"><expr>x &lt; 5 &amp; y &gt; &apos;z&apos;</expr></Filter>"
        );
    }

    #[test]
    fn test_empty_body() {
        let body = XmlBody::new("Empty");
        assert!(body.is_empty());
        assert_eq!(body.render(), "<?xml version=\"1.0\" ?><Empty></Empty>");
    }
}
