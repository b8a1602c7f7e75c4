//! RDF syntax vocabulary used while recognising RDF/XML.

use rdfdump_core::{Locator, LocatorError};

/// The RDF syntax namespace.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Pre-built locators for the terms the grammar emits.
#[derive(Debug, Clone)]
pub(crate) struct Vocabulary {
    pub(crate) rdf_type: Locator,
    pub(crate) first: Locator,
    pub(crate) rest: Locator,
    pub(crate) nil: Locator,
    pub(crate) statement: Locator,
    pub(crate) subject: Locator,
    pub(crate) predicate: Locator,
    pub(crate) object: Locator,
    pub(crate) xml_literal: Locator,
}

impl Vocabulary {
    pub(crate) fn new() -> Result<Self, LocatorError> {
        Ok(Self {
            rdf_type: term("type")?,
            first: term("first")?,
            rest: term("rest")?,
            nil: term("nil")?,
            statement: term("Statement")?,
            subject: term("subject")?,
            predicate: term("predicate")?,
            object: term("object")?,
            xml_literal: term("XMLLiteral")?,
        })
    }
}

fn term(local: &str) -> Result<Locator, LocatorError> {
    Locator::parse(&format!("{RDF_NS}{local}"))
}

/// Container membership property `rdf:_<index>`.
pub(crate) fn member(index: u32) -> Result<Locator, LocatorError> {
    term(&format!("_{index}"))
}

/// Attributes that steer the grammar instead of becoming statements.
pub(crate) fn is_syntax_attribute(local: &str) -> bool {
    matches!(
        local,
        "about" | "ID" | "nodeID" | "resource" | "datatype" | "parseType"
    )
}

/// RDF names that may not appear as node elements.
pub(crate) fn is_forbidden_node_name(local: &str) -> bool {
    matches!(
        local,
        "RDF"
            | "ID"
            | "about"
            | "bagID"
            | "parseType"
            | "resource"
            | "nodeID"
            | "li"
            | "aboutEach"
            | "aboutEachPrefix"
            | "datatype"
    )
}

/// RDF names that may not appear as property elements.
pub(crate) fn is_forbidden_property_name(local: &str) -> bool {
    matches!(
        local,
        "Description"
            | "RDF"
            | "ID"
            | "about"
            | "bagID"
            | "parseType"
            | "resource"
            | "nodeID"
            | "aboutEach"
            | "aboutEachPrefix"
            | "datatype"
    )
}

/// RDF names that may not appear as property attributes.
pub(crate) fn is_forbidden_property_attribute(local: &str) -> bool {
    matches!(
        local,
        "Description" | "RDF" | "li" | "bagID" | "aboutEach" | "aboutEachPrefix"
    )
}
