//! Collaborators for the rdfdump parser engine.
//!
//! Responsibilities:
//! - Fetch documents from local files and HTTP servers.
//! - Recognise RDF/XML, including scanning past leading non-RDF content.
//!
//! Boundaries:
//! - The engine lifecycle, statement model and errors live in
//!   `rdfdump-core`.
//! - No statement is stored; each is handed on as soon as it is recognised.
//!
//! Invariants:
//! - No global mutable state; every run owns its reader.
#![forbid(unsafe_code)]

pub mod rdfxml;
pub mod transport;

use rdfdump_core::Parser;

pub use rdfxml::{RDF_NS, RdfXmlGrammar};
pub use transport::{ClientBuildError, FileTransport, HttpTransport, SchemeTransport};

/// An RDF/XML parser over the scheme-dispatching transport.
pub type RdfXmlParser<'s> = Parser<'s, RdfXmlGrammar, SchemeTransport>;

/// Build an unconfigured RDF/XML parser that reads local files and HTTP.
///
/// # Errors
/// Returns [`ClientBuildError`] when the HTTP client cannot be built.
pub fn rdfxml_parser<'s>() -> Result<RdfXmlParser<'s>, ClientBuildError> {
    Ok(Parser::new(RdfXmlGrammar, SchemeTransport::new()?))
}
