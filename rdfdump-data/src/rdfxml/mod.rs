//! RDF/XML format grammar.
//!
//! Built on `quick-xml`'s namespace-aware pull reader. The grammar covers
//! node and property elements, property attributes, `rdf:parseType`
//! (`Resource`, `Literal`, `Collection`), container membership through
//! `rdf:li`, reification through `rdf:ID` on property elements, and
//! `xml:base`/`xml:lang` scoping. Parsing ends when the root element closes;
//! anything after it is never read.

mod reader;
mod scan;
mod vocab;

use std::io::BufRead;

use rdfdump_core::{Feature, Grammar, GrammarContext, ParseError, StatementReader};

use self::reader::RdfXmlReader;
pub use self::vocab::RDF_NS;

/// The RDF/XML [`Grammar`].
///
/// # Examples
/// ```
/// use rdfdump_core::{CollectingSink, FeatureSet, Locator, MemoryTransport, Parser};
/// use rdfdump_data::RdfXmlGrammar;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let document = Locator::parse("http://example.org/people")?;
/// let transport = MemoryTransport::new().with_document(
///     &document,
///     r##"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
///                 xmlns:foaf="http://xmlns.com/foaf/0.1/">
///          <foaf:Person rdf:about="#alice" foaf:name="Alice"/>
///        </rdf:RDF>"##,
/// );
/// let mut sink = CollectingSink::new();
/// let mut parser = Parser::new(RdfXmlGrammar, transport);
/// parser.configure(FeatureSet::default(), &mut sink)?;
/// let report = parser.run(&document, None)?;
/// assert_eq!(report.delivered, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RdfXmlGrammar;

impl Grammar for RdfXmlGrammar {
    fn name(&self) -> &'static str {
        "rdfxml"
    }

    fn reader<'a>(
        &self,
        input: Box<dyn BufRead + 'a>,
        context: &GrammarContext<'_>,
    ) -> Result<Box<dyn StatementReader + 'a>, ParseError> {
        if context.features.get(Feature::Scanning) {
            let skipped = scan::skip_to_root(input, context.document)?;
            return Ok(Box::new(RdfXmlReader::new(
                skipped.input,
                context,
                skipped.offset,
                skipped.namespaces,
            )?));
        }
        Ok(Box::new(RdfXmlReader::new(input, context, 0, Vec::new())?))
    }
}
