//! Documents and runners shared by the CLI tests.

use super::*;
use rdfdump_core::MemoryTransport;

pub(super) const DOCUMENT_URI: &str = "http://example.org/people.rdf";

pub(super) const TWO_STATEMENTS: &str = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dc="http://purl.org/dc/elements/1.1/">
  <rdf:Description rdf:about="http://example.org/book">
    <dc:title>Two
lines</dc:title>
    <dc:creator rdf:resource="http://example.org/alice"/>
  </rdf:Description>
</rdf:RDF>"#;

pub(super) const BROKEN_AFTER_ONE: &str = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dc="http://purl.org/dc/elements/1.1/">
  <rdf:Description rdf:about="http://example.org/book">
    <dc:title>Title</dc:title>
    <dc:creator>Alice</dc:author>
  </rdf:Description>
</rdf:RDF>"#;

pub(super) fn document_locator() -> Locator {
    match Locator::parse(DOCUMENT_URI) {
        Ok(locator) => locator,
        Err(err) => panic!("fixture locator must parse: {err}"),
    }
}

pub(super) fn config() -> DumpConfig {
    DumpConfig {
        source: document_locator(),
        base: None,
        scan: false,
        newlines: NewlinePolicy::Keep,
        quiet: false,
    }
}

/// Run `execute` over an in-memory document and capture stdout.
pub(super) fn dump(config: &DumpConfig, body: &str) -> (Result<u64, CliError>, String) {
    let transport = MemoryTransport::new().with_document(&config.source, body);
    let mut out = Vec::new();
    let result = execute(config, transport, &mut out);
    let text = match String::from_utf8(out) {
        Ok(text) => text,
        Err(err) => panic!("output must be UTF-8: {err}"),
    };
    (result, text)
}
