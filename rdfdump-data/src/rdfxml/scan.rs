//! Skipping leading bytes up to the RDF root element.
//!
//! The scan looks for a `<` followed by an XML name that is `RDF` or ends in
//! `:RDF`, terminated by whitespace, `>` or `/`. Start tags that are skipped
//! are read far enough to collect their `xmlns` declarations: those stay in
//! scope for the parse that follows, and a candidate whose prefix is bound to
//! a namespace other than RDF is skipped as well. Tags split across buffer
//! refills are retained until they are complete.

use std::borrow::Cow;
use std::io::{BufRead, Cursor, Read};

use log::debug;
use memchr::memchr_iter;
use quick_xml::events::BytesStart;
use rdfdump_core::{Locator, ParseError, Position, TransportError};

use super::vocab::RDF_NS;

/// Names longer than this are never a root candidate.
const MAX_NAME_BYTES: usize = 1024;
/// Start tags longer than this are skipped without reading declarations.
const MAX_TAG_BYTES: usize = 64 * 1024;

/// Input positioned at the root start tag.
pub(crate) struct Skipped<'a> {
    /// The remaining input, starting with the root's `<`.
    pub(crate) input: Box<dyn BufRead + 'a>,
    /// Bytes consumed before the root.
    pub(crate) offset: u64,
    /// `(prefix, namespace)` declarations seen on skipped start tags, in
    /// document order; the default namespace has an empty prefix.
    pub(crate) namespaces: Vec<(String, String)>,
}

enum Probe {
    /// The root starts here.
    Found,
    /// More bytes are needed to classify the tag.
    Partial,
    /// Not the root; resume searching this many bytes further on.
    Skip(usize),
}

/// Consume `input` up to the first root start tag.
///
/// Reaching end of input first yields [`ParseError::RootNotFound`] carrying
/// the number of bytes scanned.
pub(crate) fn skip_to_root<'a>(
    mut input: Box<dyn BufRead + 'a>,
    document: &Locator,
) -> Result<Skipped<'a>, ParseError> {
    let mut window: Vec<u8> = Vec::new();
    let mut skipped: u64 = 0;
    let mut namespaces = Vec::new();

    loop {
        let chunk = input.fill_buf().map_err(|source| ParseError::Io {
            locator: document.to_string(),
            source: TransportError::Read { source },
        })?;
        let at_end = chunk.is_empty();
        let read = chunk.len();
        window.extend_from_slice(chunk);
        input.consume(read);

        match find_root(&window, at_end, &mut namespaces) {
            (start, Some(Probe::Found)) => {
                let offset = skipped + start as u64;
                debug!("found RDF root element after skipping {offset} bytes");
                let head = window.split_off(start);
                return Ok(Skipped {
                    input: Box::new(Cursor::new(head).chain(input)),
                    offset,
                    namespaces,
                });
            }
            (start, _) => {
                window.drain(..start);
                skipped += start as u64;
            }
        }

        if at_end {
            return Err(ParseError::RootNotFound {
                position: Position::new(skipped + window.len() as u64),
            });
        }
    }
}

/// Search `window` for the root tag.
///
/// Returns the index of the root or of the first tag that needs more bytes,
/// or the window length when every byte has been classified.
fn find_root(
    window: &[u8],
    at_end: bool,
    namespaces: &mut Vec<(String, String)>,
) -> (usize, Option<Probe>) {
    let mut resume = 0;
    for start in memchr_iter(b'<', window) {
        if start < resume {
            continue;
        }
        let Some(candidate) = window.get(start..) else {
            break;
        };
        match probe(candidate, at_end, namespaces) {
            Probe::Found => return (start, Some(Probe::Found)),
            Probe::Partial => return (start, Some(Probe::Partial)),
            Probe::Skip(len) => resume = start + len,
        }
    }
    (window.len(), None)
}

/// Classify the tag starting at `candidate[0] == b'<'`.
fn probe(candidate: &[u8], at_end: bool, namespaces: &mut Vec<(String, String)>) -> Probe {
    let name_len = candidate
        .iter()
        .skip(1)
        .take_while(|byte| is_name_byte(**byte))
        .count();
    if name_len == 0 || name_len > MAX_NAME_BYTES {
        return Probe::Skip(1);
    }
    let Some(&terminator) = candidate.get(name_len + 1) else {
        return if at_end { Probe::Skip(1) } else { Probe::Partial };
    };
    if !(terminator.is_ascii_whitespace() || matches!(terminator, b'>' | b'/')) {
        return Probe::Skip(1);
    }
    let Some(end) = tag_end(candidate) else {
        return if at_end || candidate.len() > MAX_TAG_BYTES {
            Probe::Skip(1)
        } else {
            Probe::Partial
        };
    };

    let attributes = candidate.get(name_len + 1..end).unwrap_or_default();
    let attributes = attributes.strip_suffix(b"/").unwrap_or(attributes);
    let declared = declarations(attributes);
    let name = candidate.get(1..=name_len).unwrap_or_default();
    let is_root_name = name == b"RDF" || name.ends_with(b":RDF");
    if is_root_name && binds_rdf(name, &declared, namespaces) {
        return Probe::Found;
    }
    namespaces.extend(declared);
    Probe::Skip(name_len + 1)
}

/// Whether the candidate's prefix is bound to the RDF namespace, or is not
/// bound at all in the bytes seen so far.
fn binds_rdf(name: &[u8], own: &[(String, String)], outer: &[(String, String)]) -> bool {
    let prefix = name
        .strip_suffix(b"RDF")
        .and_then(|head| head.strip_suffix(b":"))
        .unwrap_or_default();
    let prefix = String::from_utf8_lossy(prefix);
    own.iter()
        .chain(outer.iter().rev())
        .find(|(declared, _)| *declared == prefix)
        .is_none_or(|(_, namespace)| namespace == RDF_NS)
}

/// Index of the `>` closing the tag, ignoring any inside quoted values.
fn tag_end(candidate: &[u8]) -> Option<usize> {
    let mut quote = None;
    for (index, &byte) in candidate.iter().enumerate() {
        match (quote, byte) {
            (None, b'"' | b'\'') => quote = Some(byte),
            (Some(open), _) if open == byte => quote = None,
            (None, b'>') => return Some(index),
            _ => {}
        }
    }
    None
}

/// `xmlns` declarations among a start tag's attributes.
fn declarations(attributes: &[u8]) -> Vec<(String, String)> {
    let start = BytesStart::from_content(String::from_utf8_lossy(attributes), 0);
    let mut declared = Vec::new();
    for attribute in start.attributes().with_checks(false) {
        let Ok(attribute) = attribute else {
            break;
        };
        let key = attribute.key.as_ref();
        let prefix = if key == b"xmlns" {
            Some(&b""[..])
        } else {
            key.strip_prefix(b"xmlns:")
        };
        if let Some(prefix) = prefix {
            let value = attribute.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attribute.value).into_owned(),
                Cow::into_owned,
            );
            declared.push((String::from_utf8_lossy(prefix).into_owned(), value));
        }
    }
    declared
}

const fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b':' | b'_' | b'-' | b'.') || byte >= 0x80
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Read};

    use super::*;
    use rdfdump_core::ParseErrorKind;
    use rstest::{fixture, rstest};

    #[fixture]
    fn document() -> Locator {
        Locator::parse("http://example.org/scan").expect("valid locator")
    }

    fn scan(
        text: &str,
        capacity: usize,
        document: &Locator,
    ) -> Result<(String, Skipped<'static>), ParseError> {
        let input = Box::new(BufReader::with_capacity(
            capacity,
            Cursor::new(text.to_owned()),
        ));
        let mut skipped = skip_to_root(input, document)?;
        let mut remainder = String::new();
        skipped
            .input
            .read_to_string(&mut remainder)
            .expect("read remainder");
        Ok((remainder, skipped))
    }

    #[rstest]
    #[case("<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"/>", 0)]
    #[case("Some prose <b>bold</b>\n<rdf:RDF>", 23)]
    #[case("<?xml version=\"1.0\"?>\n<RDF/>", 22)]
    #[case("<rdfs:RDFS/> <x:RDFa> <my:RDF\n>", 22)]
    fn finds_the_root_tag(document: Locator, #[case] text: &str, #[case] skipped: u64) {
        let (rest, found) = scan(text, 8 * 1024, &document).expect("root found");

        assert_eq!(found.offset, skipped);
        let expected = text.get(usize::try_from(skipped).expect("small offset")..);
        assert_eq!(Some(rest.as_str()), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(7)]
    fn finds_tags_split_across_refills(document: Locator, #[case] capacity: usize) {
        let text = "lead-in <p>text</p> <web:RDF about=\"\">";

        let (rest, found) = scan(text, capacity, &document).expect("root found");

        assert_eq!(found.offset, 20);
        assert_eq!(rest, "<web:RDF about=\"\">");
    }

    #[rstest]
    #[case(2)]
    #[case(8 * 1024)]
    fn keeps_declarations_from_skipped_tags(document: Locator, #[case] capacity: usize) {
        let text = format!(
            "<html xmlns=\"http://www.w3.org/1999/xhtml\" title='a > b' xmlns:rdf=\"{RDF_NS}\">\
             <body>\n<rdf:RDF>"
        );

        let (rest, found) = scan(&text, capacity, &document).expect("root found");

        assert_eq!(rest, "<rdf:RDF>");
        assert_eq!(
            found.namespaces,
            [
                ("".to_owned(), "http://www.w3.org/1999/xhtml".to_owned()),
                ("rdf".to_owned(), RDF_NS.to_owned()),
            ]
        );
    }

    #[rstest]
    fn skips_roots_in_other_namespaces(document: Locator) {
        let text = format!(
            "<x:RDF xmlns:x=\"http://example.org/other#\"/>\n<x:RDF xmlns:x=\"{RDF_NS}\"/>"
        );

        let (rest, found) = scan(&text, 5, &document).expect("root found");

        assert_eq!(found.offset, 45);
        assert!(rest.starts_with("<x:RDF"));
    }

    #[rstest]
    #[case("no markup at all")]
    #[case("<html><body>RDF</body></html>")]
    #[case("truncated <rdf:RDF")]
    #[case("<o:RDF xmlns:o=\"urn:other\"></o:RDF>")]
    fn reports_missing_roots(document: Locator, #[case] text: &str) {
        let Err(err) = scan(text, 4, &document) else {
            panic!("no root expected in {text:?}");
        };

        assert_eq!(err.kind(), ParseErrorKind::RootNotFound);
        assert_eq!(err.position(), Some(Position::new(text.len() as u64)));
    }
}
