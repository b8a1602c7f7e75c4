//! Facade crate for the rdfdump streaming RDF parser.
//!
//! This crate re-exports the parser engine and statement model from
//! `rdfdump-core` together with the RDF/XML grammar and transports from
//! `rdfdump-data`.

#![forbid(unsafe_code)]

pub use rdfdump_core::{
    CollectingSink, CountingSink, DocumentStream, EngineState, Feature, FeatureSet, Flow, Grammar,
    GrammarContext, Literal, LiteralBuf, Locator, LocatorError, MemoryTransport, Object, ObjectBuf,
    ObjectKind, ParseError, ParseErrorKind, Parser, Position, RunReport, StateError, Statement,
    StatementBuf, StatementReader, StatementSink, Subject, SubjectBuf, Transport, TransportError,
    UnknownFeatureError,
};

pub use rdfdump_data::{
    ClientBuildError, FileTransport, HttpTransport, RDF_NS, RdfXmlGrammar, RdfXmlParser,
    SchemeTransport, rdfxml_parser,
};
