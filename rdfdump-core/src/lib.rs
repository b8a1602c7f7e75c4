//! Core types for the rdfdump streaming parser.
//!
//! The crate models the pieces every parse run needs regardless of the wire
//! format: immutable [`Locator`]s, transient [`Statement`]s handed to a
//! [`StatementSink`], the strict [`FeatureSet`], and the single-use [`Parser`]
//! engine that pulls statements from a [`Grammar`] collaborator and pushes
//! them into the sink one at a time.
//!
//! Boundaries:
//! - No format grammar lives here; `rdfdump-data` provides RDF/XML.
//! - Network and filesystem transports live in `rdfdump-data`; only the
//!   [`Transport`] trait and the in-memory [`MemoryTransport`] live here.
//!
//! Invariants:
//! - Statements never outlive the sink call that receives them unless the
//!   sink takes an owned copy with [`Statement::to_buf`].
//! - No global mutable state.
#![forbid(unsafe_code)]

mod engine;
mod error;
mod feature;
mod grammar;
mod locator;
mod sink;
mod statement;
mod transport;

pub mod test_support;

pub use engine::{EngineState, Parser, RunReport};
pub use error::{ParseError, ParseErrorKind, Position, StateError, TransportError};
pub use feature::{Feature, FeatureSet, UnknownFeatureError};
pub use grammar::{Grammar, GrammarContext, StatementReader};
pub use locator::{Locator, LocatorError};
pub use sink::{CollectingSink, CountingSink, Flow, StatementSink};
pub use statement::{
    Literal, LiteralBuf, Object, ObjectBuf, ObjectKind, Statement, StatementBuf, Subject,
    SubjectBuf,
};
pub use transport::{DocumentStream, MemoryTransport, Transport};
