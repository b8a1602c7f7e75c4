//! The format grammar seam.
//!
//! A grammar turns a byte stream into a lazy, finite, non-restartable
//! sequence of statements. The engine pulls one statement at a time and does
//! not ask for the next until the sink has returned, so the grammar never
//! buffers more than the syntactic unit it is currently recognising.

use std::io::BufRead;

use crate::{FeatureSet, Locator, ParseError, Statement};

/// Inputs a grammar needs besides the byte stream.
#[derive(Debug, Clone, Copy)]
pub struct GrammarContext<'a> {
    /// Locator the bytes were fetched from.
    pub document: &'a Locator,
    /// Base for relative references; the document itself unless overridden.
    pub base: &'a Locator,
    /// Feature values frozen for this run.
    pub features: &'a FeatureSet,
}

/// Pull interface over recognised statements.
///
/// Each statement borrows the reader, so it is released before the next one
/// can be requested.
pub trait StatementReader {
    /// Recognise the next statement, or `None` once the document is
    /// exhausted.
    fn next_statement(&mut self) -> Result<Option<Statement<'_>>, ParseError>;
}

/// A document format.
pub trait Grammar {
    /// Short format name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Prepare a reader over `input`.
    ///
    /// Scanning for the root element happens here when the
    /// [`crate::Feature::Scanning`] feature is set.
    fn reader<'a>(
        &self,
        input: Box<dyn BufRead + 'a>,
        context: &GrammarContext<'_>,
    ) -> Result<Box<dyn StatementReader + 'a>, ParseError>;
}
