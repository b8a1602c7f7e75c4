//! Error types produced by the parser engine and its collaborators.
//!
//! Configuration mistakes ([`StateError`], [`crate::UnknownFeatureError`],
//! [`crate::LocatorError`]) are caller bugs and are never recovered from.
//! Runtime failures surface from [`crate::Parser::run`] as [`ParseError`];
//! statements delivered before the failure stay delivered.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::EngineState;

/// Byte offset into the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    offset: u64,
}

impl Position {
    /// Position at `offset` bytes from the start of the document.
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self { offset }
    }

    /// Offset in bytes.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.offset
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "byte {}", self.offset)
    }
}

/// An engine operation was attempted in the wrong lifecycle state.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot {operation} a parser that is {state}")]
pub struct StateError {
    operation: &'static str,
    state: EngineState,
}

impl StateError {
    pub(crate) const fn new(operation: &'static str, state: EngineState) -> Self {
        Self { operation, state }
    }

    /// The operation that was refused.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// The engine state at the time of the call.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }
}

/// Failures raised while fetching or streaming document bytes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description supplied by the server.
        message: String,
    },
    /// The request failed before a response arrived.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the transport.
        source: io::Error,
    },
    /// A local document could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Reading from an already opened stream failed.
    #[error("failed to read document bytes: {source}")]
    Read {
        /// Underlying I/O error.
        source: io::Error,
    },
    /// No transport handles the locator's scheme.
    #[error("no transport available for {scheme:?} locators ({locator})")]
    UnsupportedScheme {
        /// The unsupported scheme.
        scheme: String,
        /// The locator that was requested.
        locator: String,
    },
    /// The transport has no document for the locator.
    #[error("no document available at {locator}")]
    NotFound {
        /// The locator that was requested.
        locator: String,
    },
}

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The engine was misused.
    InvalidState,
    /// Transport failure.
    Io,
    /// Malformed document.
    Syntax,
    /// Scanning found no root element.
    RootNotFound,
}

/// Terminal failure of a parse run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The engine was not in a state that allows running.
    #[error(transparent)]
    InvalidState(#[from] StateError),
    /// Fetching or streaming the document failed.
    #[error("failed to read {locator}: {source}")]
    Io {
        /// Document being read.
        locator: String,
        /// Transport diagnostic.
        #[source]
        source: TransportError,
    },
    /// The document is malformed.
    #[error("syntax error at {position}: {message}")]
    Syntax {
        /// Where the problem was detected.
        position: Position,
        /// Human-readable description.
        message: String,
    },
    /// Scanning reached the end of input without finding a root element.
    #[error("no RDF root element found before end of input ({position} scanned)")]
    RootNotFound {
        /// How far the scan got.
        position: Position,
    },
}

impl ParseError {
    /// Build a [`ParseError::Syntax`].
    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ParseErrorKind {
        match self {
            Self::InvalidState(_) => ParseErrorKind::InvalidState,
            Self::Io { .. } => ParseErrorKind::Io,
            Self::Syntax { .. } => ParseErrorKind::Syntax,
            Self::RootNotFound { .. } => ParseErrorKind::RootNotFound,
        }
    }

    /// Where in the document the error was detected, if known.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Syntax { position, .. } | Self::RootNotFound { position } => Some(*position),
            Self::InvalidState(_) | Self::Io { .. } => None,
        }
    }
}
