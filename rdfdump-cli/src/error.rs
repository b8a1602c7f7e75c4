//! Error types emitted by the rdfdump CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use rdfdump_core::{LocatorError, ParseError};
use rdfdump_data::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the rdfdump CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation, or help was requested.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass <{field}> or set {env})")]
    MissingArgument {
        /// Name of the missing argument.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A source or base argument is neither a URI nor a usable path.
    #[error("invalid {field} {value:?}: {source}")]
    InvalidLocator {
        /// Which argument was rejected.
        field: &'static str,
        /// The rejected text.
        value: String,
        /// Why it was rejected.
        #[source]
        source: LocatorError,
    },
    /// The HTTP client could not be initialised.
    #[error("failed to initialise the HTTP client: {0}")]
    ClientBuild(#[from] ClientBuildError),
    /// The document failed to parse.
    #[error("failed to parse RDF after {delivered} statements: {source}")]
    Parse {
        /// Statements printed before the failure.
        delivered: u64,
        /// Why parsing stopped.
        #[source]
        source: ParseError,
    },
    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
