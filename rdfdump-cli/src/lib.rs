//! Command-line interface that prints every statement of an RDF/XML document.
#![forbid(unsafe_code)]

mod display;
mod error;

use std::{io::Write, path::Path};

use clap::Parser as _;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rdfdump_core::{Feature, FeatureSet, Locator, LocatorError, Parser, Transport};
use rdfdump_data::{RdfXmlGrammar, SchemeTransport};
use serde::{Deserialize, Serialize};

pub use display::{DisplaySink, NewlinePolicy, format_statement};
pub use error::CliError;

const ARG_SOURCE: &str = "source";
const ARG_BASE: &str = "base";
const ENV_SOURCE: &str = "RDFDUMP_CMDS_RDFDUMP_SOURCE";

/// Parse the process arguments, print the document and return the number of
/// statements printed.
///
/// # Errors
/// Returns [`CliError`] for usage problems and for any parse failure; the
/// final statement count is written to `out` before a parse failure is
/// returned.
pub fn run(out: &mut dyn Write) -> Result<u64, CliError> {
    let args = DumpArgs::try_parse()?;
    let config = args.into_config()?;
    execute(&config, SchemeTransport::new()?, out)
}

/// Print every statement of `config.source` fetched through `transport`.
///
/// # Errors
/// Returns [`CliError::Parse`] when the run fails and
/// [`CliError::WriteOutput`] when `out` rejects a write.
pub fn execute<T: Transport>(
    config: &DumpConfig,
    transport: T,
    out: &mut dyn Write,
) -> Result<u64, CliError> {
    if !config.quiet {
        match &config.base {
            Some(base) => writeln!(
                out,
                "rdfdump: Parsing URI {} with base URI {base}",
                config.source
            ),
            None => writeln!(out, "rdfdump: Parsing URI {}", config.source),
        }
        .map_err(CliError::WriteOutput)?;
    }

    let mut sink = DisplaySink::new(out, config.newlines);
    let (result, delivered) = {
        let mut parser = Parser::new(RdfXmlGrammar, transport);
        parser.configure(config.features(), &mut sink).map_err(|err| CliError::Parse {
            delivered: 0,
            source: err.into(),
        })?;
        let result = parser.run(&config.source, config.base.as_ref());
        (result, parser.delivered())
    };
    let write_error = sink.take_error();
    drop(sink);

    writeln!(out, "rdfdump: Parsing returned {delivered} statements")
        .map_err(CliError::WriteOutput)?;

    if let Some(err) = write_error {
        return Err(CliError::WriteOutput(err));
    }
    match result {
        Ok(_) => Ok(delivered),
        Err(source) => Err(CliError::Parse { delivered, source }),
    }
}

/// Arguments accepted by `rdfdump`.
#[derive(Debug, Clone, clap::Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rdfdump",
    about = "Parse the given file as RDF/XML and print its statements",
    long_about = "Parse the given file as RDF/XML and print one line per \
                 statement. The source may be a URI or a local path; a \
                 base URI overrides the source for resolving relative \
                 references.",
    version
)]
#[ortho_config(prefix = "RDFDUMP")]
pub struct DumpArgs {
    /// Document to parse, as a URI or local path.
    #[arg(value_name = "source")]
    #[serde(default)]
    pub source: Option<String>,
    /// Base URI for resolving relative references.
    #[arg(value_name = "base")]
    #[serde(default)]
    pub base: Option<String>,
    /// Scan for the <rdf:RDF> element in the source.
    #[arg(short = 's', long = "scan")]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub scan: bool,
    /// Replace newlines with spaces in literals.
    #[arg(short = 'r', long = "replace-newlines")]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub replace_newlines: bool,
    /// No extra information messages.
    #[arg(short = 'q', long = "quiet")]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub quiet: bool,
}

impl DumpArgs {
    fn into_config(self) -> Result<DumpConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DumpConfig::try_from(merged)
    }
}

/// Validated `rdfdump` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    /// Document to parse.
    pub source: Locator,
    /// Explicit resolution base.
    pub base: Option<Locator>,
    /// Whether to scan for the root element.
    pub scan: bool,
    /// Literal newline handling.
    pub newlines: NewlinePolicy,
    /// Suppress the banner line.
    pub quiet: bool,
}

impl DumpConfig {
    /// Parser features implied by the configuration.
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        FeatureSet::new().with(Feature::Scanning, self.scan)
    }
}

impl TryFrom<DumpArgs> for DumpConfig {
    type Error = CliError;

    fn try_from(args: DumpArgs) -> Result<Self, Self::Error> {
        let source = args.source.ok_or(CliError::MissingArgument {
            field: ARG_SOURCE,
            env: ENV_SOURCE,
        })?;
        let source = locate(&source).map_err(|err| CliError::InvalidLocator {
            field: ARG_SOURCE,
            value: source.clone(),
            source: err,
        })?;
        let base = args
            .base
            .map(|base| {
                locate(&base).map_err(|err| CliError::InvalidLocator {
                    field: ARG_BASE,
                    value: base.clone(),
                    source: err,
                })
            })
            .transpose()?;
        Ok(Self {
            source,
            base,
            scan: args.scan,
            newlines: if args.replace_newlines {
                NewlinePolicy::ReplaceWithSpace
            } else {
                NewlinePolicy::Keep
            },
            quiet: args.quiet,
        })
    }
}

/// Interpret `text` as an absolute URI, falling back to a local path.
///
/// Single-letter schemes are drive letters, not URIs.
fn locate(text: &str) -> Result<Locator, LocatorError> {
    match Locator::parse(text) {
        Ok(locator) if locator.scheme().len() > 1 => Ok(locator),
        Ok(_) | Err(LocatorError::Malformed { .. }) => Locator::from_file_path(Path::new(text)),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests;
