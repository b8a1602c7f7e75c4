//! The single-use parser engine.
//!
//! `Created -> Configured -> Running -> {Finished, Failed}`. A parser runs at
//! most once; re-parsing needs a fresh instance so the grammar's internal
//! state never has to be reset.

use std::fmt;

use log::{debug, info, warn};

use crate::{
    FeatureSet, Flow, Grammar, GrammarContext, Locator, ParseError, StateError, StatementSink,
    Transport,
};

/// Lifecycle state of a [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Built but not configured.
    Created,
    /// Features and sink are set.
    Configured,
    /// Inside [`Parser::run`].
    Running,
    /// The run completed.
    Finished,
    /// The run failed.
    Failed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Configured => "configured",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Statements handed to the sink.
    pub delivered: u64,
    /// Whether the sink asked to stop before the document was exhausted.
    pub stopped: bool,
}

/// Streams statements from a document into a sink.
///
/// The grammar and transport are chosen at construction; the sink is only
/// borrowed, for as long as the parser lives.
///
/// # Examples
/// ```
/// use rdfdump_core::{CollectingSink, FeatureSet, Grammar, Locator, ParseError, Parser, Transport};
///
/// fn count_statements<G: Grammar, T: Transport>(
///     grammar: G,
///     transport: T,
///     document: &Locator,
/// ) -> Result<u64, ParseError> {
///     let mut sink = CollectingSink::new();
///     let mut parser = Parser::new(grammar, transport);
///     parser.configure(FeatureSet::default(), &mut sink)?;
///     Ok(parser.run(document, None)?.delivered)
/// }
/// ```
pub struct Parser<'s, G, T> {
    grammar: G,
    transport: T,
    features: FeatureSet,
    sink: Option<&'s mut dyn StatementSink>,
    state: EngineState,
    delivered: u64,
}

impl<'s, G: Grammar, T: Transport> Parser<'s, G, T> {
    /// Create an unconfigured parser. No I/O happens here.
    pub fn new(grammar: G, transport: T) -> Self {
        Self {
            grammar,
            transport,
            features: FeatureSet::new(),
            sink: None,
            state: EngineState::Created,
            delivered: 0,
        }
    }

    /// Set features and the sink. Calling again before [`Parser::run`]
    /// replaces both.
    pub fn configure(
        &mut self,
        features: FeatureSet,
        sink: &'s mut dyn StatementSink,
    ) -> Result<(), StateError> {
        match self.state {
            EngineState::Created | EngineState::Configured => {
                self.features = features;
                self.sink = Some(sink);
                self.transition(EngineState::Configured);
                Ok(())
            }
            state => Err(StateError::new("configure", state)),
        }
    }

    /// Parse `locator`, resolving relative references against `base` or,
    /// when absent, against `locator` itself.
    ///
    /// A parser runs once; any further call fails with
    /// [`ParseError::InvalidState`]. Statements delivered before a failure
    /// are not retracted; [`Parser::delivered`] still reports them.
    pub fn run(&mut self, locator: &Locator, base: Option<&Locator>) -> Result<RunReport, ParseError> {
        if self.state != EngineState::Configured {
            return Err(StateError::new("run", self.state).into());
        }
        let Some(sink) = self.sink.take() else {
            return Err(StateError::new("run", self.state).into());
        };
        self.transition(EngineState::Running);
        debug!(
            "parsing {locator} as {} with base {}",
            self.grammar.name(),
            base.unwrap_or(locator)
        );

        match self.drive(sink, locator, base) {
            Ok(report) => {
                self.transition(EngineState::Finished);
                info!(
                    "parsed {} statements from {locator}{}",
                    report.delivered,
                    if report.stopped { " (stopped by sink)" } else { "" }
                );
                Ok(report)
            }
            Err(error) => {
                self.transition(EngineState::Failed);
                warn!(
                    "parsing {locator} failed after {} statements: {error}",
                    self.delivered
                );
                Err(error)
            }
        }
    }

    /// Statements handed to the sink so far.
    #[must_use]
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Features in effect.
    #[must_use]
    pub const fn features(&self) -> &FeatureSet {
        &self.features
    }

    fn drive(
        &mut self,
        sink: &mut dyn StatementSink,
        locator: &Locator,
        base: Option<&Locator>,
    ) -> Result<RunReport, ParseError> {
        let input = self
            .transport
            .open(locator)
            .map_err(|source| ParseError::Io {
                locator: locator.to_string(),
                source,
            })?;
        let context = GrammarContext {
            document: locator,
            base: base.unwrap_or(locator),
            features: &self.features,
        };
        let mut reader = self.grammar.reader(input, &context)?;

        while let Some(statement) = reader.next_statement()? {
            self.delivered += 1;
            if sink.accept(&statement) == Flow::Stop {
                return Ok(RunReport {
                    delivered: self.delivered,
                    stopped: true,
                });
            }
        }
        Ok(RunReport {
            delivered: self.delivered,
            stopped: false,
        })
    }

    fn transition(&mut self, next: EngineState) {
        debug!("parser state {} -> {next}", self.state);
        self.state = next;
    }
}

impl<G, T> fmt::Debug for Parser<'_, G, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("features", &self.features)
            .field("state", &self.state)
            .field("delivered", &self.delivered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
