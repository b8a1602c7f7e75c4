//! The consumer side of a parse run.

use crate::{Statement, StatementBuf};

/// What the engine should do after a sink call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Keep parsing.
    Continue,
    /// Stop parsing; the run finishes successfully.
    Stop,
}

/// Receives each statement as soon as it is recognised.
///
/// Sinks run on the thread that called [`crate::Parser::run`], inline with
/// parsing. The statement is only borrowed for the duration of the call.
///
/// # Examples
/// ```
/// use rdfdump_core::{Flow, Statement, StatementSink};
///
/// let mut seen = 0_u32;
/// let mut sink = |_: &Statement<'_>| {
///     seen += 1;
///     Flow::Continue
/// };
/// let _: &mut dyn StatementSink = &mut sink;
/// ```
pub trait StatementSink {
    /// Accept one statement.
    fn accept(&mut self, statement: &Statement<'_>) -> Flow;
}

impl<F> StatementSink for F
where
    F: FnMut(&Statement<'_>) -> Flow,
{
    fn accept(&mut self, statement: &Statement<'_>) -> Flow {
        self(statement)
    }
}

/// Keeps owned copies of every statement, optionally stopping after a limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectingSink {
    statements: Vec<StatementBuf>,
    limit: Option<usize>,
}

impl CollectingSink {
    /// Collect every statement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            statements: Vec::new(),
            limit: None,
        }
    }

    /// Request a stop once `limit` statements have been collected.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            statements: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Statements collected so far.
    #[must_use]
    pub fn statements(&self) -> &[StatementBuf] {
        &self.statements
    }

    /// Consume the sink, returning the collected statements.
    #[must_use]
    pub fn into_statements(self) -> Vec<StatementBuf> {
        self.statements
    }
}

impl StatementSink for CollectingSink {
    fn accept(&mut self, statement: &Statement<'_>) -> Flow {
        self.statements.push(statement.to_buf());
        match self.limit {
            Some(limit) if self.statements.len() >= limit => Flow::Stop,
            _ => Flow::Continue,
        }
    }
}

/// Counts statements on their way to another sink.
#[derive(Debug, Clone, Default)]
pub struct CountingSink<S> {
    inner: S,
    count: u64,
}

impl<S: StatementSink> CountingSink<S> {
    /// Wrap `inner`.
    pub const fn new(inner: S) -> Self {
        Self { inner, count: 0 }
    }

    /// Statements passed through so far.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Unwrap the inner sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: StatementSink> StatementSink for CountingSink<S> {
    fn accept(&mut self, statement: &Statement<'_>) -> Flow {
        self.count += 1;
        self.inner.accept(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LiteralBuf, Locator, SubjectBuf};
    use rstest::{fixture, rstest};

    #[fixture]
    fn statement() -> StatementBuf {
        StatementBuf::new(
            SubjectBuf::Blank("s".into()),
            Locator::parse("http://example.org/p").expect("valid"),
            LiteralBuf::new("o").into(),
        )
    }

    #[rstest]
    fn collecting_sink_stops_at_limit(statement: StatementBuf) {
        let mut sink = CollectingSink::with_limit(2);

        assert_eq!(sink.accept(&statement.as_statement()), Flow::Continue);
        assert_eq!(sink.accept(&statement.as_statement()), Flow::Stop);
        assert_eq!(sink.statements().len(), 2);
    }

    #[rstest]
    fn counting_sink_forwards_flow(statement: StatementBuf) {
        let mut sink = CountingSink::new(|_: &Statement<'_>| Flow::Stop);

        let flow = sink.accept(&statement.as_statement());

        assert_eq!(flow, Flow::Stop);
        assert_eq!(sink.count(), 1);
    }
}
