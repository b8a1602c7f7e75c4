//! Human-readable statement rendering for the default sink.

use std::{
    borrow::Cow,
    io::{self, Write},
};

use rdfdump_core::{Flow, Literal, Object, Statement, StatementSink, Subject};

/// How literal payloads treat embedded newlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlinePolicy {
    /// Print literals verbatim.
    #[default]
    Keep,
    /// Print each `\n` in a literal as a space.
    ReplaceWithSpace,
}

impl NewlinePolicy {
    /// Apply the policy to literal text, borrowing when nothing changes.
    #[must_use]
    pub fn apply<'a>(self, value: &'a str) -> Cow<'a, str> {
        match self {
            Self::ReplaceWithSpace if value.contains('\n') => Cow::Owned(value.replace('\n', " ")),
            Self::Keep | Self::ReplaceWithSpace => Cow::Borrowed(value),
        }
    }
}

/// Render `statement` as `[subject, predicate, object]`.
///
/// Resources print bare and blank nodes as `_:id`. Literals are quoted and
/// followed by `@lang` or `^^<datatype>` when present; only they are
/// affected by `policy`.
#[must_use]
pub fn format_statement(statement: &Statement<'_>, policy: NewlinePolicy) -> String {
    let mut line = String::from("[");
    match statement.subject {
        Subject::Resource(locator) => line.push_str(locator.as_str()),
        Subject::Blank(id) => push_blank(&mut line, id),
    }
    line.push_str(", ");
    line.push_str(statement.predicate.as_str());
    line.push_str(", ");
    match statement.object {
        Object::Resource(locator) => line.push_str(locator.as_str()),
        Object::Blank(id) => push_blank(&mut line, id),
        Object::Literal(literal) => push_literal(&mut line, literal, policy),
    }
    line.push(']');
    line
}

fn push_blank(line: &mut String, id: &str) {
    line.push_str("_:");
    line.push_str(id);
}

fn push_literal(line: &mut String, literal: Literal<'_>, policy: NewlinePolicy) {
    line.push('"');
    line.push_str(&policy.apply(literal.value));
    line.push('"');
    if let Some(language) = literal.language {
        line.push('@');
        line.push_str(language);
    } else if let Some(datatype) = literal.datatype {
        line.push_str("^^<");
        line.push_str(datatype.as_str());
        line.push('>');
    }
}

/// Prints every statement as an `rdfdump: Statement:` line.
///
/// A failed write stops the run; the error is kept for the caller.
pub struct DisplaySink<'w> {
    out: &'w mut dyn Write,
    policy: NewlinePolicy,
    error: Option<io::Error>,
}

impl<'w> DisplaySink<'w> {
    /// Print to `out` using `policy` for literals.
    pub fn new(out: &'w mut dyn Write, policy: NewlinePolicy) -> Self {
        Self {
            out,
            policy,
            error: None,
        }
    }

    /// The write error that stopped the run, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl StatementSink for DisplaySink<'_> {
    fn accept(&mut self, statement: &Statement<'_>) -> Flow {
        let line = format_statement(statement, self.policy);
        match writeln!(self.out, "rdfdump: Statement: {line}") {
            Ok(()) => Flow::Continue,
            Err(err) => {
                self.error = Some(err);
                Flow::Stop
            }
        }
    }
}
