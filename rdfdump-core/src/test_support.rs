//! Test doubles for exercising the engine without a real document format.
//!
//! [`LineGrammar`] reads one statement per line:
//!
//! ```text
//! # comment
//! <subject> <predicate> <object>
//! _:node <predicate> "literal with \n escapes"@en
//! ```
//!
//! With [`Feature::Scanning`] set, every line before the first `@root` line
//! is skipped. The `@root` marker is ignored when scanning is off.

use std::io::BufRead;

use crate::{
    Feature, Grammar, GrammarContext, LiteralBuf, Locator, ObjectBuf, ParseError, Position,
    Statement, StatementBuf, StatementReader, SubjectBuf, TransportError,
};

const ROOT_MARKER: &str = "@root";

/// Line-oriented grammar used by engine tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineGrammar;

impl Grammar for LineGrammar {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn reader<'a>(
        &self,
        input: Box<dyn BufRead + 'a>,
        context: &GrammarContext<'_>,
    ) -> Result<Box<dyn StatementReader + 'a>, ParseError> {
        let mut reader = LineReader {
            input,
            document: context.document.to_string(),
            base: context.base.clone(),
            offset: 0,
            line: String::new(),
            current: None,
        };
        if context.features.get(Feature::Scanning) {
            reader.skip_to_root()?;
        }
        Ok(Box::new(reader))
    }
}

struct LineReader<'a> {
    input: Box<dyn BufRead + 'a>,
    document: String,
    base: Locator,
    offset: u64,
    line: String,
    current: Option<StatementBuf>,
}

impl LineReader<'_> {
    /// Read the next line into `self.line`, returning its starting offset or
    /// `None` at end of input.
    fn read_line(&mut self) -> Result<Option<u64>, ParseError> {
        self.line.clear();
        let start = self.offset;
        let read = self
            .input
            .read_line(&mut self.line)
            .map_err(|source| ParseError::Io {
                locator: self.document.clone(),
                source: TransportError::Read { source },
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.offset += read as u64;
        Ok(Some(start))
    }

    fn skip_to_root(&mut self) -> Result<(), ParseError> {
        while self.read_line()?.is_some() {
            if self.line.trim() == ROOT_MARKER {
                return Ok(());
            }
        }
        Err(ParseError::RootNotFound {
            position: Position::new(self.offset),
        })
    }
}

impl StatementReader for LineReader<'_> {
    fn next_statement(&mut self) -> Result<Option<Statement<'_>>, ParseError> {
        while let Some(start) = self.read_line()? {
            let text = self.line.trim();
            if text.is_empty() || text.starts_with('#') || text == ROOT_MARKER {
                continue;
            }
            let statement = parse_line(text, &self.base)
                .map_err(|message| ParseError::syntax(Position::new(start), message))?;
            self.current = Some(statement);
            return Ok(self.current.as_ref().map(StatementBuf::as_statement));
        }
        Ok(None)
    }
}

fn parse_line(text: &str, base: &Locator) -> Result<StatementBuf, String> {
    let (subject, rest) = split_token(text)?;
    let (predicate, object) = split_token(rest)?;
    let subject = match subject.strip_prefix("_:") {
        Some(id) => SubjectBuf::Blank(id.to_owned()),
        None => SubjectBuf::Resource(resolve_iri(subject, base)?),
    };
    let predicate = resolve_iri(predicate, base)?;
    let object = parse_object(object.trim(), base)?;
    Ok(StatementBuf::new(subject, predicate, object))
}

fn split_token(text: &str) -> Result<(&str, &str), String> {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((token, rest)) if !rest.trim().is_empty() => Ok((token, rest)),
        _ => Err(format!("expected three terms in {text:?}")),
    }
}

fn resolve_iri(token: &str, base: &Locator) -> Result<Locator, String> {
    let reference = token
        .strip_prefix('<')
        .and_then(|inner| inner.strip_suffix('>'))
        .ok_or_else(|| format!("expected <iri>, found {token:?}"))?;
    Locator::resolve(Some(base), reference).map_err(|err| err.to_string())
}

fn parse_object(token: &str, base: &Locator) -> Result<ObjectBuf, String> {
    if let Some(id) = token.strip_prefix("_:") {
        return Ok(ObjectBuf::Blank(id.to_owned()));
    }
    let Some(quoted) = token.strip_prefix('"') else {
        return resolve_iri(token, base).map(ObjectBuf::Resource);
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => {
                let suffix = &quoted[index + 1..];
                let literal = LiteralBuf::new(value);
                return match suffix.strip_prefix('@') {
                    Some(language) if !language.is_empty() => {
                        Ok(literal.with_language(language).into())
                    }
                    None if suffix.is_empty() => Ok(literal.into()),
                    _ => Err(format!("unexpected text after literal: {suffix:?}")),
                };
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                _ => return Err("invalid escape in literal".to_owned()),
            },
            other => value.push(other),
        }
    }
    Err("unterminated literal".to_owned())
}
