//! Subject–predicate–object statements, borrowed and owned.
//!
//! [`Statement`] borrows every payload from whoever produced it, so a sink
//! cannot keep one past the call that delivered it. [`StatementBuf`] is the
//! explicit owned copy for sinks that need to retain data.

use crate::Locator;

/// Which interpretation of a statement's object is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// The object names a resource.
    Resource,
    /// The object is literal text.
    Literal,
    /// The object is an anonymous node.
    Blank,
}

/// Statement subject: a named resource or a blank node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject<'a> {
    /// A resource identified by a locator.
    Resource(&'a Locator),
    /// A blank node, identified only within the current document.
    Blank(&'a str),
}

/// Literal text with an optional language tag or datatype.
///
/// The value is raw text and may contain control characters, newlines
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal<'a> {
    /// Lexical form.
    pub value: &'a str,
    /// `xml:lang` in scope when the literal was recognised.
    pub language: Option<&'a str>,
    /// Datatype, when one was declared.
    pub datatype: Option<&'a Locator>,
}

/// Statement object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Object<'a> {
    /// A resource identified by a locator.
    Resource(&'a Locator),
    /// A blank node identifier.
    Blank(&'a str),
    /// Literal text.
    Literal(Literal<'a>),
}

/// A transient statement handed to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Statement<'a> {
    /// The resource the statement is about.
    pub subject: Subject<'a>,
    /// The property being asserted.
    pub predicate: &'a Locator,
    /// The property value.
    pub object: Object<'a>,
}

impl Statement<'_> {
    /// Report which interpretation of [`Statement::object`] applies.
    #[must_use]
    pub const fn object_kind(&self) -> ObjectKind {
        match self.object {
            Object::Resource(_) => ObjectKind::Resource,
            Object::Blank(_) => ObjectKind::Blank,
            Object::Literal(_) => ObjectKind::Literal,
        }
    }

    /// Copy every payload into an owned [`StatementBuf`].
    #[must_use]
    pub fn to_buf(&self) -> StatementBuf {
        StatementBuf {
            subject: self.subject.to_buf(),
            predicate: self.predicate.clone(),
            object: self.object.to_buf(),
        }
    }
}

impl Subject<'_> {
    /// Owned copy of the subject.
    #[must_use]
    pub fn to_buf(&self) -> SubjectBuf {
        match *self {
            Self::Resource(locator) => SubjectBuf::Resource(locator.clone()),
            Self::Blank(id) => SubjectBuf::Blank(id.to_owned()),
        }
    }
}

impl Object<'_> {
    /// Owned copy of the object.
    #[must_use]
    pub fn to_buf(&self) -> ObjectBuf {
        match *self {
            Self::Resource(locator) => ObjectBuf::Resource(locator.clone()),
            Self::Blank(id) => ObjectBuf::Blank(id.to_owned()),
            Self::Literal(literal) => ObjectBuf::Literal(LiteralBuf {
                value: literal.value.to_owned(),
                language: literal.language.map(str::to_owned),
                datatype: literal.datatype.cloned(),
            }),
        }
    }
}

/// Owned counterpart of [`Subject`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubjectBuf {
    /// A named resource.
    Resource(Locator),
    /// A blank node identifier.
    Blank(String),
}

impl SubjectBuf {
    /// Borrow as a [`Subject`].
    #[must_use]
    pub fn as_subject(&self) -> Subject<'_> {
        match self {
            Self::Resource(locator) => Subject::Resource(locator),
            Self::Blank(id) => Subject::Blank(id),
        }
    }

    /// Reuse this subject as the object of another statement.
    #[must_use]
    pub fn to_object(&self) -> ObjectBuf {
        match self {
            Self::Resource(locator) => ObjectBuf::Resource(locator.clone()),
            Self::Blank(id) => ObjectBuf::Blank(id.clone()),
        }
    }
}

/// Owned counterpart of [`Literal`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralBuf {
    /// Lexical form.
    pub value: String,
    /// Language tag.
    pub language: Option<String>,
    /// Datatype.
    pub datatype: Option<Locator>,
}

impl LiteralBuf {
    /// A plain literal without language or datatype.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Attach a language tag.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Attach a datatype.
    #[must_use]
    pub fn with_datatype(mut self, datatype: Locator) -> Self {
        self.datatype = Some(datatype);
        self
    }

    /// Borrow as a [`Literal`].
    #[must_use]
    pub fn as_literal(&self) -> Literal<'_> {
        Literal {
            value: &self.value,
            language: self.language.as_deref(),
            datatype: self.datatype.as_ref(),
        }
    }
}

/// Owned counterpart of [`Object`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectBuf {
    /// A named resource.
    Resource(Locator),
    /// A blank node identifier.
    Blank(String),
    /// Literal text.
    Literal(LiteralBuf),
}

impl ObjectBuf {
    /// Borrow as an [`Object`].
    #[must_use]
    pub fn as_object(&self) -> Object<'_> {
        match self {
            Self::Resource(locator) => Object::Resource(locator),
            Self::Blank(id) => Object::Blank(id),
            Self::Literal(literal) => Object::Literal(literal.as_literal()),
        }
    }
}

impl From<LiteralBuf> for ObjectBuf {
    fn from(value: LiteralBuf) -> Self {
        Self::Literal(value)
    }
}

/// Owned counterpart of [`Statement`].
///
/// # Examples
/// ```
/// use rdfdump_core::{LiteralBuf, Locator, ObjectKind, StatementBuf, SubjectBuf};
///
/// let subject = SubjectBuf::Resource(Locator::parse("http://example.org/s")?);
/// let predicate = Locator::parse("http://purl.org/dc/elements/1.1/title")?;
/// let owned = StatementBuf::new(subject, predicate, LiteralBuf::new("A title").into());
///
/// let borrowed = owned.as_statement();
/// assert_eq!(borrowed.object_kind(), ObjectKind::Literal);
/// assert_eq!(borrowed.to_buf(), owned);
/// # Ok::<(), rdfdump_core::LocatorError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementBuf {
    /// Subject.
    pub subject: SubjectBuf,
    /// Predicate.
    pub predicate: Locator,
    /// Object.
    pub object: ObjectBuf,
}

impl StatementBuf {
    /// Assemble a statement from owned parts.
    #[must_use]
    pub const fn new(subject: SubjectBuf, predicate: Locator, object: ObjectBuf) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Borrow as a [`Statement`].
    #[must_use]
    pub fn as_statement(&self) -> Statement<'_> {
        Statement {
            subject: self.subject.as_subject(),
            predicate: &self.predicate,
            object: self.object.as_object(),
        }
    }
}
