//! Event-driven recognition of RDF/XML statements.
//!
//! The reader keeps one frame per open element and queues the statements a
//! single XML event completes. [`StatementReader::next_statement`] drains the
//! queue before reading further events, so at most one element's worth of
//! statements is buffered (a `rdf:parseType="Collection"` list is emitted
//! when it closes).

use std::{
    borrow::Cow,
    collections::{HashMap, VecDeque},
    fmt,
    io::{self, BufRead},
    rc::Rc,
    sync::Arc,
};

use log::{debug, warn};
use quick_xml::{
    Writer,
    events::{BytesStart, Event},
    name::{Namespace, ResolveResult},
    reader::NsReader,
};
use rdfdump_core::{
    Feature, FeatureSet, GrammarContext, LiteralBuf, Locator, ObjectBuf, ParseError, Position,
    Statement, StatementBuf, StatementReader, SubjectBuf, TransportError,
};

use super::vocab::{self, RDF_NS, Vocabulary};

/// Prefix of blank node labels the reader invents.
const GENERATED_PREFIX: &str = "genid";

type Step = Result<(), String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Prolog,
    Body,
    Done,
}

/// `xml:base` and `xml:lang` in effect for an element.
#[derive(Debug)]
struct Scope {
    base: Locator,
    language: Option<String>,
}

/// Expanded name of an element or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Name {
    namespace: String,
    local: String,
}

impl Name {
    fn in_rdf(&self) -> bool {
        self.namespace == RDF_NS
    }

    fn is_rdf(&self, local: &str) -> bool {
        self.in_rdf() && self.local == local
    }

    fn to_locator(&self) -> Result<Locator, String> {
        Locator::parse(&format!("{}{}", self.namespace, self.local))
            .map_err(|err| format!("{self} is not a usable IRI: {err}"))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.local)
    }
}

/// Namespace of an element, detached from the XML reader's borrow.
enum ElementNamespace {
    Bound(String),
    Unbound,
    Unknown(String),
}

impl From<&ResolveResult<'_>> for ElementNamespace {
    fn from(resolved: &ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Bound(Namespace(bytes)) => {
                Self::Bound(String::from_utf8_lossy(bytes).into_owned())
            }
            ResolveResult::Unbound => Self::Unbound,
            ResolveResult::Unknown(prefix) => {
                Self::Unknown(String::from_utf8_lossy(prefix).into_owned())
            }
        }
    }
}

#[derive(Debug, Default)]
struct SyntaxAttributes {
    about: Option<String>,
    id: Option<String>,
    node_id: Option<String>,
    resource: Option<String>,
    datatype: Option<String>,
    parse_type: Option<String>,
}

impl SyntaxAttributes {
    fn set(&mut self, local: &str, value: String) {
        let slot = match local {
            "about" => &mut self.about,
            "ID" => &mut self.id,
            "nodeID" => &mut self.node_id,
            "resource" => &mut self.resource,
            "datatype" => &mut self.datatype,
            "parseType" => &mut self.parse_type,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// A start tag with its attributes sorted by role.
#[derive(Debug)]
struct Element {
    name: Name,
    base: Option<String>,
    language: Option<String>,
    syntax: SyntaxAttributes,
    properties: Vec<(Name, String)>,
}

#[derive(Debug)]
struct NodeFrame {
    subject: SubjectBuf,
    scope: Rc<Scope>,
    next_member: u32,
    document_element: bool,
}

#[derive(Debug)]
enum Content {
    /// Character data seen so far; becomes a literal when the element closes.
    Text(String),
    /// A nested node element supplied the object.
    Node,
    /// The object came from attributes; no content is allowed.
    Closed,
}

#[derive(Debug)]
struct PropertyFrame {
    subject: SubjectBuf,
    predicate: Locator,
    reification: Option<Locator>,
    scope: Rc<Scope>,
    datatype: Option<Locator>,
    content: Content,
}

impl PropertyFrame {
    fn accepts_node(&self) -> bool {
        self.datatype.is_none()
            && matches!(&self.content, Content::Text(text) if text.trim().is_empty())
    }
}

struct LiteralFrame {
    subject: SubjectBuf,
    predicate: Locator,
    reification: Option<Locator>,
    writer: Writer<Vec<u8>>,
    depth: usize,
}

#[derive(Debug)]
struct CollectionFrame {
    subject: SubjectBuf,
    predicate: Locator,
    reification: Option<Locator>,
    scope: Rc<Scope>,
    items: Vec<SubjectBuf>,
}

enum Frame {
    Root(Rc<Scope>),
    Node(NodeFrame),
    Property(PropertyFrame),
    Literal(LiteralFrame),
    Collection(CollectionFrame),
}

impl Frame {
    fn scope(&self) -> Option<&Rc<Scope>> {
        match self {
            Self::Root(scope) => Some(scope),
            Self::Node(node) => Some(&node.scope),
            Self::Property(property) => Some(&property.scope),
            Self::Collection(collection) => Some(&collection.scope),
            Self::Literal(_) => None,
        }
    }
}

/// Streaming RDF/XML statement reader over a buffered byte source.
pub(crate) struct RdfXmlReader<'a> {
    xml: NsReader<Box<dyn BufRead + 'a>>,
    buf: Vec<u8>,
    document: String,
    features: FeatureSet,
    vocab: Vocabulary,
    root_scope: Rc<Scope>,
    entities: HashMap<String, String>,
    inherited: HashMap<String, String>,
    stack: Vec<Frame>,
    phase: Phase,
    pending: VecDeque<StatementBuf>,
    current: Option<StatementBuf>,
    blank_ids: u64,
    origin: u64,
}

impl<'a> RdfXmlReader<'a> {
    /// Wrap `input`, whose first byte sits `origin` bytes into the document.
    ///
    /// `inherited` holds `(prefix, namespace)` declarations made by markup
    /// before `input`, later ones taking precedence; they resolve prefixes
    /// the document itself leaves undeclared.
    pub(crate) fn new(
        input: Box<dyn BufRead + 'a>,
        context: &GrammarContext<'_>,
        origin: u64,
        inherited: Vec<(String, String)>,
    ) -> Result<Self, ParseError> {
        let vocab = Vocabulary::new()
            .map_err(|err| ParseError::syntax(Position::new(origin), err.to_string()))?;
        Ok(Self {
            xml: NsReader::from_reader(input),
            buf: Vec::new(),
            document: context.document.to_string(),
            features: *context.features,
            vocab,
            root_scope: Rc::new(Scope {
                base: context.base.clone(),
                language: None,
            }),
            entities: HashMap::new(),
            inherited: inherited.into_iter().collect(),
            stack: Vec::new(),
            phase: Phase::Prolog,
            pending: VecDeque::new(),
            current: None,
            blank_ids: 0,
            origin,
        })
    }

    fn position(&self) -> Position {
        Position::new(
            self.origin
                .saturating_add(to_offset(self.xml.buffer_position())),
        )
    }

    /// Read one XML event and queue whatever statements it completes.
    fn pump(&mut self) -> Result<(), ParseError> {
        let read = self
            .xml
            .read_resolved_event_into(&mut self.buf)
            .map(|(namespace, event)| (ElementNamespace::from(&namespace), event.into_owned()));
        self.buf.clear();
        let (namespace, event) = read.map_err(|err| self.xml_error(err))?;
        let position = self.position();
        self.handle(namespace, event)
            .map_err(|message| ParseError::syntax(position, message))
    }

    fn xml_error(&self, err: quick_xml::Error) -> ParseError {
        match err {
            quick_xml::Error::Io(shared) => {
                let source = Arc::try_unwrap(shared)
                    .unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string()));
                ParseError::Io {
                    locator: self.document.clone(),
                    source: TransportError::Read { source },
                }
            }
            other => ParseError::syntax(
                Position::new(
                    self.origin
                        .saturating_add(to_offset(self.xml.error_position())),
                ),
                other.to_string(),
            ),
        }
    }

    fn handle(&mut self, namespace: ElementNamespace, event: Event<'static>) -> Step {
        if matches!(self.stack.last(), Some(Frame::Literal(_))) {
            return self.capture(event);
        }
        match event {
            Event::Start(start) => self.start_element(namespace, &start),
            Event::Empty(start) => {
                self.start_element(namespace, &start)?;
                self.end_element()
            }
            Event::End(_) => self.end_element(),
            Event::Text(text) => {
                let entities = &self.entities;
                let value = text
                    .unescape_with(|name| entities.get(name).map(String::as_str))
                    .map_err(|err| err.to_string())?;
                let value = normalize_newlines(&value).into_owned();
                self.text(&value)
            }
            Event::CData(data) => {
                let value = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|err| format!("CDATA section is not UTF-8: {err}"))?;
                self.text(&normalize_newlines(&value))
            }
            Event::DocType(doctype) => {
                self.entities
                    .extend(internal_entities(&String::from_utf8_lossy(&doctype)));
                Ok(())
            }
            Event::Eof => self.end_of_document(),
            _ => Ok(()),
        }
    }

    /// Copy markup verbatim into the innermost XML literal.
    fn capture(&mut self, event: Event<'static>) -> Step {
        let Some(Frame::Literal(literal)) = self.stack.last_mut() else {
            return Ok(());
        };
        match &event {
            Event::Start(_) => literal.depth += 1,
            Event::End(_) if literal.depth == 0 => return self.end_element(),
            Event::End(_) => literal.depth -= 1,
            Event::Eof => return self.end_of_document(),
            _ => {}
        }
        literal
            .writer
            .write_event(event)
            .map_err(|err| format!("failed to capture XML literal: {err}"))
    }

    fn start_element(&mut self, namespace: ElementNamespace, start: &BytesStart<'_>) -> Step {
        let element = read_element(
            &self.xml,
            namespace,
            start,
            &self.features,
            &self.entities,
            &self.inherited,
        )?;
        match self.phase {
            Phase::Prolog => {
                self.phase = Phase::Body;
                if element.name.is_rdf("RDF") {
                    let scope = self.child_scope(&element)?;
                    self.stack.push(Frame::Root(scope));
                    Ok(())
                } else {
                    debug!("document element <{}> is a node element", element.name);
                    self.node_element(element, true)
                }
            }
            Phase::Body => match self.stack.last() {
                Some(Frame::Root(_) | Frame::Collection(_)) => self.node_element(element, false),
                Some(Frame::Node(_)) => self.property_element(element),
                Some(Frame::Property(property)) if property.accepts_node() => {
                    self.node_element(element, false)
                }
                Some(Frame::Property(_)) => Err(format!(
                    "unexpected element <{}> inside a property that already has a value",
                    element.name
                )),
                Some(Frame::Literal(_)) | None => {
                    Err(format!("unexpected element <{}>", element.name))
                }
            },
            Phase::Done => Ok(()),
        }
    }

    fn end_element(&mut self) -> Step {
        let Some(frame) = self.stack.pop() else {
            return Err("unexpected end tag".to_owned());
        };
        match frame {
            Frame::Root(_) => self.phase = Phase::Done,
            Frame::Node(node) => {
                if node.document_element {
                    self.phase = Phase::Done;
                }
            }
            Frame::Property(property) => self.finish_property(property),
            Frame::Literal(literal) => self.finish_literal(literal)?,
            Frame::Collection(collection) => self.finish_collection(collection),
        }
        if self.phase == Phase::Done {
            debug!("root element of {} closed", self.document);
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Step {
        match self.stack.last_mut() {
            Some(Frame::Property(PropertyFrame {
                content: Content::Text(value),
                ..
            })) => {
                value.push_str(text);
                Ok(())
            }
            _ if text.trim().is_empty() => Ok(()),
            _ => Err(format!("unexpected text {:?}", excerpt(text))),
        }
    }

    fn end_of_document(&self) -> Step {
        match self.phase {
            Phase::Prolog => Err("document has no root element".to_owned()),
            Phase::Body => Err(format!(
                "document ended with {} unclosed elements",
                self.stack.len()
            )),
            Phase::Done => Ok(()),
        }
    }

    fn current_scope(&self) -> Rc<Scope> {
        self.stack
            .iter()
            .rev()
            .find_map(Frame::scope)
            .map_or_else(|| Rc::clone(&self.root_scope), Rc::clone)
    }

    fn child_scope(&self, element: &Element) -> Result<Rc<Scope>, String> {
        let parent = self.current_scope();
        if element.base.is_none() && element.language.is_none() {
            return Ok(parent);
        }
        let base = match &element.base {
            Some(reference) => resolve_in(&parent, reference)?,
            None => parent.base.clone(),
        };
        let language = match &element.language {
            Some(tag) if tag.is_empty() => None,
            Some(tag) => Some(tag.clone()),
            None => parent.language.clone(),
        };
        Ok(Rc::new(Scope { base, language }))
    }

    fn node_element(&mut self, element: Element, document_element: bool) -> Step {
        if element.name.in_rdf() && vocab::is_forbidden_node_name(&element.name.local) {
            return Err(format!(
                "rdf:{} cannot be used as a node element",
                element.name.local
            ));
        }
        let syntax = &element.syntax;
        if syntax.resource.is_some() || syntax.datatype.is_some() || syntax.parse_type.is_some() {
            return Err(format!(
                "node element <{}> carries a property-only attribute",
                element.name
            ));
        }
        let scope = self.child_scope(&element)?;
        let subject = self.node_subject(syntax, &scope)?;

        if let Some(Frame::Property(property)) = self.stack.last_mut() {
            property.content = Content::Node;
            let parent = property.subject.clone();
            let predicate = property.predicate.clone();
            let reification = property.reification.clone();
            self.emit_linked(parent, predicate, subject.to_object(), reification.as_ref());
        } else if let Some(Frame::Collection(collection)) = self.stack.last_mut() {
            collection.items.push(subject.clone());
        }

        if !element.name.is_rdf("Description") {
            let class = element.name.to_locator()?;
            self.emit(
                subject.clone(),
                self.vocab.rdf_type.clone(),
                ObjectBuf::Resource(class),
            );
        }
        self.property_attributes(&subject, &element.properties, &scope)?;
        self.stack.push(Frame::Node(NodeFrame {
            subject,
            scope,
            next_member: 1,
            document_element,
        }));
        Ok(())
    }

    fn node_subject(
        &mut self,
        syntax: &SyntaxAttributes,
        scope: &Scope,
    ) -> Result<SubjectBuf, String> {
        match (&syntax.about, &syntax.id, &syntax.node_id) {
            (Some(about), None, None) => resolve_in(scope, about).map(SubjectBuf::Resource),
            (None, Some(id), None) => id_locator(scope, id).map(SubjectBuf::Resource),
            (None, None, Some(node_id)) => blank_label(node_id).map(SubjectBuf::Blank),
            (None, None, None) => Ok(SubjectBuf::Blank(self.fresh_blank())),
            _ => Err("rdf:about, rdf:ID and rdf:nodeID are mutually exclusive".to_owned()),
        }
    }

    fn property_element(&mut self, element: Element) -> Step {
        if element.name.in_rdf() && vocab::is_forbidden_property_name(&element.name.local) {
            return Err(format!(
                "rdf:{} cannot be used as a property element",
                element.name.local
            ));
        }
        let Some(Frame::Node(node)) = self.stack.last_mut() else {
            return Err(format!("property <{}> has no subject", element.name));
        };
        let subject = node.subject.clone();
        let predicate = if element.name.is_rdf("li") {
            let index = node.next_member;
            node.next_member += 1;
            vocab::member(index).map_err(|err| err.to_string())?
        } else {
            element.name.to_locator()?
        };

        let scope = self.child_scope(&element)?;
        let syntax = &element.syntax;
        let reification = syntax
            .id
            .as_deref()
            .map(|id| id_locator(&scope, id))
            .transpose()?;

        if let Some(parse_type) = &syntax.parse_type {
            let combined = syntax.resource.is_some()
                || syntax.node_id.is_some()
                || syntax.datatype.is_some()
                || !element.properties.is_empty();
            if combined {
                return Err("rdf:parseType cannot be combined with other value attributes".to_owned());
            }
            return self.parse_type_property(parse_type, subject, predicate, reification, scope);
        }

        let object = match (&syntax.resource, &syntax.node_id) {
            (Some(_), Some(_)) => {
                return Err("rdf:resource and rdf:nodeID are mutually exclusive".to_owned());
            }
            (Some(resource), None) => Some(SubjectBuf::Resource(resolve_in(&scope, resource)?)),
            (None, Some(node_id)) => Some(SubjectBuf::Blank(blank_label(node_id)?)),
            (None, None) if !element.properties.is_empty() => {
                Some(SubjectBuf::Blank(self.fresh_blank()))
            }
            (None, None) => None,
        };

        let Some(object) = object else {
            let datatype = syntax
                .datatype
                .as_deref()
                .map(|datatype| resolve_in(&scope, datatype))
                .transpose()?;
            self.stack.push(Frame::Property(PropertyFrame {
                subject,
                predicate,
                reification,
                scope,
                datatype,
                content: Content::Text(String::new()),
            }));
            return Ok(());
        };

        if syntax.datatype.is_some() {
            return Err("rdf:datatype is only allowed on literal property elements".to_owned());
        }
        self.emit_linked(
            subject.clone(),
            predicate.clone(),
            object.to_object(),
            reification.as_ref(),
        );
        self.property_attributes(&object, &element.properties, &scope)?;
        self.stack.push(Frame::Property(PropertyFrame {
            subject,
            predicate,
            reification,
            scope,
            datatype: None,
            content: Content::Closed,
        }));
        Ok(())
    }

    fn parse_type_property(
        &mut self,
        parse_type: &str,
        subject: SubjectBuf,
        predicate: Locator,
        reification: Option<Locator>,
        scope: Rc<Scope>,
    ) -> Step {
        match parse_type {
            "Resource" => {
                let object = SubjectBuf::Blank(self.fresh_blank());
                self.emit_linked(subject, predicate, object.to_object(), reification.as_ref());
                self.stack.push(Frame::Node(NodeFrame {
                    subject: object,
                    scope,
                    next_member: 1,
                    document_element: false,
                }));
            }
            "Collection" => {
                self.stack.push(Frame::Collection(CollectionFrame {
                    subject,
                    predicate,
                    reification,
                    scope,
                    items: Vec::new(),
                }));
            }
            other => {
                if other != "Literal" {
                    if !self.features.get(Feature::AllowOtherParseTypes) {
                        return Err(format!("unsupported rdf:parseType {other:?}"));
                    }
                    debug!("treating rdf:parseType {other:?} as Literal");
                }
                self.stack.push(Frame::Literal(LiteralFrame {
                    subject,
                    predicate,
                    reification,
                    writer: Writer::new(Vec::new()),
                    depth: 0,
                }));
            }
        }
        Ok(())
    }

    fn property_attributes(
        &mut self,
        subject: &SubjectBuf,
        properties: &[(Name, String)],
        scope: &Scope,
    ) -> Step {
        for (name, value) in properties {
            let predicate = name.to_locator()?;
            let object = if name.is_rdf("type") {
                ObjectBuf::Resource(resolve_in(scope, value)?)
            } else {
                plain_literal(value.clone(), scope.language.as_deref()).into()
            };
            self.emit(subject.clone(), predicate, object);
        }
        Ok(())
    }

    fn finish_property(&mut self, property: PropertyFrame) {
        let PropertyFrame {
            subject,
            predicate,
            reification,
            scope,
            datatype,
            content,
        } = property;
        let Content::Text(value) = content else {
            return;
        };
        let literal = match datatype {
            Some(datatype) => LiteralBuf::new(value).with_datatype(datatype),
            None => plain_literal(value, scope.language.as_deref()),
        };
        self.emit_linked(subject, predicate, literal.into(), reification.as_ref());
    }

    fn finish_literal(&mut self, literal: LiteralFrame) -> Step {
        let LiteralFrame {
            subject,
            predicate,
            reification,
            writer,
            ..
        } = literal;
        let value = String::from_utf8(writer.into_inner())
            .map_err(|err| format!("XML literal is not UTF-8: {err}"))?;
        let object = LiteralBuf::new(value).with_datatype(self.vocab.xml_literal.clone());
        self.emit_linked(subject, predicate, object.into(), reification.as_ref());
        Ok(())
    }

    fn finish_collection(&mut self, collection: CollectionFrame) {
        let CollectionFrame {
            subject,
            predicate,
            reification,
            items,
            ..
        } = collection;
        let cells: Vec<String> = items.iter().map(|_| self.fresh_blank()).collect();
        let head = self.list_link(cells.first());
        self.emit_linked(subject, predicate, head, reification.as_ref());

        for (index, (cell, item)) in cells.iter().zip(items).enumerate() {
            let rest = self.list_link(cells.get(index + 1));
            self.emit(
                SubjectBuf::Blank(cell.clone()),
                self.vocab.first.clone(),
                item.to_object(),
            );
            self.emit(SubjectBuf::Blank(cell.clone()), self.vocab.rest.clone(), rest);
        }
    }

    fn list_link(&self, cell: Option<&String>) -> ObjectBuf {
        cell.map_or_else(
            || ObjectBuf::Resource(self.vocab.nil.clone()),
            |cell| ObjectBuf::Blank(cell.clone()),
        )
    }

    fn fresh_blank(&mut self) -> String {
        self.blank_ids += 1;
        format!("{GENERATED_PREFIX}{}", self.blank_ids)
    }

    fn emit(&mut self, subject: SubjectBuf, predicate: Locator, object: ObjectBuf) {
        self.pending
            .push_back(StatementBuf::new(subject, predicate, object));
    }

    /// Emit a statement and, when the property carried `rdf:ID`, its
    /// reification.
    fn emit_linked(
        &mut self,
        subject: SubjectBuf,
        predicate: Locator,
        object: ObjectBuf,
        reification: Option<&Locator>,
    ) {
        let Some(id) = reification else {
            self.emit(subject, predicate, object);
            return;
        };
        self.emit(subject.clone(), predicate.clone(), object.clone());
        let statement = SubjectBuf::Resource(id.clone());
        self.emit(
            statement.clone(),
            self.vocab.rdf_type.clone(),
            ObjectBuf::Resource(self.vocab.statement.clone()),
        );
        self.emit(
            statement.clone(),
            self.vocab.subject.clone(),
            subject.to_object(),
        );
        self.emit(
            statement.clone(),
            self.vocab.predicate.clone(),
            ObjectBuf::Resource(predicate),
        );
        self.emit(statement, self.vocab.object.clone(), object);
    }
}

impl StatementReader for RdfXmlReader<'_> {
    fn next_statement(&mut self) -> Result<Option<Statement<'_>>, ParseError> {
        loop {
            if let Some(statement) = self.pending.pop_front() {
                self.current = Some(statement);
                return Ok(self.current.as_ref().map(StatementBuf::as_statement));
            }
            if self.phase == Phase::Done {
                return Ok(None);
            }
            self.pump()?;
        }
    }
}

fn read_element<R>(
    xml: &NsReader<R>,
    namespace: ElementNamespace,
    start: &BytesStart<'_>,
    features: &FeatureSet,
    entities: &HashMap<String, String>,
    inherited: &HashMap<String, String>,
) -> Result<Element, String> {
    let local = utf8(start.local_name().as_ref())?.to_owned();
    let namespace = match namespace {
        ElementNamespace::Bound(namespace) => namespace,
        ElementNamespace::Unbound => match inherited.get("") {
            Some(namespace) if !namespace.is_empty() => namespace.clone(),
            _ => return Err(format!("element <{local}> is not in a namespace")),
        },
        ElementNamespace::Unknown(prefix) => inherited
            .get(&prefix)
            .cloned()
            .ok_or_else(|| format!("undeclared namespace prefix {prefix:?}"))?,
    };
    let mut element = Element {
        name: Name { namespace, local },
        base: None,
        language: None,
        syntax: SyntaxAttributes::default(),
        properties: Vec::new(),
    };

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| err.to_string())?;
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let value = attribute
            .unescape_value_with(|name| entities.get(name).map(String::as_str))
            .map_err(|err| err.to_string())?
            .into_owned();
        if let Some(reserved) = key.strip_prefix(b"xml:") {
            match reserved {
                b"lang" => element.language = Some(value),
                b"base" => element.base = Some(value),
                _ => {}
            }
            continue;
        }

        let (resolved, attribute_local) = xml.resolve_attribute(attribute.key);
        let attribute_local = utf8(attribute_local.as_ref())?;
        match resolved {
            ResolveResult::Bound(Namespace(namespace)) if namespace == RDF_NS.as_bytes() => {
                if vocab::is_syntax_attribute(attribute_local) {
                    element.syntax.set(attribute_local, value);
                } else if vocab::is_forbidden_property_attribute(attribute_local) {
                    return Err(format!("rdf:{attribute_local} is not allowed as an attribute"));
                } else {
                    element.properties.push((
                        Name {
                            namespace: RDF_NS.to_owned(),
                            local: attribute_local.to_owned(),
                        },
                        value,
                    ));
                }
            }
            ResolveResult::Bound(Namespace(namespace)) => {
                element.properties.push((
                    Name {
                        namespace: utf8(namespace)?.to_owned(),
                        local: attribute_local.to_owned(),
                    },
                    value,
                ));
            }
            ResolveResult::Unbound
                if features.get(Feature::AllowNonNsAttributes)
                    && vocab::is_syntax_attribute(attribute_local) =>
            {
                element.syntax.set(attribute_local, value);
            }
            ResolveResult::Unbound => {
                warn!(
                    "ignoring unqualified attribute {attribute_local:?} on <{}>",
                    element.name
                );
            }
            ResolveResult::Unknown(prefix) => {
                let prefix = String::from_utf8_lossy(&prefix);
                let Some(namespace) = inherited.get(&*prefix) else {
                    return Err(format!("undeclared namespace prefix {prefix:?}"));
                };
                if namespace == RDF_NS && vocab::is_syntax_attribute(attribute_local) {
                    element.syntax.set(attribute_local, value);
                } else if namespace == RDF_NS
                    && vocab::is_forbidden_property_attribute(attribute_local)
                {
                    return Err(format!("rdf:{attribute_local} is not allowed as an attribute"));
                } else {
                    element.properties.push((
                        Name {
                            namespace: namespace.clone(),
                            local: attribute_local.to_owned(),
                        },
                        value,
                    ));
                }
            }
        }
    }
    Ok(element)
}

/// Collect `<!ENTITY name "value">` declarations from an internal subset.
fn internal_entities(doctype: &str) -> HashMap<String, String> {
    let mut entities = HashMap::new();
    let mut rest = doctype;
    while let Some(found) = rest.find("<!ENTITY") {
        rest = rest.get(found + "<!ENTITY".len()..).unwrap_or_default().trim_start();
        if rest.starts_with('%') {
            continue;
        }
        let Some((name, tail)) = rest.split_once(char::is_whitespace) else {
            break;
        };
        let tail = tail.trim_start();
        let Some(quote) = tail.chars().next().filter(|ch| matches!(ch, '"' | '\'')) else {
            rest = tail;
            continue;
        };
        let Some((value, after)) = tail.get(1..).unwrap_or_default().split_once(quote) else {
            break;
        };
        entities.insert(name.to_owned(), value.to_owned());
        rest = after;
    }
    entities
}

fn resolve_in(scope: &Scope, reference: &str) -> Result<Locator, String> {
    Locator::resolve(Some(&scope.base), reference)
        .map_err(|err| format!("cannot resolve {reference:?}: {err}"))
}

fn id_locator(scope: &Scope, id: &str) -> Result<Locator, String> {
    if id.is_empty() || id.contains(['#', ' ', '/']) {
        return Err(format!("{id:?} is not a valid rdf:ID"));
    }
    resolve_in(scope, &format!("#{id}"))
}

/// Label for a document's `rdf:nodeID`.
///
/// Node IDs are XML NCNames, which never contain `:`. IDs that could be
/// mistaken for a generated label are moved under a `user:` prefix so the
/// two label spaces stay disjoint.
fn blank_label(node_id: &str) -> Result<String, String> {
    let mut chars = node_id.chars();
    let valid_start = chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_');
    let valid_rest =
        chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '.' | '-' | '_' | '\u{B7}'));
    if !(valid_start && valid_rest) {
        return Err(format!("{node_id:?} is not a valid rdf:nodeID"));
    }
    if node_id.starts_with(GENERATED_PREFIX) {
        return Ok(format!("user:{node_id}"));
    }
    Ok(node_id.to_owned())
}

/// Replace `\r\n` and lone `\r` with `\n`, as XML end-of-line handling does.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

fn plain_literal(value: String, language: Option<&str>) -> LiteralBuf {
    match language {
        Some(language) => LiteralBuf::new(value).with_language(language),
        None => LiteralBuf::new(value),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(bytes).map_err(|err| format!("name is not UTF-8: {err}"))
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(40) {
        Some((end, _)) => format!("{}...", trimmed.get(..end).unwrap_or(trimmed)),
        None => trimmed.to_owned(),
    }
}

fn to_offset<T: TryInto<u64>>(raw: T) -> u64 {
    raw.try_into().unwrap_or(u64::MAX)
}
