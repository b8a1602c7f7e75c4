//! Unit tests for the parser engine lifecycle and delivery loop.

use super::*;
use crate::{
    test_support::LineGrammar, CollectingSink, Feature, MemoryTransport, Object, ParseErrorKind, Position,
    Statement, StatementBuf, SubjectBuf,
};
use rstest::{fixture, rstest};

const THREE_STATEMENTS: &str = "\
<a> <p> <b>
<b> <p> \"text\"
_:n <p> <c>
";

#[fixture]
fn document() -> Locator {
    Locator::parse("http://example.org/dir/doc").expect("valid locator")
}

fn transport_with(document: &Locator, body: &str) -> MemoryTransport {
    MemoryTransport::new().with_document(document, body)
}

fn parse_all(
    document: &Locator,
    body: &str,
    features: FeatureSet,
) -> Result<Vec<StatementBuf>, ParseError> {
    let mut sink = CollectingSink::new();
    let mut parser = Parser::new(LineGrammar, transport_with(document, body));
    parser.configure(features, &mut sink)?;
    parser.run(document, None)?;
    drop(parser);
    Ok(sink.into_statements())
}

#[rstest]
fn new_parser_starts_created(document: Locator) {
    let parser = Parser::new(LineGrammar, transport_with(&document, ""));

    assert_eq!(parser.state(), EngineState::Created);
    assert_eq!(parser.delivered(), 0);
}

#[rstest]
fn run_before_configure_is_refused(document: Locator) {
    let mut parser = Parser::new(LineGrammar, transport_with(&document, THREE_STATEMENTS));

    let err = parser.run(&document, None).expect_err("run must be refused");

    assert_eq!(err.kind(), ParseErrorKind::InvalidState);
    assert_eq!(parser.state(), EngineState::Created);
}

#[rstest]
fn configure_twice_replaces_features(document: Locator) {
    let mut first = CollectingSink::new();
    let mut second = CollectingSink::new();
    let mut parser = Parser::new(LineGrammar, transport_with(&document, THREE_STATEMENTS));

    parser
        .configure(FeatureSet::new(), &mut first)
        .expect("first configure");
    parser
        .configure(
            FeatureSet::new().with(Feature::AllowNonNsAttributes, true),
            &mut second,
        )
        .expect("second configure");
    let report = parser.run(&document, None).expect("run succeeds");

    assert!(parser.features().get(Feature::AllowNonNsAttributes));
    assert_eq!(report.delivered, 3);
    drop(parser);
    assert!(first.statements().is_empty());
    assert_eq!(second.statements().len(), 3);
}

#[rstest]
fn second_run_is_refused(document: Locator) {
    let mut sink = CollectingSink::new();
    let mut parser = Parser::new(LineGrammar, transport_with(&document, THREE_STATEMENTS));
    parser
        .configure(FeatureSet::new(), &mut sink)
        .expect("configure");
    parser.run(&document, None).expect("first run");

    let err = parser.run(&document, None).expect_err("second run refused");

    assert_eq!(err.kind(), ParseErrorKind::InvalidState);
    assert_eq!(parser.state(), EngineState::Finished);
    assert_eq!(parser.delivered(), 3);
}

#[rstest]
#[case::syntax_error(Some("<a> <p> <b>\nnot a statement\n<c> <p> <d>\n"), ParseErrorKind::Syntax, 1)]
#[case::missing_document(None, ParseErrorKind::Io, 0)]
fn second_run_after_failure_is_refused(
    document: Locator,
    #[case] body: Option<&str>,
    #[case] first: ParseErrorKind,
    #[case] delivered: u64,
) {
    let transport = body.map_or_else(MemoryTransport::new, |body| transport_with(&document, body));
    let mut sink = CollectingSink::new();
    let mut parser = Parser::new(LineGrammar, transport);
    parser
        .configure(FeatureSet::new(), &mut sink)
        .expect("configure");
    let err = parser.run(&document, None).expect_err("first run fails");
    assert_eq!(err.kind(), first);

    let err = parser.run(&document, None).expect_err("second run refused");

    assert_eq!(err.kind(), ParseErrorKind::InvalidState);
    assert_eq!(parser.state(), EngineState::Failed);
    assert_eq!(parser.delivered(), delivered);
    drop(parser);
    assert_eq!(sink.statements().len() as u64, delivered);
}

#[rstest]
fn configure_after_run_is_refused(document: Locator) {
    let mut sink = CollectingSink::new();
    let mut again = CollectingSink::new();
    let mut parser = Parser::new(LineGrammar, transport_with(&document, THREE_STATEMENTS));
    parser
        .configure(FeatureSet::new(), &mut sink)
        .expect("configure");
    parser.run(&document, None).expect("run");

    let err = parser
        .configure(FeatureSet::new(), &mut again)
        .expect_err("configure refused");

    assert_eq!(err.operation(), "configure");
    assert_eq!(err.state(), EngineState::Finished);
}

#[rstest]
fn statements_arrive_in_document_order(document: Locator) {
    let statements =
        parse_all(&document, THREE_STATEMENTS, FeatureSet::new()).expect("parse succeeds");

    let subjects: Vec<_> = statements.iter().map(|s| s.subject.clone()).collect();
    assert_eq!(
        subjects,
        vec![
            SubjectBuf::Resource(Locator::parse("http://example.org/dir/a").expect("valid")),
            SubjectBuf::Resource(Locator::parse("http://example.org/dir/b").expect("valid")),
            SubjectBuf::Blank("n".into()),
        ]
    );
}

#[rstest]
fn empty_document_delivers_nothing(document: Locator) {
    let mut calls = 0_u32;
    let mut sink = |_: &Statement<'_>| {
        calls += 1;
        Flow::Continue
    };
    let mut parser = Parser::new(LineGrammar, transport_with(&document, "# nothing here\n"));
    parser
        .configure(FeatureSet::new(), &mut sink)
        .expect("configure");

    let report = parser.run(&document, None).expect("run succeeds");

    assert_eq!(
        report,
        RunReport {
            delivered: 0,
            stopped: false
        }
    );
    drop(parser);
    assert_eq!(calls, 0);
}

#[rstest]
#[case(1)]
#[case(2)]
fn stop_ends_the_run_successfully(document: Locator, #[case] limit: usize) {
    let mut sink = CollectingSink::with_limit(limit);
    let mut parser = Parser::new(LineGrammar, transport_with(&document, THREE_STATEMENTS));
    parser
        .configure(FeatureSet::new(), &mut sink)
        .expect("configure");

    let report = parser.run(&document, None).expect("stopping is not an error");

    assert!(report.stopped);
    assert_eq!(report.delivered, limit as u64);
    assert_eq!(parser.state(), EngineState::Finished);
    drop(parser);
    assert_eq!(sink.statements().len(), limit);
}

#[rstest]
fn statements_before_a_syntax_error_stay_delivered(document: Locator) {
    let body = "<a> <p> <b>\n<b> <p> <c>\nnot a statement\n<c> <p> <d>\n";
    let mut sink = CollectingSink::new();
    let mut parser = Parser::new(LineGrammar, transport_with(&document, body));
    parser
        .configure(FeatureSet::new(), &mut sink)
        .expect("configure");

    let err = parser.run(&document, None).expect_err("malformed line");

    assert_eq!(err.kind(), ParseErrorKind::Syntax);
    assert_eq!(err.position(), Some(Position::new(24)));
    assert_eq!(parser.state(), EngineState::Failed);
    assert_eq!(parser.delivered(), 2);
    drop(parser);
    assert_eq!(sink.statements().len(), 2);
}

#[rstest]
fn missing_document_is_an_io_failure(document: Locator) {
    let mut sink = CollectingSink::new();
    let mut parser = Parser::new(LineGrammar, MemoryTransport::new());
    parser
        .configure(FeatureSet::new(), &mut sink)
        .expect("configure");

    let err = parser.run(&document, None).expect_err("nothing to open");

    assert_eq!(err.kind(), ParseErrorKind::Io);
    assert_eq!(parser.state(), EngineState::Failed);
    assert_eq!(parser.delivered(), 0);
}

#[rstest]
fn base_defaults_to_the_document(document: Locator) {
    let statements =
        parse_all(&document, "<x> <p> <#frag>\n", FeatureSet::new()).expect("parse succeeds");

    let object = statements[0].object.as_object();
    assert_eq!(
        object,
        Object::Resource(&Locator::parse("http://example.org/dir/doc#frag").expect("valid"))
    );
}

#[rstest]
fn explicit_base_overrides_the_document(document: Locator) {
    let base = Locator::parse("http://other.example/root/").expect("valid");
    let mut sink = CollectingSink::new();
    let mut parser = Parser::new(LineGrammar, transport_with(&document, "<x> <p> <y>\n"));
    parser
        .configure(FeatureSet::new(), &mut sink)
        .expect("configure");

    parser.run(&document, Some(&base)).expect("run succeeds");
    drop(parser);

    let subject = &sink.statements()[0].subject;
    assert_eq!(
        subject,
        &SubjectBuf::Resource(Locator::parse("http://other.example/root/x").expect("valid"))
    );
}

#[rstest]
fn scanning_skips_leading_prose(document: Locator) {
    let prefixed = format!("Some prose.\nMore prose <here>.\n@root\n{THREE_STATEMENTS}");
    let scanning = FeatureSet::new().with(Feature::Scanning, true);

    let plain = parse_all(&document, THREE_STATEMENTS, FeatureSet::new()).expect("plain parse");
    let scanned = parse_all(&document, &prefixed, scanning).expect("scanned parse");
    let unscanned = parse_all(&document, &prefixed, FeatureSet::new()).expect_err("prose rejected");

    assert_eq!(plain, scanned);
    assert_eq!(unscanned.kind(), ParseErrorKind::Syntax);
    assert_eq!(unscanned.position(), Some(Position::new(0)));
}

#[rstest]
fn scanning_without_a_root_fails(document: Locator) {
    let scanning = FeatureSet::new().with(Feature::Scanning, true);

    let err = parse_all(&document, "only prose\n", scanning).expect_err("no root");

    assert_eq!(err.kind(), ParseErrorKind::RootNotFound);
    assert_eq!(err.position(), Some(Position::new(11)));
}
