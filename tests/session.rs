mod common;

use std::io::Cursor;

use common::Harness;
use rox::error::LoxError;
use rox::session::{decode_source, RunStatus, EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};

#[test]
fn clean_program_exits_zero() {
    let mut harness = Harness::new();

    assert_eq!(harness.run("print \"ok\";"), RunStatus::Ok);
    assert!(!harness.session.had_error());
    assert!(!harness.session.had_runtime_error());
    assert_eq!(harness.session.exit_code(), 0);
}

#[test]
fn syntax_error_maps_to_65_and_nothing_runs() {
    let mut harness = Harness::new();

    assert_eq!(
        harness.run("print \"before\";\nprint ;"),
        RunStatus::StaticError
    );
    assert!(harness.session.had_error());
    assert_eq!(harness.session.exit_code(), EXIT_STATIC_ERROR);
    assert!(harness.lines().is_empty());
    assert_eq!(
        harness.reporter.rendered(),
        vec!["[line 2] Error at ';': Expect expression."]
    );
}

#[test]
fn scan_and_parse_errors_are_reported_together() {
    let mut harness = Harness::new();

    assert_eq!(harness.run("var a = @;\nprint 1"), RunStatus::StaticError);

    let rendered = harness.reporter.rendered();
    assert_eq!(rendered[0], "[line 1] Error: Unexpected character: @");
    assert!(rendered.len() >= 2, "{:?}", rendered);
    assert_eq!(
        rendered.last().map(String::as_str),
        Some("[line 2] Error at end: Expect ';' after value.")
    );
}

#[test]
fn scan_error_alone_still_prevents_execution() {
    let mut harness = Harness::new();

    assert_eq!(harness.run("print 1; #"), RunStatus::StaticError);
    assert!(harness.lines().is_empty());
    assert_eq!(harness.session.exit_code(), EXIT_STATIC_ERROR);
}

#[test]
fn resolve_error_maps_to_65() {
    let mut harness = Harness::new();

    assert_eq!(harness.run("class Foo < Foo {}"), RunStatus::StaticError);
    assert_eq!(harness.session.exit_code(), EXIT_STATIC_ERROR);
    assert_eq!(
        harness.reporter.rendered(),
        vec!["[line 1] Error at 'Foo': A class can't inherit from itself."]
    );
}

#[test]
fn runtime_error_maps_to_70() {
    let mut harness = Harness::new();

    assert_eq!(harness.run("print 1;\nprint -nil;"), RunStatus::RuntimeError);
    assert!(harness.session.had_runtime_error());
    assert!(!harness.session.had_error());
    assert_eq!(harness.session.exit_code(), EXIT_RUNTIME_ERROR);
    assert_eq!(harness.lines(), vec!["1"]);
    assert_eq!(
        harness.reporter.rendered(),
        vec!["Operand of '-' must be a number, got nil.\n[line 2]"]
    );
}

#[test]
fn static_errors_take_precedence_in_exit_code() {
    let mut harness = Harness::new();

    harness.run("nil();");
    harness.run("print ;");

    assert_eq!(harness.session.exit_code(), EXIT_STATIC_ERROR);

    harness.session.reset_errors();
    assert_eq!(harness.session.exit_code(), 0);
}

#[test]
fn globals_persist_between_runs() {
    let mut harness = Harness::new();

    harness.run("var count = 1; fun bump() { count = count + 1; }");
    harness.run("bump(); bump();");
    harness.run("print count;");

    assert_eq!(harness.lines(), vec!["3"]);
}

#[test]
fn closures_from_earlier_runs_still_resolve() {
    let mut harness = Harness::new();

    harness.run("fun make() { var n = 0; fun inc() { n = n + 1; return n; } return inc; }");
    harness.run("var f = make();");
    harness.run("f();");
    harness.run("print f();");

    assert_eq!(harness.lines(), vec!["2"]);
}

#[test]
fn prompt_keeps_state_and_recovers_from_errors() {
    let mut harness = Harness::new();
    let input = Cursor::new("var a = 1;\nprint a +;\nprint nope;\na = a + 1;\nprint a;\n");
    let mut prompt: Vec<u8> = Vec::new();

    harness
        .session
        .run_prompt(input, &mut prompt)
        .expect("in-memory I/O");

    assert_eq!(harness.lines(), vec!["2"]);
    assert_eq!(harness.reporter.errors().len(), 2);
    assert_eq!(harness.session.exit_code(), 0);

    let prompt = String::from_utf8(prompt).expect("utf-8 prompt");
    assert_eq!(prompt.matches("> ").count(), 6);
}

#[test]
fn prompt_on_empty_input_just_prompts_once() {
    let mut harness = Harness::new();
    let mut prompt: Vec<u8> = Vec::new();

    harness
        .session
        .run_prompt(Cursor::new(""), &mut prompt)
        .expect("in-memory I/O");

    assert_eq!(String::from_utf8(prompt).expect("utf-8 prompt"), "> \n");
    assert!(harness.lines().is_empty());
}

#[test]
fn diagnostics_know_their_stage() {
    let mut harness = Harness::new();

    harness.run("print 1 +;");
    harness.run("print nil.field;");

    let errors = harness.reporter.errors();
    assert_eq!(errors.len(), 2);

    assert!(errors[0].is_static());
    assert_eq!(errors[0].message(), "Expect expression.");

    assert!(!errors[1].is_static());
    assert_eq!(errors[1].message(), "Only instances have properties.");
}

#[test]
fn source_bytes_must_be_utf8() {
    assert_eq!(
        decode_source(b"print 1;".to_vec()).expect("valid source"),
        "print 1;"
    );

    let err = decode_source(vec![b'"', 0xff, b'"']).expect_err("invalid byte");
    assert!(matches!(err, LoxError::Utf8(_)));
    assert!(!err.is_static());
}
