use rox::ast::Stmt;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::resolver::Resolver;
use rox::scanner::scan;

fn parse(source: &str) -> Vec<Stmt> {
    let (tokens, errors) = scan(source);
    assert!(errors.is_empty(), "scan errors: {:?}", errors);

    Parser::new(&tokens).parse().expect("program parses")
}

fn resolve_errors(source: &str) -> Vec<String> {
    let program = parse(source);
    let mut interpreter = Interpreter::with_output(Box::new(std::io::sink()));

    match Resolver::new(&mut interpreter).resolve(&program) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}

#[test]
fn valid_program_resolves_cleanly() {
    let errors = resolve_errors(
        "var a = 1;
         fun f(x) { var y = x + a; return y; }
         class A { init() { this.v = 1; } get() { return this.v; } }
         class B < A { get() { return super.get() + 1; } }",
    );

    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn reading_local_in_its_own_initializer() {
    assert_eq!(
        resolve_errors("{ var a = a; }"),
        vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn global_self_reference_is_left_to_runtime() {
    assert!(resolve_errors("var a = a;").is_empty());
}

#[test]
fn duplicate_local_declaration() {
    assert_eq!(
        resolve_errors("fun f() { var a = 1;\n var a = 2; }"),
        vec!["[line 2] Error at 'a': Already a variable with this name in this scope."]
    );
}

#[test]
fn duplicate_parameter() {
    assert_eq!(
        resolve_errors("fun f(a, a) {}"),
        vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
    );
}

#[test]
fn globals_may_be_redeclared() {
    assert!(resolve_errors("var a = 1; var a = 2;").is_empty());
}

#[test]
fn misplaced_return_this_and_super() {
    assert_eq!(
        resolve_errors("return 1;\nprint this;\nprint super.x;\nclass A { f() { super.f(); } }"),
        vec![
            "[line 1] Error at 'return': Can't return from top-level code.",
            "[line 2] Error at 'this': Can't use 'this' outside of a class.",
            "[line 3] Error at 'super': Can't use 'super' outside of a class.",
            "[line 4] Error at 'super': Can't use 'super' in a class with no superclass.",
        ]
    );
}

#[test]
fn returning_a_value_from_init() {
    assert_eq!(
        resolve_errors("class A { init() { return 1; } }"),
        vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
    );
}

#[test]
fn bare_return_in_init_is_allowed() {
    assert!(resolve_errors("class A { init() { return; } }").is_empty());
}

#[test]
fn class_inheriting_from_itself() {
    assert_eq!(
        resolve_errors("class Foo < Foo {}"),
        vec!["[line 1] Error at 'Foo': A class can't inherit from itself."]
    );
}

#[test]
fn resolution_is_idempotent() {
    let program = parse(
        "var g = 0;
         fun outer() {
           var a = 1;
           fun inner() { a = a + g; return a; }
           { var b = a; print b; }
           return inner;
         }
         class P { m() { return this; } }
         class C < P { m() { return super.m(); } }",
    );

    let mut interpreter = Interpreter::with_output(Box::new(std::io::sink()));

    Resolver::new(&mut interpreter)
        .resolve(&program)
        .expect("first pass");
    let first = interpreter.locals().clone();

    Resolver::new(&mut interpreter)
        .resolve(&program)
        .expect("second pass");
    let second = interpreter.locals().clone();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn distances_count_scope_hops() {
    let program = parse("fun f() { var a = 1; { { print a; } } }");
    let mut interpreter = Interpreter::with_output(Box::new(std::io::sink()));

    Resolver::new(&mut interpreter)
        .resolve(&program)
        .expect("resolves");

    // `a` lives in the function scope; the print sits two blocks deeper.
    let mut depths: Vec<usize> = interpreter.locals().values().copied().collect();
    depths.sort();
    assert_eq!(depths, vec![2]);
}
