//! Integration tests for end-to-end type checking.
//!
//! These tests verify that the complete pipeline works correctly from source
//! code through tokenization, parsing and type checking, including interface
//! dispatch and error reporting.

use std::rc::Rc;

use verve::{
    ast::{
        ast::{walk, Node, NodeKind},
        types::Type,
    },
    errors::errors::{ErrorImpl, FatalError},
    lexer::lexer::tokenize,
    parser::parser::{parse, Program},
    type_checker::type_checker::{type_check, CheckerOptions},
};

fn run_with(source: &str, options: CheckerOptions) -> (Program, Result<Type, FatalError>) {
    let tokens = tokenize(source.to_string(), Some("main.vv".to_string())).unwrap();
    let mut program = parse(tokens, Rc::new("main.vv".to_string())).unwrap();
    let result = type_check(&mut program.body, &program.env, source, options);
    (program, result)
}

fn run(source: &str) -> (Program, Result<Type, FatalError>) {
    run_with(source, CheckerOptions::default())
}

fn type_of(source: &str) -> String {
    let (_, result) = run(source);
    match result {
        Ok(ty) => ty.to_string(),
        Err(fatal) => panic!("unexpected type error:\n{}", fatal.report),
    }
}

fn error_name(source: &str) -> String {
    let (_, result) = run(source);
    match result {
        Ok(ty) => panic!("expected a type error, got `{}`", ty),
        Err(fatal) => fatal.error.get_error_name().to_string(),
    }
}

fn top_level(program: &Program) -> &Vec<Node> {
    match &program.body.kind {
        NodeKind::Block(nodes) => nodes,
        _ => panic!("program body is not a block"),
    }
}

const ADD: &str = "fn add(a: Int, b: Int): Int { a + b }\n";

const SHOW: &str = "
interface Show<T> { fn show(x: T): String }
enum Point { Point(Int, Int) }
implementation Show<Int> { fn show(x) { \"int\" } }
implementation Show<Point> { fn show(p) { \"point\" } }
";

const OPTION: &str = "enum Option<T> { Some(T), None }\n";

#[test]
fn test_add_is_int() {
    assert_eq!(type_of(&format!("{}add(2, 3)", ADD)), "Int");
}

#[test]
fn test_add_with_string_argument() {
    let source = format!("{}add(2, \"x\")", ADD);
    let (_, result) = run(&source);
    let fatal = result.unwrap_err();

    assert_eq!(fatal.to_string(), "type error");
    assert_eq!(
        *fatal.error.get_internal_error(),
        ErrorImpl::ArgumentTypeError {
            function: "add".to_string(),
            expected: "Int".to_string(),
            received: "String".to_string(),
            position: 2,
        }
    );
    assert_eq!(fatal.error.get_position().0, 45);

    let lines: Vec<&str> = fatal.report.lines().collect();
    assert_eq!(
        lines[0],
        "Error: ArgumentTypeError (Expected `Int` but got `String` on arg #2 for function `add`)"
    );
    assert_eq!(lines[1], "-> main.vv");
    assert_eq!(lines[3], "2 | add(2, \"x\")");
    assert_eq!(lines[4], "  | -------^");
}

#[test]
fn test_generic_instantiation_is_per_call() {
    let source = "fn identity<T>(x: T): T { x }\nidentity(1)\nidentity(2.5)";
    let (program, result) = run(source);

    assert_eq!(result.unwrap().to_string(), "Float");
    let nodes = top_level(&program);
    assert_eq!(nodes[1].get_type().unwrap().to_string(), "Int");
    assert_eq!(nodes[2].get_type().unwrap().to_string(), "Float");
}

#[test]
fn test_generic_return_through_list() {
    let source = "fn twice<T>(x: T): List<T> { [x, x] }\ntwice(\"a\")";

    assert_eq!(type_of(source), "List<String>");
}

#[test]
fn test_generic_argument_mismatch() {
    let source = "fn same<T>(a: T, b: T): T { a }\nsame(1, \"b\")";

    assert_eq!(error_name(source), "ArgumentTypeError");
}

#[test]
fn test_interface_dispatch() {
    let source = format!("{}show(5)\nshow(Point(1, 2))", SHOW);
    let (program, result) = run(&source);

    assert_eq!(result.unwrap().to_string(), "String");

    let symbols: Vec<String> = top_level(&program)
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Call(call) => call.dispatch.as_ref().map(|d| d.symbol.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(symbols, vec!["showInt".to_string(), "showPoint".to_string()]);

    // The callee keeps its source name
    let NodeKind::Call(call) = &top_level(&program).last().unwrap().kind else {
        panic!("expected a call");
    };
    assert!(matches!(&call.callee.kind, NodeKind::Identifier(name) if name == "show"));
    let dispatch = call.dispatch.as_ref().unwrap();
    assert_eq!(dispatch.target.params[0].to_string(), "Point");
}

#[test]
fn test_missing_implementation() {
    let source = format!("{}show(2.5)", SHOW);
    let (_, result) = run(&source);
    let fatal = result.unwrap_err();

    assert_eq!(
        *fatal.error.get_internal_error(),
        ErrorImpl::MissingImplementation {
            interface: "Show".to_string(),
            type_: "Float".to_string(),
        }
    );
}

#[test]
fn test_implementation_body_is_checked() {
    let source = "
interface Show<T> { fn show(x: T): String }
implementation Show<Int> { fn show(x) { x } }
";

    assert_eq!(error_name(source), "ReturnTypeMismatch");
}

#[test]
fn test_list_of_ints() {
    assert_eq!(type_of("[1, 2, 3]"), "List<Int>");
    assert_eq!(type_of("[]"), "List<T>");
    assert_eq!(type_of("[[], [1]]"), "List<List<Int>>");
}

#[test]
fn test_mixed_list() {
    let (_, result) = run("[1, \"a\"]");
    let fatal = result.unwrap_err();

    assert_eq!(
        *fatal.error.get_internal_error(),
        ErrorImpl::MixedListTypeError {
            found: "String".to_string(),
            inferred: "Int".to_string(),
        }
    );
    assert_eq!(fatal.error.get_position().0, 4);
}

#[test]
fn test_cons_list() {
    assert_eq!(type_of("Cons(1, Cons(2, Nil))"), "List<Int>");
    assert_eq!(error_name("Cons(1, Cons(\"a\", Nil))"), "ArgumentTypeError");
}

#[test]
fn test_if_else_widening() {
    assert_eq!(type_of("if 1 { 2 } else { 3 }"), "Int");
    assert_eq!(type_of(&format!("{}if 1 {{ Some(1) }} else {{ None }}", OPTION)), "Option<Int>");
    assert_eq!(type_of(&format!("{}if 1 {{ None }} else {{ Some(1) }}", OPTION)), "Option<Int>");
    assert_eq!(error_name("if 1 { 2 } else { \"a\" }"), "BranchTypeMismatch");
}

#[test]
fn test_widening_keeps_generic_parameters_opaque() {
    let source = format!(
        "{}fn f<T>(x: T): Int {{ let o = if 1 {{ None }} else {{ Some(1) }} {{ x + 1 }} }}",
        OPTION
    );
    let (_, result) = run(&source);
    let fatal = result.unwrap_err();

    assert_eq!(fatal.error.get_error_name(), "OperandTypeError");
    assert!(fatal.report.contains("found `T` on the left side"));

    // Each use of `None` gets its own element type
    let source = format!(
        "{}let a = [None, Some(1)], b = [None, Some(\"s\")] {{ b }}",
        OPTION
    );
    assert_eq!(type_of(&source), "List<Option<String>>");
}

#[test]
fn test_match_binds_pattern_variables() {
    let source = format!(
        "{}fn unwrap_or(o: Option<Int>, d: Int): Int {{ match o {{ Some(x) => x, None => d }} }}\nunwrap_or(Some(1), 0)",
        OPTION
    );

    assert_eq!(type_of(&source), "Int");
}

#[test]
fn test_match_mixed_cases() {
    let source = format!("{}match Some(1) {{ Some(x) => x, None => \"none\" }}", OPTION);

    assert_eq!(error_name(&source), "MixedMatchTypeError");
}

#[test]
fn test_let_pattern() {
    assert_eq!(type_of(&format!("{}let Some(x) = Some(5) {{ x + 1 }}", OPTION)), "Int");
    assert_eq!(error_name(&format!("{}let Some(x) = 5 {{ x }}", OPTION)), "PatternMismatch");
}

#[test]
fn test_arity_errors() {
    assert_eq!(error_name(&format!("{}add(1)", ADD)), "ArityError");
    assert_eq!(error_name(&format!("{}add(1, 2, 3)", ADD)), "ArityError");
    assert_eq!(error_name(&format!("{}Some(1, 2)", OPTION)), "ArityError");
}

#[test]
fn test_undefined_constructor() {
    assert_eq!(error_name("Missing(1)"), "UndefinedConstructor");
}

#[test]
fn test_recursion_limit() {
    let source = format!("{}1{}", "[".repeat(100), "]".repeat(100));

    let (_, result) = run_with(&source, CheckerOptions { max_depth: 50 });
    let fatal = result.unwrap_err();
    assert_eq!(*fatal.error.get_internal_error(), ErrorImpl::RecursionLimit { limit: 50 });

    let (_, result) = run(&source);
    assert!(result.is_ok());
}

#[test]
fn test_every_node_is_annotated() {
    let source = format!(
        "{}{}
fn pick(o: Option<Int>): Int {{
    match o {{ Some(v) => v, None => -1 }}
}}
let a = pick(Some(2)), Some(b) = Some(a) {{
    if a > b {{ show(a) }} else {{ \"small\" }}
}}
[1, 2]",
        OPTION, SHOW
    );
    let (program, result) = run(&source);

    assert_eq!(result.unwrap().to_string(), "List<Int>");

    let mut missing = vec![];
    walk(&program.body, &mut |node| {
        if node.get_type().is_none() {
            missing.push(node.kind_name());
        }
    });
    assert!(missing.is_empty(), "nodes without a type: {:?}", missing);
}
