//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Function and extern declarations
//! - Interfaces, implementations and enums
//! - Expressions and operator precedence
//! - `if`, `let` and `match`
//! - Error cases

use std::rc::Rc;

use super::parser::{parse, Program};
use crate::{
    ast::{
        ast::{Node, NodeKind, NumberLiteral},
        types::Type,
    },
    errors::errors::Error,
    lexer::{lexer::tokenize, tokens::TokenKind},
};

fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source.to_string(), Some("test.vv".to_string()))?;
    parse(tokens, Rc::new("test.vv".to_string()))
}

fn body(program: &Program) -> &Vec<Node> {
    match &program.body.kind {
        NodeKind::Block(nodes) => nodes,
        _ => panic!("program body is not a block"),
    }
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_source("fn add(a: Int, b: Int): Int { a + b }").unwrap();

    let nodes = body(&program);
    assert_eq!(nodes.len(), 1);
    let NodeKind::Function(function) = &nodes[0].kind else {
        panic!("expected a function");
    };
    assert_eq!(function.name, "add");
    assert_eq!(function.params.len(), 2);
    assert_eq!(function.params[1].name, "b");

    let signature = program.env.get("add").unwrap();
    assert_eq!(signature.to_string(), "fn(Int, Int): Int");
}

#[test]
fn test_parse_generic_function() {
    let program = parse_source("fn identity<T>(x: T): T { x }").unwrap();

    let signature = program.env.get("identity").unwrap();
    let function = signature.as_function().unwrap();
    assert_eq!(function.generics, vec!["T".to_string()]);
    assert_eq!(function.params[0], Type::generic("T"));
    assert_eq!(function.return_type, Type::generic("T"));
}

#[test]
fn test_parse_extern_declaration() {
    let program = parse_source("extern fn print(s: String): Void;").unwrap();

    assert!(body(&program).is_empty());
    assert_eq!(program.env.get("print").unwrap().to_string(), "fn(String): Void");
}

#[test]
fn test_parse_function_type_annotation() {
    let program = parse_source("extern fn apply(f: fn(Int): Int, x: Int): Int").unwrap();

    assert_eq!(
        program.env.get("apply").unwrap().to_string(),
        "fn(fn(Int): Int, Int): Int"
    );
}

#[test]
fn test_parse_enum_declaration() {
    let program = parse_source("enum Option<T> { Some(T), None }").unwrap();

    let Some(Type::Enum(option)) = program.types.get("Option") else {
        panic!("expected Option in the type namespace");
    };
    assert_eq!(option.generics, vec!["T".to_string()]);
    assert_eq!(option.constructors, vec!["Some".to_string(), "None".to_string()]);

    let some = program.env.get("Some").unwrap();
    let constructor = some.as_constructor().unwrap();
    assert_eq!(constructor.signature.params, vec![Type::generic("T")]);
    assert!(program.env.get("None").unwrap().as_constructor().is_some());
}

#[test]
fn test_parse_recursive_enum() {
    let program = parse_source("enum Tree { Leaf, Node(Tree, Int, Tree) }").unwrap();

    let node = program.env.get("Node").unwrap();
    let constructor = node.as_constructor().unwrap();
    assert_eq!(constructor.signature.params.len(), 3);
    assert_eq!(constructor.signature.params[0], *program.types.get("Tree").unwrap());
}

#[test]
fn test_parse_interface_and_implementation() {
    let source = "
        interface Show<T> { fn show(x: T): String }
        implementation Show<Int> { fn show(x) { \"int\" } }
    ";
    let program = parse_source(source).unwrap();

    let Some(Type::Interface(show)) = program.types.get("Show") else {
        panic!("expected Show in the type namespace");
    };
    assert_eq!(show.generic, "T");
    assert!(show.is_implemented_by(&Type::basic("Int")));
    assert!(!show.is_implemented_by(&Type::basic("Float")));

    let method = program.env.get("show").unwrap();
    let method = method.as_function().unwrap();
    assert_eq!(method.interface().unwrap().name, "Show");

    let implementation = program.env.get("showInt").unwrap();
    assert_eq!(implementation.to_string(), "fn(Int): String");

    let nodes = body(&program);
    assert_eq!(nodes.len(), 1);
    let NodeKind::Function(function) = &nodes[0].kind else {
        panic!("expected the implementation function");
    };
    assert_eq!(function.name, "showInt");
}

#[test]
fn test_parse_duplicate_implementation() {
    let source = "
        interface Show<T> { fn show(x: T): String }
        implementation Show<Int> { fn show(x) { \"a\" } }
        implementation Show<Int> { fn show(x) { \"b\" } }
    ";
    let error = parse_source(source).unwrap_err();

    assert_eq!(error.get_error_name(), "DuplicateImplementation");
}

#[test]
fn test_parse_unknown_interface() {
    let error = parse_source("implementation Show<Int> { }").unwrap_err();

    assert_eq!(error.get_error_name(), "UnknownInterface");
}

#[test]
fn test_parse_unknown_method() {
    let source = "
        interface Show<T> { fn show(x: T): String }
        implementation Show<Int> { fn display(x) { \"a\" } }
    ";
    let error = parse_source(source).unwrap_err();

    assert_eq!(error.get_error_name(), "UnknownMethod");
}

#[test]
fn test_parse_interface_with_two_parameters() {
    let error = parse_source("interface Convert<A, B> { fn convert(a: A): B }").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_unknown_type() {
    let error = parse_source("fn f(x: Missing): Int { 1 }").unwrap_err();

    assert_eq!(error.get_error_name(), "UnknownType");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_parse_operator_precedence() {
    let program = parse_source("1 + 2 * 3").unwrap();

    let NodeKind::BinaryOperation(add) = &body(&program)[0].kind else {
        panic!("expected a binary operation");
    };
    assert_eq!(add.operator, TokenKind::Plus);
    assert!(matches!(add.left.kind, NodeKind::Number(NumberLiteral::Int(1))));
    let NodeKind::BinaryOperation(mul) = &add.right.kind else {
        panic!("expected multiplication on the right");
    };
    assert_eq!(mul.operator, TokenKind::Star);
}

#[test]
fn test_parse_unary_binds_tighter() {
    let program = parse_source("-1 + 2").unwrap();

    let NodeKind::BinaryOperation(add) = &body(&program)[0].kind else {
        panic!("expected a binary operation");
    };
    assert!(matches!(add.left.kind, NodeKind::UnaryOperation(_)));
}

#[test]
fn test_parse_float_literal() {
    let program = parse_source("3.5").unwrap();

    assert!(matches!(
        body(&program)[0].kind,
        NodeKind::Number(NumberLiteral::Float(value)) if value == 3.5
    ));
}

#[test]
fn test_parse_number_overflow() {
    let error = parse_source("99999999999999999999").unwrap_err();

    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_parse_call_and_constructor() {
    let program = parse_source("f(1, Some(2), None)").unwrap();

    let NodeKind::Call(call) = &body(&program)[0].kind else {
        panic!("expected a call");
    };
    assert!(matches!(&call.callee.kind, NodeKind::Identifier(name) if name == "f"));
    assert_eq!(call.arguments.len(), 3);
    assert!(matches!(
        &call.arguments[1].kind,
        NodeKind::Constructor(ctor) if ctor.name == "Some" && ctor.arguments.len() == 1
    ));
    assert!(matches!(
        &call.arguments[2].kind,
        NodeKind::Constructor(ctor) if ctor.name == "None" && ctor.arguments.is_empty()
    ));
    assert!(call.dispatch.is_none());
}

#[test]
fn test_parse_list() {
    let program = parse_source("[1, 2, 3]").unwrap();

    let NodeKind::List(items) = &body(&program)[0].kind else {
        panic!("expected a list");
    };
    assert_eq!(items.len(), 3);
}

#[test]
fn test_parse_if_else_chain() {
    let program = parse_source("if 1 { 2 } else if 3 { 4 } else { 5 }").unwrap();

    let NodeKind::If(if_node) = &body(&program)[0].kind else {
        panic!("expected an if");
    };
    let else_body = if_node.else_body.as_ref().unwrap();
    assert!(matches!(else_body.kind, NodeKind::If(_)));
}

#[test]
fn test_parse_let() {
    let program = parse_source("let x = 1, Some(y) = z { x + y }").unwrap();

    let NodeKind::Let(let_node) = &body(&program)[0].kind else {
        panic!("expected a let");
    };
    assert_eq!(let_node.assignments.len(), 2);
    let NodeKind::Assignment(second) = &let_node.assignments[1].kind else {
        panic!("expected an assignment");
    };
    let NodeKind::Pattern(pattern) = &second.left.kind else {
        panic!("expected a pattern on the left");
    };
    assert_eq!(pattern.constructor, "Some");
    assert_eq!(pattern.bindings[0].name, "y");
    assert!(matches!(let_node.block.kind, NodeKind::Block(_)));
}

#[test]
fn test_parse_match() {
    let program = parse_source("match x { Some(y) => y, None => 0 }").unwrap();

    let NodeKind::Match(match_node) = &body(&program)[0].kind else {
        panic!("expected a match");
    };
    assert_eq!(match_node.cases.len(), 2);
    assert!(matches!(match_node.cases[1].kind, NodeKind::Case(_)));
}

#[test]
fn test_parse_spans() {
    let program = parse_source("add(2, \"x\")").unwrap();

    let call = &body(&program)[0];
    assert_eq!(call.span.start.0, 0);
    assert_eq!(call.span.end.0, 11);
    let NodeKind::Call(inner) = &call.kind else {
        panic!("expected a call");
    };
    assert_eq!(inner.arguments[1].span.start.0, 7);
}

#[test]
fn test_parse_unexpected_token() {
    let error = parse_source("fn (").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_unclosed_block() {
    let error = parse_source("{ 1").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
}
