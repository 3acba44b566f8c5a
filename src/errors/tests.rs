//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip, OperandSide};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.vv".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
}

#[test]
fn test_arity_error() {
    let error = Error::new(
        ErrorImpl::ArityError {
            function: "add".to_string(),
            expected: 2,
            received: 3,
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "ArityError");
    assert_eq!(
        error.get_tip().to_string(),
        "Wrong number of arguments for `add`: expected 2, received 3"
    );
}

#[test]
fn test_argument_type_error_tip() {
    let error = Error::new(
        ErrorImpl::ArgumentTypeError {
            function: "add".to_string(),
            expected: "Int".to_string(),
            received: "String".to_string(),
            position: 2,
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "ArgumentTypeError");
    assert_eq!(
        error.get_tip().to_string(),
        "Expected `Int` but got `String` on arg #2 for function `add`"
    );
}

#[test]
fn test_operand_type_error_names_side() {
    let error = Error::new(
        ErrorImpl::OperandTypeError {
            side: OperandSide::Right,
            found: "String".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "OperandTypeError");
    assert!(error.get_tip().to_string().contains("right side"));
}

#[test]
fn test_mixed_list_error() {
    let error = Error::new(
        ErrorImpl::MixedListTypeError {
            found: "String".to_string(),
            inferred: "Int".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "MixedListTypeError");
}

#[test]
fn test_constructor_errors_are_distinct() {
    let unknown = Error::new(
        ErrorImpl::UnknownConstructor {
            constructor: "Foo".to_string(),
        },
        at(0),
    );
    let undefined = Error::new(
        ErrorImpl::UndefinedConstructor {
            constructor: "Foo".to_string(),
        },
        at(0),
    );

    assert_eq!(unknown.get_error_name(), "UnknownConstructor");
    assert_eq!(undefined.get_error_name(), "UndefinedConstructor");
}

#[test]
fn test_empty_match_error() {
    let error = Error::new(ErrorImpl::EmptyMatch, at(0));

    assert_eq!(error.get_error_name(), "EmptyMatch");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_internal_error_display() {
    let error = ErrorImpl::RecursionLimit { limit: 8 };
    assert_eq!(error.to_string(), "nesting exceeds 8");
}
