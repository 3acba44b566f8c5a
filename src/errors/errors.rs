use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::UnknownInterface { .. } => "UnknownInterface",
            ErrorImpl::UnknownMethod { .. } => "UnknownMethod",
            ErrorImpl::DuplicateImplementation { .. } => "DuplicateImplementation",
            ErrorImpl::ArityError { .. } => "ArityError",
            ErrorImpl::UnknownTypeError { .. } => "UnknownTypeError",
            ErrorImpl::ArgumentTypeError { .. } => "ArgumentTypeError",
            ErrorImpl::MissingImplementation { .. } => "MissingImplementation",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::MissingSignature { .. } => "MissingSignature",
            ErrorImpl::OperandTypeError { .. } => "OperandTypeError",
            ErrorImpl::BranchTypeMismatch { .. } => "BranchTypeMismatch",
            ErrorImpl::MixedListTypeError { .. } => "MixedListTypeError",
            ErrorImpl::MixedMatchTypeError { .. } => "MixedMatchTypeError",
            ErrorImpl::EmptyMatch => "EmptyMatch",
            ErrorImpl::UnknownConstructor { .. } => "UnknownConstructor",
            ErrorImpl::UndefinedConstructor { .. } => "UndefinedConstructor",
            ErrorImpl::PatternMismatch { .. } => "PatternMismatch",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::RecursionLimit { .. } => "RecursionLimit",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::UnknownInterface { interface } => {
                ErrorTip::Suggestion(format!("Cannot find interface `{}` for implementation", interface))
            }
            ErrorImpl::UnknownMethod { interface, method } => ErrorTip::Suggestion(format!(
                "Interface `{}` does not declare a method `{}`",
                interface, method
            )),
            ErrorImpl::DuplicateImplementation { interface, type_ } => ErrorTip::Suggestion(format!(
                "Interface `{}` is already implemented for `{}`",
                interface, type_
            )),
            ErrorImpl::ArityError { function, expected, received } => ErrorTip::Suggestion(format!(
                "Wrong number of arguments for `{}`: expected {}, received {}",
                function, expected, received
            )),
            ErrorImpl::UnknownTypeError { expression } => {
                ErrorTip::Suggestion(format!("Unknown type for expression `{}`", expression))
            }
            ErrorImpl::ArgumentTypeError { function, expected, received, position } => {
                ErrorTip::Suggestion(format!(
                    "Expected `{}` but got `{}` on arg #{} for function `{}`",
                    expected, received, position, function
                ))
            }
            ErrorImpl::MissingImplementation { interface, type_ } => ErrorTip::Suggestion(format!(
                "No implementation of `{}` found for `{}`",
                interface, type_
            )),
            ErrorImpl::ReturnTypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Invalid return type for function: expected `{}` but got `{}`",
                expected, received
            )),
            ErrorImpl::MissingSignature { function } => ErrorTip::Suggestion(format!(
                "Couldn't find type information for function `{}`",
                function
            )),
            ErrorImpl::OperandTypeError { side, found } => ErrorTip::Suggestion(format!(
                "Binary operations only accept `Int`, but found `{}` on the {} side",
                found, side
            )),
            ErrorImpl::BranchTypeMismatch { if_type, else_type } => ErrorTip::Suggestion(format!(
                "`if` and `else` branches evaluate to different types: `{}` and `{}`",
                if_type, else_type
            )),
            ErrorImpl::MixedListTypeError { found, inferred } => ErrorTip::Suggestion(format!(
                "Lists can't have mixed types: found an element of type `{}` when elements' inferred type was `{}`",
                found, inferred
            )),
            ErrorImpl::MixedMatchTypeError { found, inferred } => ErrorTip::Suggestion(format!(
                "Match can't have mixed types on its cases: found a case with type `{}` when previous cases' inferred type was `{}`",
                found, inferred
            )),
            ErrorImpl::EmptyMatch => {
                ErrorTip::Suggestion(String::from("Cannot have `match` expression with no cases"))
            }
            ErrorImpl::UnknownConstructor { constructor } => ErrorTip::Suggestion(format!(
                "Unknown constructor `{}` on pattern match",
                constructor
            )),
            ErrorImpl::UndefinedConstructor { constructor } => {
                ErrorTip::Suggestion(format!("Undefined constructor: `{}`", constructor))
            }
            ErrorImpl::PatternMismatch { value, constructor } => ErrorTip::Suggestion(format!(
                "Trying to pattern match value of type `{}` with constructor `{}`",
                value, constructor
            )),
            ErrorImpl::NotCallable { found } => ErrorTip::Suggestion(format!(
                "Can't find type information for function call on `{}`",
                found
            )),
            ErrorImpl::RecursionLimit { limit } => ErrorTip::Suggestion(format!(
                "Expression nesting exceeds the limit of {}",
                limit
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Front end
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("unknown interface {interface}")]
    UnknownInterface { interface: String },
    #[error("interface {interface} has no method {method}")]
    UnknownMethod { interface: String, method: String },
    #[error("duplicate implementation of {interface} for {type_}")]
    DuplicateImplementation { interface: String, type_: String },

    // Type checking
    #[error("wrong number of arguments for {function}: expected {expected}, received {received}")]
    ArityError { function: String, expected: usize, received: usize },
    #[error("unknown type for expression {expression}")]
    UnknownTypeError { expression: String },
    #[error("expected `{expected}` but got `{received}` on arg #{position} for function `{function}`")]
    ArgumentTypeError { function: String, expected: String, received: String, position: usize },
    #[error("no implementation of {interface} for {type_}")]
    MissingImplementation { interface: String, type_: String },
    #[error("invalid return type: expected `{expected}` but got `{received}`")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("missing type information for function {function}")]
    MissingSignature { function: String },
    #[error("binary operations only accept `Int`, found `{found}` on the {side} side")]
    OperandTypeError { side: OperandSide, found: String },
    #[error("`if` and `else` branches evaluate to different types: `{if_type}` and `{else_type}`")]
    BranchTypeMismatch { if_type: String, else_type: String },
    #[error("mixed list element types: found `{found}`, inferred `{inferred}`")]
    MixedListTypeError { found: String, inferred: String },
    #[error("mixed match case types: found `{found}`, inferred `{inferred}`")]
    MixedMatchTypeError { found: String, inferred: String },
    #[error("match expression without cases")]
    EmptyMatch,
    #[error("unknown constructor {constructor} on pattern match")]
    UnknownConstructor { constructor: String },
    #[error("undefined constructor {constructor}")]
    UndefinedConstructor { constructor: String },
    #[error("cannot match value of type `{value}` with constructor `{constructor}`")]
    PatternMismatch { value: String, constructor: String },
    #[error("no type information for call on `{found}`")]
    NotCallable { found: String },
    #[error("nesting exceeds {limit}")]
    RecursionLimit { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    Left,
    Right,
}

impl Display for OperandSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperandSide::Left => write!(f, "left"),
            OperandSide::Right => write!(f, "right"),
        }
    }
}

/// The single error surfaced by the type-checking driver.
///
/// Carries the rendered, caret-annotated report next to the located error it
/// was built from.
#[derive(Error, Debug, Clone)]
#[error("type error")]
pub struct FatalError {
    pub report: String,
    pub error: Error,
}
