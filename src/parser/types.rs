//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Named types, resolved against the generics in scope and then the type
//!   namespace (`Int`, `T`, `Point`)
//! - Applied type constructors (`List<Int>`, `Option<T>`)
//! - Function types (`fn(Int, Int): Int`)

use std::collections::HashMap;

use crate::{
    ast::types::{FunctionType, Type},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_delimited, parser::Parser};

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Fn, parse_function_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    let base = if parser.is_generic(&token.value) {
        Type::Generic(token.value.clone())
    } else {
        parser.types.get(&token.value).cloned().ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownType {
                    type_: token.value.clone(),
                },
                token.span.start.clone(),
            )
        })?
    };

    if !parser.eat(TokenKind::Less) {
        return Ok(base);
    }

    let arguments = parse_delimited(parser, TokenKind::Greater, parse_type)?;
    Ok(Type::instance(base, arguments))
}

pub fn parse_function_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Fn)?;
    parser.expect(TokenKind::OpenParen)?;
    let params = parse_delimited(parser, TokenKind::CloseParen, parse_type)?;
    parser.expect(TokenKind::Colon)?;
    let return_type = parse_type(parser)?;

    Ok(Type::function(FunctionType::new(
        String::from("fn"),
        params,
        return_type,
        vec![],
    )))
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let token_kind = parser.current_token_kind();
    let Some(handler) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    handler(parser)
}
