//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and item handlers for declarations.
//!
//! It maintains lookup tables for:
//! - Item handlers (declarations)
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers
//!
//! While parsing it also fills the declaration table: the root environment
//! and the namespace used to resolve type annotations.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::{Node, NodeKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    type_checker::{builtins::declare_builtins, env::Env},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, ItemHandler, ItemLookup, LEDHandler,
        LEDLookup, NUDHandler, NUDLookup,
    },
    stmt::parse_item,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// A parsed program together with its declaration table.
#[derive(Debug)]
pub struct Program {
    /// Root block holding every top-level item, in source order.
    pub body: Node,
    /// Root value namespace: builtins, functions, methods and constructors.
    pub env: Env,
    /// Names usable in type annotations.
    pub types: HashMap<String, Type>,
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for item parsing handlers
    item_lookup: ItemLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type handlers
    type_nud_lookup: TypeNUDLookup,
    /// Generic parameter names in scope for type annotations
    generics: Vec<String>,
    pub env: Env,
    pub types: HashMap<String, Type>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span::new(end.clone(), end)
            ));
        }

        let env = Env::new();
        let mut types = HashMap::new();
        declare_builtins(&env, &mut types);

        Parser {
            tokens,
            pos: 0,
            file,
            item_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            generics: vec![],
            env,
            types,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            return Err(error.unwrap_or_else(|| {
                Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )
            }));
        }

        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes the current token if it is of the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_item_lookup(&self) -> &ItemLookup {
        &self.item_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers an item handler for a token.
    pub fn item(&mut self, kind: TokenKind, item_fn: ItemHandler) {
        self.item_lookup.insert(kind, item_fn);
    }

    /// Registers a type handler for a token.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        let end = match self.pos {
            0 => start.clone(),
            pos => self.tokens[(pos - 1).min(self.tokens.len() - 1)].span.end.clone(),
        };
        Span::new(start, end)
    }

    /// Runs `parse` with `names` resolvable as generic types.
    pub fn with_generics<T>(
        &mut self,
        names: &[String],
        parse: impl FnOnce(&mut Parser) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let depth = self.generics.len();
        self.generics.extend(names.iter().cloned());
        let result = parse(self);
        self.generics.truncate(depth);
        result
    }

    pub fn is_generic(&self, name: &str) -> bool {
        self.generics.iter().any(|generic| generic == name)
    }

    /// Constructor names declared between the current `{` and its matching
    /// `}`: identifiers that open the block or follow a top-level comma.
    pub fn peek_constructor_names(&self) -> Vec<String> {
        let mut names = vec![];
        let mut depth = 0;
        let mut expect_name = true;

        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => depth -= 1,
                TokenKind::CloseCurly | TokenKind::EOF if depth == 0 => break,
                TokenKind::Comma if depth == 0 => {
                    expect_name = true;
                    continue;
                }
                TokenKind::Identifier if depth == 0 && expect_name => {
                    names.push(token.value.clone());
                }
                _ => {}
            }
            expect_name = false;
        }

        names
    }
}

/// Parses a stream of tokens into a program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses all items until EOF.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut body = vec![];

    while parser.has_tokens() {
        body.extend(parse_item(&mut parser)?);
    }

    let span = parser.span_from(Position(0, Rc::clone(&file)));

    Ok(Program {
        body: Node::new(NodeKind::Block(body), span),
        env: parser.env,
        types: parser.types,
    })
}
