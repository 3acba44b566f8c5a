//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - String literals with escape sequences
//! - Operators and punctuation
//! - Comments
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

#[test]
fn test_tokenize_keywords() {
    let source = "fn let if else match interface implementation enum extern".to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Fn);
    assert_eq!(tokens[1].kind, TokenKind::Let);
    assert_eq!(tokens[2].kind, TokenKind::If);
    assert_eq!(tokens[3].kind, TokenKind::Else);
    assert_eq!(tokens[4].kind, TokenKind::Match);
    assert_eq!(tokens[5].kind, TokenKind::Interface);
    assert_eq!(tokens[6].kind, TokenKind::Implementation);
    assert_eq!(tokens[7].kind, TokenKind::Enum);
    assert_eq!(tokens[8].kind, TokenKind::Extern);
    assert_eq!(tokens[9].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar_123 _underscore Point".to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "bar_123");
    assert_eq!(tokens[2].value, "_underscore");
    assert_eq!(tokens[3].value, "Point");
    assert!(tokens[3].is_capitalised());
    assert!(!tokens[0].is_capitalised());
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0".to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "multiple words""#.to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_escapes() {
    let source = r#""hello\nworld" "tab\there" "quote\"d" "back\\slash""#.to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    assert_eq!(tokens[0].value, "hello\nworld");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "quote\"d");
    assert_eq!(tokens[3].value, "back\\slash");
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * / % == != < > <= >= = => && || !".to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::FatArrow,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let source = "( ) { } [ ] , ; :".to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::OpenParen);
    assert_eq!(tokens[1].kind, TokenKind::CloseParen);
    assert_eq!(tokens[2].kind, TokenKind::OpenCurly);
    assert_eq!(tokens[3].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[4].kind, TokenKind::OpenBracket);
    assert_eq!(tokens[5].kind, TokenKind::CloseBracket);
    assert_eq!(tokens[6].kind, TokenKind::Comma);
    assert_eq!(tokens[7].kind, TokenKind::Semicolon);
    assert_eq!(tokens[8].kind, TokenKind::Colon);
    assert_eq!(tokens[9].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_comments() {
    let source = "let x = 5 // this is a comment\nx".to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Let);
    assert_eq!(tokens[1].value, "x");
    assert_eq!(tokens[2].kind, TokenKind::Assignment);
    assert_eq!(tokens[3].value, "5");
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "x");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_token_spans() {
    let source = "add(2, \"x\")".to_string();
    let tokens = tokenize(source, Some("test.vv".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[4].kind, TokenKind::String);
    assert_eq!(tokens[4].span.start.0, 7);
    assert_eq!(tokens[4].span.end.0, 10);
    assert_eq!(*tokens[0].span.start.1, "test.vv");
}

#[test]
fn test_tokenize_unrecognised() {
    let source = "let x = @".to_string();
    let error = tokenize(source, Some("test.vv".to_string())).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_tokenize_default_file_name() {
    let tokens = tokenize("1".to_string(), None).unwrap();

    assert_eq!(*tokens[0].span.start.1, "shell");
}
